//! Path delay analysis.
//!
//! For a path `g1 -> g2 -> ... -> gn` and supply `vcc`:
//!
//! ```text
//! delay(path) = sum_i gi.propagation_delay(vcc, load(out(gi)))
//! load(node)  = sum over listeners of input_capacitance + node annotation
//! ```
//!
//! The critical delay of a primary output is the largest delay over all
//! paths ending there.

mod report;
mod timing;

pub use report::{OutputTiming, PathDelay, ReportDisplay, TimingReport};
pub use timing::{node_loads, AnalysisConfig, DelayAnalyzer};
