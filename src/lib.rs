//! # Gatedelay Core
//!
//! First-order propagation delay estimation for CMOS logic networks.
//!
//! This library provides:
//! - A line-oriented netlist format for gate-level circuits
//! - A MOSFET model deriving capacitances and drive strength from geometry
//!   and process parameters
//! - Closed-form delay models for inverter, NAND, AND, OR and XOR gates
//! - Exhaustive input-to-output path enumeration and per-output critical delay
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`netlist`] - Parser for the gate netlist format
//! - [`components`] - Transistor and gate models
//! - [`circuit`] - Circuit graph, node classification and path enumeration
//! - [`analysis`] - Load aggregation and path delay evaluation
//! - [`spice`] - SPICE device-card emission
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gatedelay adder.net --paths
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use gatedelay_core::{netlist, AnalysisConfig, Circuit, DelayAnalyzer, Technology};
//!
//! # fn main() -> gatedelay_core::Result<()> {
//! let netlist = netlist::parse("vcc 5\nnand A B OUT G1\n")?;
//! let circuit = Circuit::from_netlist(&netlist, &Technology::default())?;
//! let report = DelayAnalyzer::new(&circuit, AnalysisConfig::new())?.run()?;
//! for output in &report.outputs {
//!     println!("{}: {:.3e} s", output.name, output.critical_delay());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Delay Model
//!
//! Each gate's delay is the mean of its falling and rising edge delays,
//! each computed from the output load, the gate's internal parasitics, the
//! switching network's W/L and the device threshold. Composite gates sum
//! the delays of their NAND/inverter stages in a fixed order. A path's
//! delay is the sum of its gate delays, each gate loaded by everything
//! listening on its output node.

pub mod analysis;
pub mod circuit;
pub mod components;
pub mod error;
pub mod netlist;
pub mod spice;

// Re-export main types for convenience
pub use analysis::{AnalysisConfig, DelayAnalyzer, TimingReport};
pub use circuit::Circuit;
pub use components::Technology;
pub use error::{DelayError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDelayAnalyzer;

/// Intrinsic carrier density of silicon (cm^-3)
pub const SILICON_NI: f64 = 1.45e10;

/// Thermal voltage at room temperature (V)
pub const THERMAL_VOLTAGE: f64 = 0.026;

/// Vacuum permittivity (F/cm)
pub const EPSILON_0: f64 = 8.85e-14;

/// Silicon permittivity (F/cm)
pub const EPSILON_SI: f64 = 11.7 * EPSILON_0;

/// Silicon dioxide permittivity (F/cm)
pub const EPSILON_OX: f64 = 3.9 * EPSILON_0;

/// Elementary charge (C)
pub const ELECTRON_CHARGE: f64 = 1.6e-19;
