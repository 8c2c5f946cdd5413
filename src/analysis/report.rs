//! Timing results.

use std::fmt;

use crate::circuit::{Circuit, NodeId, Path};

/// A path with its total delay.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDelay {
    pub path: Path,
    /// Seconds
    pub delay: f64,
}

/// Every evaluated path ending at one primary output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTiming {
    pub output: NodeId,
    pub name: String,
    pub paths: Vec<PathDelay>,
}

impl OutputTiming {
    /// The slowest path into this output.
    pub fn critical(&self) -> Option<&PathDelay> {
        self.paths
            .iter()
            .max_by(|a, b| a.delay.total_cmp(&b.delay))
    }

    /// Critical delay in seconds, zero when the output has no paths.
    pub fn critical_delay(&self) -> f64 {
        self.critical().map_or(0.0, |p| p.delay)
    }
}

/// Per-output delay sets for a whole circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingReport {
    pub supply_voltage: f64,
    pub outputs: Vec<OutputTiming>,
}

impl TimingReport {
    /// Look up the timing of an output by node name.
    pub fn output(&self, name: &str) -> Option<&OutputTiming> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Render the report, optionally listing every path.
    pub fn display<'a>(&'a self, circuit: &'a Circuit, show_paths: bool) -> ReportDisplay<'a> {
        ReportDisplay {
            report: self,
            circuit,
            show_paths,
        }
    }
}

/// [`fmt::Display`] adapter for a [`TimingReport`].
pub struct ReportDisplay<'a> {
    report: &'a TimingReport,
    circuit: &'a Circuit,
    show_paths: bool,
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vcc = {} V", self.report.supply_voltage)?;
        for output in &self.report.outputs {
            writeln!(f)?;
            writeln!(f, "{}", output.name)?;
            if self.show_paths {
                for p in &output.paths {
                    let gates: Vec<&str> = p
                        .path
                        .gates
                        .iter()
                        .map(|&g| self.circuit.gate(g).gate.name())
                        .collect();
                    writeln!(
                        f,
                        "  {} -> {}: {:.4e} s",
                        self.circuit.node_name(p.path.input),
                        gates.join(" -> "),
                        p.delay
                    )?;
                }
            }
            writeln!(f, "  critical: {:.4e} s", output.critical_delay())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateId;

    fn path_delay(delay: f64) -> PathDelay {
        PathDelay {
            path: Path {
                input: NodeId(0),
                output: NodeId(1),
                gates: vec![GateId(0)],
            },
            delay,
        }
    }

    #[test]
    fn test_critical_picks_largest() {
        let timing = OutputTiming {
            output: NodeId(1),
            name: "OUT".to_string(),
            paths: vec![path_delay(1e-10), path_delay(3e-10), path_delay(2e-10)],
        };
        assert_eq!(timing.critical_delay(), 3e-10);
    }

    #[test]
    fn test_empty_output_has_zero_critical() {
        let timing = OutputTiming {
            output: NodeId(1),
            name: "OUT".to_string(),
            paths: Vec::new(),
        };
        assert!(timing.critical().is_none());
        assert_eq!(timing.critical_delay(), 0.0);
    }
}
