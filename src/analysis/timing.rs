//! Path delay evaluation.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::report::{OutputTiming, PathDelay, TimingReport};
use crate::circuit::{enumerate_paths, group_by_output, Circuit, NodeId, Path};
use crate::error::{DelayError, Result};

/// Configuration for the analyzer.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Supply voltage overriding the netlist's `vcc` line.
    pub supply_voltage: Option<f64>,
    /// Evaluate paths one at a time even when the `parallel` feature is on.
    pub sequential: bool,
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the supply voltage (in volts).
    pub fn with_supply_voltage(mut self, vcc: f64) -> Self {
        self.supply_voltage = Some(vcc);
        self
    }

    /// Force sequential evaluation.
    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }
}

/// Evaluates path delays over a built circuit.
///
/// The load a gate drives is a property of its output node: the input
/// capacitance of every listener plus the node's annotated capacitance.
/// It is computed once per node and reused for every path through it.
pub struct DelayAnalyzer<'c> {
    circuit: &'c Circuit,
    config: AnalysisConfig,
    supply_voltage: f64,
    loads: Vec<f64>,
}

impl<'c> DelayAnalyzer<'c> {
    /// Create an analyzer, resolving the supply voltage.
    pub fn new(circuit: &'c Circuit, config: AnalysisConfig) -> Result<Self> {
        let supply_voltage = config
            .supply_voltage
            .or(circuit.supply_voltage())
            .ok_or(DelayError::MissingSupply)?;
        if !(supply_voltage.is_finite() && supply_voltage > 0.0) {
            return Err(DelayError::domain(
                "supply",
                format!("supply voltage must be positive, got {}", supply_voltage),
            ));
        }

        Ok(Self {
            circuit,
            config,
            supply_voltage,
            loads: node_loads(circuit),
        })
    }

    pub fn supply_voltage(&self) -> f64 {
        self.supply_voltage
    }

    /// Load capacitance on a node (F).
    pub fn load(&self, node: NodeId) -> f64 {
        self.loads[node.0]
    }

    /// Total delay along a path (s).
    pub fn path_delay(&self, path: &Path) -> Result<f64> {
        let mut total = 0.0;
        for &id in &path.gates {
            let placed = self.circuit.gate(id);
            total += placed
                .gate
                .propagation_delay(self.supply_voltage, self.load(placed.output))?;
        }
        Ok(total)
    }

    fn evaluate(&self, paths: Vec<Path>) -> Result<Vec<PathDelay>> {
        let delay_of = |path: Path| -> Result<PathDelay> {
            let delay = self.path_delay(&path)?;
            Ok(PathDelay { path, delay })
        };

        #[cfg(feature = "parallel")]
        {
            if !self.config.sequential {
                return paths.into_par_iter().map(delay_of).collect();
            }
        }

        paths.into_iter().map(delay_of).collect()
    }

    /// Enumerate all paths and evaluate each, grouped by primary output.
    pub fn run(&self) -> Result<TimingReport> {
        let paths = enumerate_paths(self.circuit)?;
        let total = paths.len();

        let mut outputs = Vec::new();
        for group in group_by_output(self.circuit, paths) {
            outputs.push(OutputTiming {
                output: group.output,
                name: self.circuit.node_name(group.output).to_string(),
                paths: self.evaluate(group.paths)?,
            });
        }

        info!(
            vcc = self.supply_voltage,
            outputs = outputs.len(),
            paths = total,
            "evaluated path delays"
        );

        Ok(TimingReport {
            supply_voltage: self.supply_voltage,
            outputs,
        })
    }
}

/// Per-node load: listener input capacitance plus annotated capacitance.
pub fn node_loads(circuit: &Circuit) -> Vec<f64> {
    circuit
        .nodes()
        .iter()
        .map(|node| {
            node.listeners
                .iter()
                .map(|&g| circuit.gate(g).gate.input_capacitance())
                .sum::<f64>()
                + node.capacitance
        })
        .collect()
}
