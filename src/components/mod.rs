//! Transistor and gate models.
//!
//! This module provides:
//! - [`Mosfet`]: a single transistor with parameters derived from geometry
//!   and process data
//! - Primitive gates: [`Inverter`], [`Nand2`]
//! - Composite gates built from NAND2/inverter stages: [`And2`], [`Or2`], [`Xor2`]
//!
//! All gates share one delay model. For each output edge:
//!
//! ```text
//! vd    = vcc - |vt|
//! alpha = |vt| / vd
//! tp    = C / (W/L * kp * vd) * (2 * alpha + ln(4 * vd / vcc - 1))
//! ```
//!
//! and the gate delay is the mean of the falling and rising edges.

mod composite;
mod inverter;
mod mosfet;
mod nand;

pub use composite::{And2, Or2, Xor2};
pub use inverter::Inverter;
pub use mosfet::{ChannelType, DerivedParams, Mosfet, MosfetParams, Terminals};
pub use nand::Nand2;

use crate::error::{DelayError, Result};

/// Supply rail node name used for pull-up sources and PMOS bulk.
pub const VCC: &str = "VCC";

/// Ground rail node name used for pull-down sources and NMOS bulk.
pub const GND: &str = "GND";

/// Output edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// High to low, discharged through the pull-down network
    Fall,
    /// Low to high, charged through the pull-up network
    Rise,
}

impl Transition {
    /// Junction bias endpoints used to linearize parasitics for this edge.
    pub fn swing(self, vcc: f64) -> (f64, f64) {
        match self {
            Transition::Fall => (vcc, vcc * 0.5),
            Transition::Rise => (0.0, vcc * 0.5),
        }
    }
}

/// PMOS/NMOS templates applied to every transistor a gate creates.
#[derive(Debug, Clone, PartialEq)]
pub struct Technology {
    pub pmos: MosfetParams,
    pub nmos: MosfetParams,
}

impl Default for Technology {
    fn default() -> Self {
        Self {
            pmos: MosfetParams::reference_pmos(),
            nmos: MosfetParams::reference_nmos(),
        }
    }
}

impl Technology {
    /// Create the reference technology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PMOS channel width (um).
    pub fn with_pmos_width(mut self, width: f64) -> Self {
        self.pmos.w = width;
        self
    }

    /// Set the NMOS channel width (um).
    pub fn with_nmos_width(mut self, width: f64) -> Self {
        self.nmos.w = width;
        self
    }
}

/// Single-edge delay of a switching network.
///
/// `drive` is the network's W/L times its drive coefficient (A/V^2).
pub(crate) fn transition_delay(
    context: &str,
    vcc: f64,
    threshold: f64,
    drive: f64,
    load: f64,
) -> Result<f64> {
    let vd = vcc - threshold;
    if vd <= 0.0 {
        return Err(DelayError::domain(
            context,
            format!("supply {} V does not exceed threshold {} V", vcc, threshold),
        ));
    }
    let log_arg = 4.0 * vd / vcc - 1.0;
    if log_arg <= 0.0 {
        return Err(DelayError::domain(
            context,
            format!(
                "supply {} V too low for threshold {} V (4*vd/vcc - 1 = {:.4})",
                vcc, threshold, log_arg
            ),
        ));
    }
    let alpha = threshold / vd;
    let coefficient = load / (drive * vd);
    Ok(coefficient * (2.0 * alpha + log_arg.ln()))
}

/// Gate kinds accepted in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Inverter,
    Nand2,
    And2,
    Or2,
    Xor2,
}

impl GateKind {
    /// Parse a gate kind from its netlist keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "inv" => Some(Self::Inverter),
            "nand" => Some(Self::Nand2),
            "and" => Some(Self::And2),
            "or" => Some(Self::Or2),
            "xor" => Some(Self::Xor2),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Inverter => "inv",
            Self::Nand2 => "nand",
            Self::And2 => "and",
            Self::Or2 => "or",
            Self::Xor2 => "xor",
        }
    }

    /// Number of input terminals.
    pub fn input_count(&self) -> usize {
        match self {
            Self::Inverter => 1,
            Self::Nand2 | Self::And2 | Self::Or2 | Self::Xor2 => 2,
        }
    }
}

/// A logic gate.
#[derive(Debug, Clone)]
pub enum Gate {
    Inverter(Inverter),
    Nand2(Nand2),
    And2(And2),
    Or2(Or2),
    Xor2(Xor2),
}

impl Gate {
    /// Build a gate of the given kind from the technology templates.
    pub fn new(
        kind: GateKind,
        name: &str,
        inputs: &[String],
        output: &str,
        tech: &Technology,
    ) -> Result<Self> {
        if inputs.len() != kind.input_count() {
            return Err(DelayError::invalid_gate(
                name,
                format!(
                    "'{}' takes {} input(s), got {}",
                    kind.keyword(),
                    kind.input_count(),
                    inputs.len()
                ),
            ));
        }

        Ok(match kind {
            GateKind::Inverter => Gate::Inverter(Inverter::new(name, &inputs[0], output, tech)?),
            GateKind::Nand2 => Gate::Nand2(Nand2::new(name, &inputs[0], &inputs[1], output, tech)?),
            GateKind::And2 => Gate::And2(And2::new(name, &inputs[0], &inputs[1], output, tech)?),
            GateKind::Or2 => Gate::Or2(Or2::new(name, &inputs[0], &inputs[1], output, tech)?),
            GateKind::Xor2 => Gate::Xor2(Xor2::new(name, &inputs[0], &inputs[1], output, tech)?),
        })
    }

    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Inverter(_) => GateKind::Inverter,
            Gate::Nand2(_) => GateKind::Nand2,
            Gate::And2(_) => GateKind::And2,
            Gate::Or2(_) => GateKind::Or2,
            Gate::Xor2(_) => GateKind::Xor2,
        }
    }

    /// Get the instance name.
    pub fn name(&self) -> &str {
        match self {
            Gate::Inverter(g) => &g.name,
            Gate::Nand2(g) => &g.name,
            Gate::And2(g) => &g.name,
            Gate::Or2(g) => &g.name,
            Gate::Xor2(g) => &g.name,
        }
    }

    /// Effective W/L of the output stage for an edge.
    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        match self {
            Gate::Inverter(g) => g.drive_ratio(transition),
            Gate::Nand2(g) => g.drive_ratio(transition),
            Gate::And2(g) => g.drive_ratio(transition),
            Gate::Or2(g) => g.drive_ratio(transition),
            Gate::Xor2(g) => g.drive_ratio(transition),
        }
    }

    /// Capacitance one input node sees from this gate (F).
    pub fn input_capacitance(&self) -> f64 {
        match self {
            Gate::Inverter(g) => g.input_capacitance(),
            Gate::Nand2(g) => g.input_capacitance(),
            Gate::And2(g) => g.input_capacitance(),
            Gate::Or2(g) => g.input_capacitance(),
            Gate::Xor2(g) => g.input_capacitance(),
        }
    }

    /// Capacitance of nodes internal to the gate over a bias swing (F).
    pub fn internal_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        match self {
            Gate::Inverter(g) => g.internal_capacitance(v1, v2),
            Gate::Nand2(g) => g.internal_capacitance(v1, v2),
            Gate::And2(g) => g.internal_capacitance(v1, v2),
            Gate::Or2(g) => g.internal_capacitance(v1, v2),
            Gate::Xor2(g) => g.internal_capacitance(v1, v2),
        }
    }

    /// Propagation delay driving `load` farads from a `vcc` supply (s).
    pub fn propagation_delay(&self, vcc: f64, load: f64) -> Result<f64> {
        match self {
            Gate::Inverter(g) => g.propagation_delay(vcc, load),
            Gate::Nand2(g) => g.propagation_delay(vcc, load),
            Gate::And2(g) => g.propagation_delay(vcc, load),
            Gate::Or2(g) => g.propagation_delay(vcc, load),
            Gate::Xor2(g) => g.propagation_delay(vcc, load),
        }
    }

    /// Every transistor of the gate, in construction order.
    pub fn devices(&self) -> Vec<&Mosfet> {
        match self {
            Gate::Inverter(g) => g.devices().collect(),
            Gate::Nand2(g) => g.devices().collect(),
            Gate::And2(g) => g.devices().collect(),
            Gate::Or2(g) => g.devices().collect(),
            Gate::Xor2(g) => g.devices().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(inputs: &[&str]) -> Vec<String> {
        inputs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_gate_kind_keywords() {
        for kind in [
            GateKind::Inverter,
            GateKind::Nand2,
            GateKind::And2,
            GateKind::Or2,
            GateKind::Xor2,
        ] {
            assert_eq!(GateKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(GateKind::from_keyword("NAND"), Some(GateKind::Nand2));
        assert_eq!(GateKind::from_keyword("nor"), None);
    }

    #[test]
    fn test_wrong_input_count_rejected() {
        let err = Gate::new(
            GateKind::Inverter,
            "I1",
            &names(&["A", "B"]),
            "Y",
            &Technology::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DelayError::InvalidGate { .. }));
    }

    #[test]
    fn test_device_counts_per_kind() {
        let tech = Technology::default();
        let cases = [
            (GateKind::Inverter, names(&["A"]), 2),
            (GateKind::Nand2, names(&["A", "B"]), 4),
            (GateKind::And2, names(&["A", "B"]), 6),
            (GateKind::Or2, names(&["A", "B"]), 12),
            (GateKind::Xor2, names(&["A", "B"]), 16),
        ];
        for (kind, inputs, count) in cases {
            let gate = Gate::new(kind, "G", &inputs, "Y", &tech).unwrap();
            assert_eq!(gate.kind(), kind);
            assert_eq!(gate.devices().len(), count);
        }
    }

    #[test]
    fn test_transition_delay_domain() {
        assert!(transition_delay("G", 5.0, 0.8, 1e-3, 1e-13).unwrap() > 0.0);
        assert!(transition_delay("G", 0.8, 0.8, 1e-3, 1e-13).is_err());
        assert!(transition_delay("G", 1.0, 0.8, 1e-3, 1e-13).is_err());
    }

    #[test]
    fn test_technology_builder() {
        let tech = Technology::new().with_pmos_width(10.0).with_nmos_width(4.0);
        assert_eq!(tech.pmos.w, 10.0);
        assert_eq!(tech.nmos.w, 4.0);
        assert_eq!(tech.pmos.channel, ChannelType::P);
    }
}
