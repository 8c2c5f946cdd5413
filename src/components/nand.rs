//! Two-input NAND gate.
//!
//! Pull-up: two PMOS in parallel from VCC to the output.
//! Pull-down: two NMOS in series through a private stack node.

use super::mosfet::{Mosfet, Terminals};
use super::{transition_delay, Technology, Transition, GND, VCC};
use crate::error::Result;

/// A static CMOS NAND2 gate.
#[derive(Debug, Clone)]
pub struct Nand2 {
    pub name: String,
    pub inputs: [String; 2],
    pub output: String,
    /// Pull-up devices, one per input
    pub pmos: [Mosfet; 2],
    /// Pull-down stack, output side first
    pub nmos: [Mosfet; 2],
}

impl Nand2 {
    /// Create a new NAND2 from the technology templates.
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let name = name.into();
        let (a, b, output) = (a.into(), b.into(), output.into());
        let stack = format!("{}3N", name);

        let pmos = [
            Mosfet::new(
                format!("M{}TP1", name),
                Terminals::new(&output, &a, VCC, VCC),
                tech.pmos.clone(),
            )?,
            Mosfet::new(
                format!("M{}TP2", name),
                Terminals::new(&output, &b, VCC, VCC),
                tech.pmos.clone(),
            )?,
        ];
        let nmos = [
            Mosfet::new(
                format!("M{}TN1", name),
                Terminals::new(&output, &a, &stack, GND),
                tech.nmos.clone(),
            )?,
            Mosfet::new(
                format!("M{}TN2", name),
                Terminals::new(&stack, &b, GND, GND),
                tech.nmos.clone(),
            )?,
        ];

        Ok(Self {
            name,
            inputs: [a, b],
            output,
            pmos,
            nmos,
        })
    }

    /// NAND with both inputs tied together, used as an inverter stage.
    pub fn tied(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let input = input.into();
        Self::new(name, input.clone(), input, output, tech)
    }

    /// Effective W/L of the network switching for a transition.
    ///
    /// The series pull-down stack counts as half a single device.
    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        match transition {
            Transition::Fall => 0.5 * self.nmos[0].params().w_over_l(),
            Transition::Rise => self.pmos[0].params().w_over_l(),
        }
    }

    /// Capacitance presented to one input.
    pub fn input_capacitance(&self) -> f64 {
        self.pmos[0].gate_capacitance() + self.nmos[0].gate_capacitance()
    }

    /// Parasitic capacitance at the output and stack nodes over a swing.
    pub fn internal_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        let (p, n) = (&self.pmos[0], &self.nmos[0]);
        Ok(2.0 * p.drain_body_capacitance(v1, v2)?
            + 3.0 * n.drain_body_capacitance(v1, v2)?
            + p.gate_capacitance()
            + n.gate_capacitance())
    }

    /// Delay of a single output transition.
    pub fn transition_delay(&self, transition: Transition, vcc: f64, load: f64) -> Result<f64> {
        let (v1, v2) = transition.swing(vcc);
        let total = load + self.internal_capacitance(v1, v2)?;
        let device = match transition {
            Transition::Fall => &self.nmos[0],
            Transition::Rise => &self.pmos[0],
        };
        transition_delay(
            &self.name,
            vcc,
            device.threshold_magnitude(),
            self.drive_ratio(transition) * device.derived().kp,
            total,
        )
    }

    /// Average of the falling and rising delays.
    pub fn propagation_delay(&self, vcc: f64, load: f64) -> Result<f64> {
        let fall = self.transition_delay(Transition::Fall, vcc, load)?;
        let rise = self.transition_delay(Transition::Rise, vcc, load)?;
        Ok((fall + rise) / 2.0)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Mosfet> {
        self.pmos.iter().chain(self.nmos.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_stack_halves_drive() {
        let tech = Technology::default();
        let nand = Nand2::new("G", "A", "B", "Y", &tech).unwrap();
        let single = tech.nmos.w / tech.nmos.l;
        assert_eq!(nand.drive_ratio(Transition::Fall), 0.5 * single);
        assert_eq!(nand.drive_ratio(Transition::Rise), tech.pmos.w / tech.pmos.l);
    }

    #[test]
    fn test_device_naming_and_stack_node() {
        let nand = Nand2::new("G1", "A", "B", "Y", &Technology::default()).unwrap();
        let names: Vec<&str> = nand.devices().map(|m| m.name()).collect();
        assert_eq!(names, vec!["MG1TP1", "MG1TP2", "MG1TN1", "MG1TN2"]);
        assert_eq!(nand.nmos[0].terminals().source, "G13N");
        assert_eq!(nand.nmos[1].terminals().drain, "G13N");
        assert_eq!(nand.nmos[1].terminals().gate, "B");
    }

    #[test]
    fn test_delay_grows_with_load() {
        let nand = Nand2::new("G", "A", "B", "Y", &Technology::default()).unwrap();
        let unloaded = nand.propagation_delay(5.0, 0.0).unwrap();
        let loaded = nand.propagation_delay(5.0, 1e-12).unwrap();
        assert!(unloaded > 0.0);
        assert!(loaded > unloaded);
    }

    #[test]
    fn test_propagation_delay_is_average() {
        let nand = Nand2::new("G", "A", "B", "Y", &Technology::default()).unwrap();
        let fall = nand.transition_delay(Transition::Fall, 5.0, 1e-13).unwrap();
        let rise = nand.transition_delay(Transition::Rise, 5.0, 1e-13).unwrap();
        let avg = nand.propagation_delay(5.0, 1e-13).unwrap();
        assert_relative_eq!(avg, (fall + rise) / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_supply_below_threshold_is_domain_error() {
        let nand = Nand2::new("G", "A", "B", "Y", &Technology::default()).unwrap();
        assert!(nand.propagation_delay(0.5, 0.0).is_err());
        // 4 * (1.2 - 1.0) / 1.2 - 1 < 0 on the rising edge
        assert!(nand.propagation_delay(1.2, 0.0).is_err());
    }
}
