//! Multi-stage gates built from NAND2 and inverter stages.
//!
//! Each composite has a fixed stage order. Its delay is the sum of every
//! stage delay in that order, where a non-final stage is loaded by the
//! input capacitance of the stages it feeds and the final stage by the
//! external load.

use super::inverter::Inverter;
use super::mosfet::Mosfet;
use super::nand::Nand2;
use super::{Technology, Transition};
use crate::error::Result;

/// AND2: NAND2 followed by an inverter.
#[derive(Debug, Clone)]
pub struct And2 {
    pub name: String,
    pub nand: Nand2,
    pub inverter: Inverter,
}

impl And2 {
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let name = name.into();
        let mid = format!("{}IN", name);
        Ok(Self {
            nand: Nand2::new(format!("{}G1", name), a, b, &mid, tech)?,
            inverter: Inverter::new(format!("{}G2", name), &mid, output, tech)?,
            name,
        })
    }

    pub fn input_capacitance(&self) -> f64 {
        self.nand.input_capacitance()
    }

    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        self.inverter.drive_ratio(transition)
    }

    /// Parasitics of the node between the two stages.
    pub fn internal_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        Ok(self.nand.internal_capacitance(v1, v2)? + self.inverter.input_capacitance())
    }

    /// Per-stage delays in stage order.
    pub fn stage_delays(&self, vcc: f64, load: f64) -> Result<Vec<f64>> {
        Ok(vec![
            self.nand
                .propagation_delay(vcc, self.inverter.input_capacitance())?,
            self.inverter.propagation_delay(vcc, load)?,
        ])
    }

    pub fn propagation_delay(&self, vcc: f64, load: f64) -> Result<f64> {
        Ok(self.stage_delays(vcc, load)?.iter().sum())
    }

    pub fn devices(&self) -> impl Iterator<Item = &Mosfet> {
        self.nand.devices().chain(self.inverter.devices())
    }
}

/// OR2 by De Morgan: each input inverted by a tied NAND, then a NAND2.
#[derive(Debug, Clone)]
pub struct Or2 {
    pub name: String,
    /// Inverts input `a`
    pub invert_a: Nand2,
    /// Inverts input `b`
    pub invert_b: Nand2,
    pub combine: Nand2,
}

impl Or2 {
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let name = name.into();
        let (na, nb) = (format!("{}IN1", name), format!("{}IN2", name));
        Ok(Self {
            invert_a: Nand2::tied(format!("{}G1", name), a, &na, tech)?,
            invert_b: Nand2::tied(format!("{}G2", name), b, &nb, tech)?,
            combine: Nand2::new(format!("{}G3", name), &nb, &na, output, tech)?,
            name,
        })
    }

    /// Both first-stage NANDs: each input sees both pins of its tied NAND.
    pub fn input_capacitance(&self) -> f64 {
        self.invert_a.input_capacitance() + self.invert_b.input_capacitance()
    }

    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        self.combine.drive_ratio(transition)
    }

    pub fn internal_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        Ok(self.invert_a.internal_capacitance(v1, v2)?
            + self.invert_b.internal_capacitance(v1, v2)?
            + 2.0 * self.combine.input_capacitance())
    }

    pub fn stage_delays(&self, vcc: f64, load: f64) -> Result<Vec<f64>> {
        let fanout = self.combine.input_capacitance();
        Ok(vec![
            self.invert_a.propagation_delay(vcc, fanout)?,
            self.invert_b.propagation_delay(vcc, fanout)?,
            self.combine.propagation_delay(vcc, load)?,
        ])
    }

    pub fn propagation_delay(&self, vcc: f64, load: f64) -> Result<f64> {
        Ok(self.stage_delays(vcc, load)?.iter().sum())
    }

    pub fn devices(&self) -> impl Iterator<Item = &Mosfet> {
        self.invert_a
            .devices()
            .chain(self.invert_b.devices())
            .chain(self.combine.devices())
    }
}

/// XOR2 from four NAND2 gates.
///
/// ```text
/// g1 = NAND(a, b)
/// g2 = NAND(a, g1)
/// g3 = NAND(b, g1)
/// g4 = NAND(g3, g2) = a ^ b
/// ```
#[derive(Debug, Clone)]
pub struct Xor2 {
    pub name: String,
    pub stages: [Nand2; 4],
}

impl Xor2 {
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let name = name.into();
        let (a, b) = (a.into(), b.into());
        let n1 = format!("{}IN1", name);
        let n2 = format!("{}IN2", name);
        let n3 = format!("{}IN3", name);
        let stages = [
            Nand2::new(format!("{}G1", name), &a, &b, &n1, tech)?,
            Nand2::new(format!("{}G2", name), &a, &n1, &n2, tech)?,
            Nand2::new(format!("{}G3", name), &b, &n1, &n3, tech)?,
            Nand2::new(format!("{}G4", name), &n3, &n2, output, tech)?,
        ];
        Ok(Self { name, stages })
    }

    /// Each input drives g1 and one of g2/g3.
    pub fn input_capacitance(&self) -> f64 {
        self.stages[0].input_capacitance() + self.stages[1].input_capacitance()
    }

    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        self.stages[3].drive_ratio(transition)
    }

    pub fn internal_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        let mut total = 0.0;
        for stage in &self.stages[..3] {
            total += stage.internal_capacitance(v1, v2)?;
        }
        Ok(total + self.stage_loads()[..3].iter().sum::<f64>())
    }

    /// Internal loads of g1, g2 and g3.
    fn stage_loads(&self) -> [f64; 3] {
        let [_, g2, g3, g4] = &self.stages;
        [
            g2.input_capacitance() + g3.input_capacitance(),
            g4.input_capacitance(),
            g4.input_capacitance(),
        ]
    }

    pub fn stage_delays(&self, vcc: f64, load: f64) -> Result<Vec<f64>> {
        let loads = self.stage_loads();
        let mut delays = Vec::with_capacity(4);
        for (stage, stage_load) in self.stages[..3].iter().zip(loads) {
            delays.push(stage.propagation_delay(vcc, stage_load)?);
        }
        delays.push(self.stages[3].propagation_delay(vcc, load)?);
        Ok(delays)
    }

    pub fn propagation_delay(&self, vcc: f64, load: f64) -> Result<f64> {
        Ok(self.stage_delays(vcc, load)?.iter().sum())
    }

    pub fn devices(&self) -> impl Iterator<Item = &Mosfet> {
        self.stages.iter().flat_map(|s| s.devices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_and_delay_composes_nand_then_inverter() {
        let tech = Technology::default();
        let and = And2::new("A1", "A", "B", "Y", &tech).unwrap();
        let nand = Nand2::new("X", "A", "B", "M", &tech).unwrap();
        let inv = Inverter::new("X2", "M", "Y", &tech).unwrap();
        let expected = nand.propagation_delay(5.0, inv.input_capacitance()).unwrap()
            + inv.propagation_delay(5.0, 1e-13).unwrap();
        assert_relative_eq!(
            and.propagation_delay(5.0, 1e-13).unwrap(),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(and.nand.output, "A1IN");
        assert_eq!(and.inverter.input, "A1IN");
    }

    #[test]
    fn test_or_input_capacitance_twice_nand() {
        let tech = Technology::default();
        let or = Or2::new("O1", "A", "B", "Y", &tech).unwrap();
        let nand = Nand2::new("N", "A", "B", "Y", &tech).unwrap();
        assert_relative_eq!(
            or.input_capacitance(),
            2.0 * nand.input_capacitance(),
            max_relative = 1e-12
        );
        assert_eq!(or.invert_a.inputs, ["A".to_string(), "A".to_string()]);
        assert_eq!(or.combine.inputs, ["O1IN2".to_string(), "O1IN1".to_string()]);
    }

    #[test]
    fn test_or_delay_sums_three_stages() {
        let or = Or2::new("O1", "A", "B", "Y", &Technology::default()).unwrap();
        let stages = or.stage_delays(5.0, 0.0).unwrap();
        assert_eq!(stages.len(), 3);
        assert_relative_eq!(stages[0], stages[1], max_relative = 1e-12);
        assert_relative_eq!(
            or.propagation_delay(5.0, 0.0).unwrap(),
            stages.iter().sum::<f64>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_xor_delay_is_sum_of_stages_in_order() {
        let tech = Technology::default();
        let xor = Xor2::new("X1", "A", "B", "Y", &tech).unwrap();
        let [g1, g2, g3, g4] = &xor.stages;
        let load = 5e-14;
        let expected = g1
            .propagation_delay(5.0, g2.input_capacitance() + g3.input_capacitance())
            .unwrap()
            + g2.propagation_delay(5.0, g4.input_capacitance()).unwrap()
            + g3.propagation_delay(5.0, g4.input_capacitance()).unwrap()
            + g4.propagation_delay(5.0, load).unwrap();
        assert_relative_eq!(
            xor.propagation_delay(5.0, load).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_xor_wiring() {
        let xor = Xor2::new("X1", "A", "B", "Y", &Technology::default()).unwrap();
        assert_eq!(xor.stages[1].inputs, ["A".to_string(), "X1IN1".to_string()]);
        assert_eq!(xor.stages[2].inputs, ["B".to_string(), "X1IN1".to_string()]);
        assert_eq!(xor.stages[3].inputs, ["X1IN3".to_string(), "X1IN2".to_string()]);
        assert_eq!(xor.stages[3].output, "Y");
        assert_eq!(xor.devices().count(), 16);
    }
}
