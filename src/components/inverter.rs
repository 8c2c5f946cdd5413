//! Static CMOS inverter.

use super::mosfet::{Mosfet, Terminals};
use super::{transition_delay, Technology, Transition, GND, VCC};
use crate::error::Result;

/// One PMOS pull-up and one NMOS pull-down sharing input and output.
#[derive(Debug, Clone)]
pub struct Inverter {
    pub name: String,
    pub input: String,
    pub output: String,
    pub pmos: Mosfet,
    pub nmos: Mosfet,
}

impl Inverter {
    /// Create a new inverter from the technology templates.
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        tech: &Technology,
    ) -> Result<Self> {
        let name = name.into();
        let (input, output) = (input.into(), output.into());
        let pmos = Mosfet::new(
            format!("M{}TP", name),
            Terminals::new(&output, &input, VCC, VCC),
            tech.pmos.clone(),
        )?;
        let nmos = Mosfet::new(
            format!("M{}TN", name),
            Terminals::new(&output, &input, GND, GND),
            tech.nmos.clone(),
        )?;
        Ok(Self {
            name,
            input,
            output,
            pmos,
            nmos,
        })
    }

    pub fn drive_ratio(&self, transition: Transition) -> f64 {
        self.device(transition).params().w_over_l()
    }

    pub fn input_capacitance(&self) -> f64 {
        self.pmos.gate_capacitance() + self.nmos.gate_capacitance()
    }

    /// An inverter has no node besides its interface.
    pub fn internal_capacitance(&self, _v1: f64, _v2: f64) -> Result<f64> {
        Ok(0.0)
    }

    pub fn transition_delay(&self, transition: Transition, vcc: f64, load: f64) -> Result<f64> {
        let (v1, v2) = transition.swing(vcc);
        let total = load + self.internal_capacitance(v1, v2)?;
        let device = self.device(transition);
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
        [&self.pmos, &self.nmos].into_iter()
    }

    fn device(&self, transition: Transition) -> &Mosfet {
        match transition {
            Transition::Fall => &self.nmos,
            Transition::Rise => &self.pmos,
        }
    }
}
