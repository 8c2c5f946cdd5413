//! MOSFET device model.
//!
//! Derives the electrical quantities a first-order delay estimate needs from
//! device geometry and process parameters. Every derived value is computed
//! once at construction; a [`Mosfet`] is never mutated afterwards.
//!
//! Inputs follow the usual process-sheet units (um, nm, cm^-3, cm^2/Vs).
//! Derived values are kept in CGS: F/cm^2 for area capacitance, F/cm for
//! sidewall capacitance, cm and cm^2 for lengths and areas.

use crate::error::{DelayError, Result};
use crate::{ELECTRON_CHARGE, EPSILON_OX, EPSILON_SI, SILICON_NI, THERMAL_VOLTAGE};

/// Micrometres to centimetres.
const UM_TO_CM: f64 = 1e-4;

/// Channel doping type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    N,
    P,
}

/// Geometry and process parameters for a MOSFET.
#[derive(Debug, Clone, PartialEq)]
pub struct MosfetParams {
    /// Model card name used when emitting SPICE (e.g. "NM1")
    pub model: String,
    /// Channel type
    pub channel: ChannelType,
    /// SPICE model level (only carried through to emission)
    pub level: u32,
    /// Channel width (um)
    pub w: f64,
    /// Drawn channel length (um)
    pub l: f64,
    /// Lateral diffusion under the gate (um)
    pub ld: f64,
    /// Source diffusion length (um)
    pub ls: f64,
    /// Drain diffusion length (um)
    pub ldrain: f64,
    /// Surface mobility (cm^2/Vs)
    pub uo: f64,
    /// Oxide thickness (nm)
    pub tox: f64,
    /// Substrate doping (cm^-3)
    pub nsub: f64,
    /// Sidewall doping (cm^-3)
    pub nsubsw: f64,
    /// Source/drain doping (cm^-3)
    pub nds: f64,
    /// Zero-bias threshold voltage (V)
    pub vto: f64,
    /// Channel-length modulation (1/V)
    pub lambda: f64,
    /// Bulk junction grading coefficient
    pub mj: f64,
    /// Sidewall junction grading coefficient
    pub mjsw: f64,
    /// Drive coefficient override (uA/V^2)
    pub kp: Option<f64>,
    /// Junction depth override (um)
    pub xj: Option<f64>,
    /// Body-effect coefficient override (V^0.5)
    pub gamma: Option<f64>,
    /// Oxide capacitance override (fF/um^2)
    pub cox: Option<f64>,
}

impl MosfetParams {
    /// Reference 1.2 um PMOS used by the default technology.
    pub fn reference_pmos() -> Self {
        Self {
            model: "PM1".to_string(),
            channel: ChannelType::P,
            w: 5.0 * 18.6,
            vto: -1.0,
            cox: Some(6.0),
            ..Self::reference_nmos()
        }
    }

    /// Reference 1.2 um NMOS used by the default technology.
    pub fn reference_nmos() -> Self {
        Self {
            model: "NM1".to_string(),
            channel: ChannelType::N,
            level: 3,
            w: 5.0 * 4.7,
            l: 1.2,
            ld: 0.25,
            ls: 3.5,
            ldrain: 3.9,
            uo: 1000.0,
            tox: 60.0,
            nsub: 1e15,
            nsubsw: 2.1e16,
            nds: 1e20,
            vto: 0.8,
            lambda: 0.0,
            mj: 0.5,
            mjsw: 0.5,
            kp: None,
            xj: Some(0.8),
            gamma: None,
            cox: Some(12.0),
        }
    }

    /// Width over drawn length.
    pub fn w_over_l(&self) -> f64 {
        self.w / self.l
    }

    fn validate(&self, name: &str) -> Result<()> {
        let positive = [
            ("W", self.w),
            ("L", self.l),
            ("NSUB", self.nsub),
            ("NSUBSW", self.nsubsw),
            ("NDS", self.nds),
        ];
        for (param, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DelayError::domain(
                    name,
                    format!("{} must be positive, got {}", param, value),
                ));
            }
        }

        let non_negative = [("LD", self.ld), ("LS", self.ls), ("LDRAIN", self.ldrain)];
        for (param, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DelayError::domain(
                    name,
                    format!("{} must be non-negative, got {}", param, value),
                ));
            }
        }

        let overrides = [
            ("KP", self.kp),
            ("XJ", self.xj),
            ("COX", self.cox),
        ];
        for (param, value) in overrides {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(DelayError::domain(
                        name,
                        format!("{} override must be positive, got {}", param, v),
                    ));
                }
            }
        }
        if let Some(gamma) = self.gamma {
            if !gamma.is_finite() {
                return Err(DelayError::domain(
                    name,
                    format!("GAMMA override must be finite, got {}", gamma),
                ));
            }
        }

        if self.cox.is_none() && !(self.tox.is_finite() && self.tox > 0.0) {
            return Err(DelayError::domain(
                name,
                format!("TOX must be positive, got {}", self.tox),
            ));
        }
        if self.kp.is_none() && !(self.uo.is_finite() && self.uo > 0.0) {
            return Err(DelayError::domain(
                name,
                format!("UO must be positive, got {}", self.uo),
            ));
        }
        if !self.vto.is_finite() {
            return Err(DelayError::domain(name, "VTO must be finite"));
        }
        if self.l - 2.0 * self.ld <= 0.0 {
            return Err(DelayError::domain(
                name,
                format!(
                    "effective channel length L - 2*LD is not positive (L={}, LD={})",
                    self.l, self.ld
                ),
            ));
        }

        Ok(())
    }
}

/// Terminal node names of a placed transistor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminals {
    pub drain: String,
    pub gate: String,
    pub source: String,
    pub bulk: String,
}

impl Terminals {
    pub fn new(
        drain: impl Into<String>,
        gate: impl Into<String>,
        source: impl Into<String>,
        bulk: impl Into<String>,
    ) -> Self {
        Self {
            drain: drain.into(),
            gate: gate.into(),
            source: source.into(),
            bulk: bulk.into(),
        }
    }
}

/// Quantities derived from [`MosfetParams`] at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParams {
    /// Oxide capacitance per area (F/cm^2)
    pub cox: f64,
    /// Drive coefficient (A/V^2)
    pub kp: f64,
    /// Drive ratio kp * W / L (A/V^2)
    pub beta: f64,
    /// Body-effect coefficient (V^0.5)
    pub gamma: f64,
    /// Surface potential (V), negative for the usual doping range
    pub phi: f64,
    /// Bulk junction built-in potential (V)
    pub pb: f64,
    /// Sidewall junction built-in potential (V)
    pub pbsw: f64,
    /// Junction depth (cm)
    pub xj: f64,
    /// Zero-bias bulk junction capacitance (F/cm^2)
    pub cj: f64,
    /// Zero-bias sidewall junction capacitance (F/cm)
    pub cjsw: f64,
    /// Gate-source overlap capacitance (F/cm)
    pub cgso: f64,
    /// Gate-drain overlap capacitance (F/cm)
    pub cgdo: f64,
    /// Effective channel length (um)
    pub leff: f64,
    /// Source area (cm^2)
    pub source_area: f64,
    /// Drain area (cm^2)
    pub drain_area: f64,
    /// Source perimeter (cm)
    pub source_perimeter: f64,
    /// Drain perimeter (cm)
    pub drain_perimeter: f64,
}

impl DerivedParams {
    fn from_params(name: &str, p: &MosfetParams) -> Result<Self> {
        let cox = match p.cox {
            Some(cox) => cox * 1e-8,
            None => EPSILON_OX / (p.tox * 1e-7),
        };
        let kp = match p.kp {
            Some(kp) => kp * 1e-6,
            None => p.uo * cox,
        };
        let beta = kp * p.w / p.l;
        let gamma = p
            .gamma
            .unwrap_or_else(|| (2.0 * EPSILON_SI * ELECTRON_CHARGE * p.nsub).sqrt() / cox);

        let phi = 2.0 * THERMAL_VOLTAGE * (SILICON_NI / p.nsub).ln();
        let pb = built_in_potential(name, "PB", p.nsub, p.nds)?;
        let pbsw = built_in_potential(name, "PBSW", p.nsubsw, p.nds)?;

        let xj = match p.xj {
            Some(xj) => xj * UM_TO_CM,
            None => {
                let width = 2.0 * EPSILON_SI * pb / ELECTRON_CHARGE;
                let doping = (p.nsub + p.nds) / (p.nsub * p.nds);
                (width * doping).sqrt()
            }
        };

        let cj = (EPSILON_SI * ELECTRON_CHARGE / (2.0 * pb) * series_doping(p.nsub, p.nds)).sqrt();
        let cjsw = xj
            * (EPSILON_SI * ELECTRON_CHARGE / (2.0 * pbsw) * series_doping(p.nsubsw, p.nds)).sqrt();
        let cgso = cox * p.ld * UM_TO_CM;

        Ok(Self {
            cox,
            kp,
            beta,
            gamma,
            phi,
            pb,
            pbsw,
            xj,
            cj,
            cjsw,
            cgso,
            cgdo: cgso,
            leff: p.l - 2.0 * p.ld,
            source_area: p.w * p.ls * 1e-8,
            drain_area: p.w * p.ldrain * 1e-8,
            source_perimeter: (p.w + 2.0 * p.ls) * UM_TO_CM,
            drain_perimeter: (p.w + 2.0 * p.ldrain) * UM_TO_CM,
        })
    }
}

/// Junction built-in potential from the mass-action law.
fn built_in_potential(name: &str, param: &str, na: f64, nd: f64) -> Result<f64> {
    let potential = THERMAL_VOLTAGE * (na * nd / (SILICON_NI * SILICON_NI)).ln();
    if potential > 0.0 && potential.is_finite() {
        Ok(potential)
    } else {
        Err(DelayError::domain(
            name,
            format!("{} is not positive ({:.3e}); doping product below ni^2", param, potential),
        ))
    }
}

fn series_doping(a: f64, b: f64) -> f64 {
    a * b / (a + b)
}

/// A placed MOSFET with its derived parameters.
#[derive(Debug, Clone)]
pub struct Mosfet {
    name: String,
    terminals: Terminals,
    params: MosfetParams,
    derived: DerivedParams,
}

impl Mosfet {
    /// Create a new MOSFET, deriving all electrical parameters.
    pub fn new(name: impl Into<String>, terminals: Terminals, params: MosfetParams) -> Result<Self> {
        let name = name.into();
        params.validate(&name)?;
        let derived = DerivedParams::from_params(&name, &params)?;
        Ok(Self {
            name,
            terminals,
            params,
            derived,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terminals(&self) -> &Terminals {
        &self.terminals
    }

    pub fn params(&self) -> &MosfetParams {
        &self.params
    }

    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    pub fn channel(&self) -> ChannelType {
        self.params.channel
    }

    /// Magnitude of the zero-bias threshold voltage.
    pub fn threshold_magnitude(&self) -> f64 {
        self.params.vto.abs()
    }

    /// Threshold voltage with body effect for a given source-bulk voltage.
    ///
    /// `vto + gamma * (sqrt(|vsb - phi|) - sqrt(|phi|))`. The absolute values
    /// keep the expression defined for either sign of `vsb`.
    pub fn threshold_with_body_effect(&self, vsb: f64) -> f64 {
        let d = &self.derived;
        self.params.vto + d.gamma * ((-d.phi + vsb).abs().sqrt() - d.phi.abs().sqrt())
    }

    /// Linearized bulk junction capacitance factor over a voltage swing.
    pub fn junction_linearization(&self, v1: f64, v2: f64) -> Result<f64> {
        self.linearize(self.derived.pb, "bulk", v1, v2)
    }

    /// Linearized sidewall junction capacitance factor over a voltage swing.
    pub fn sidewall_linearization(&self, v1: f64, v2: f64) -> Result<f64> {
        self.linearize(self.derived.pbsw, "sidewall", v1, v2)
    }

    /// Step-junction average of the depletion capacitance between two
    /// reverse biases, normalized to the zero-bias value.
    fn linearize(&self, pb: f64, junction: &str, v1: f64, v2: f64) -> Result<f64> {
        let (r1, r2) = (pb + v1, pb + v2);
        if r1 <= 0.0 || r2 <= 0.0 {
            return Err(DelayError::domain(
                &self.name,
                format!(
                    "{} junction forward biased beyond built-in potential {:.4} V (v1={}, v2={})",
                    junction, pb, v1, v2
                ),
            ));
        }

        if v1 == v2 {
            return Ok((pb / r1).sqrt());
        }

        // Swing is measured on the negated biases.
        let (n1, n2) = (-v1, -v2);
        let x = (pb - n2).sqrt() - (pb - n1).sqrt();
        let y = -2.0 * pb.sqrt() / (n2 - n1);
        Ok(y * x)
    }

    /// Drain-to-body junction capacitance over a voltage swing (F).
    pub fn drain_body_capacitance(&self, v1: f64, v2: f64) -> Result<f64> {
        let d = &self.derived;
        let area = d.drain_area + self.params.w * d.xj * UM_TO_CM;
        Ok(area * d.cj * self.junction_linearization(v1, v2)?
            + d.drain_perimeter * d.cjsw * self.sidewall_linearization(v1, v2)?)
    }

    /// Gate oxide plus overlap capacitance (F).
    pub fn gate_capacitance(&self) -> f64 {
        let cox = self.derived.cox;
        let w = self.params.w * UM_TO_CM;
        let l = self.params.l * UM_TO_CM;
        let ld = self.params.ld * UM_TO_CM;
        cox * w * (l + 2.0 * ld) + 2.0 * cox * w * ld
    }
}
