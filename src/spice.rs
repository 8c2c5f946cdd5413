//! SPICE device-card emission.
//!
//! Renders each transistor as an instance line followed by its `.MODEL`
//! card, scaled back from the internal CGS units to the units SPICE expects.

use std::fmt::{self, Write};

use crate::circuit::Circuit;
use crate::components::{ChannelType, Mosfet};

/// Two-digit mantissa scientific notation with a signed two-digit exponent
/// (e.g. `1.23E-04`).
fn sci(value: f64) -> String {
    let formatted = format!("{:.2E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}E{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

/// Write the instance line and model card of one device.
pub fn write_device<W: Write>(out: &mut W, device: &Mosfet) -> fmt::Result {
    let p = device.params();
    let d = device.derived();
    let t = device.terminals();
    let fet = match p.channel {
        ChannelType::N => "NMOS",
        ChannelType::P => "PMOS",
    };

    writeln!(
        out,
        "{} {} {} {} {} {} L={}U W={}U AS={}P PS={}U AD={}P PD={}U",
        device.name(),
        t.drain,
        t.gate,
        t.source,
        t.bulk,
        p.model,
        p.l,
        p.w,
        d.source_area * 1e8,
        d.source_perimeter * 1e4,
        d.drain_area * 1e8,
        d.drain_perimeter * 1e4,
    )?;
    writeln!(
        out,
        ".MODEL {} {} (VTO={} KP={:.2}U GAMMA={:.2} PHI={:.2} PB={:.3} CJ={} CJSW={} CGSO={} CGDO={} MJ={:.2} MJSW={:.2} LEVEL={})",
        p.model,
        fet,
        p.vto,
        d.kp * 1e6,
        d.gamma,
        d.phi.abs(),
        d.pb,
        sci(d.cj * 1e4),
        sci(d.cjsw * 1e2),
        sci(d.cgso * 1e2),
        sci(d.cgdo * 1e2),
        p.mj,
        p.mjsw,
        p.level,
    )
}

/// Write every device of every gate, in netlist order.
pub fn write_circuit<W: Write>(out: &mut W, circuit: &Circuit) -> fmt::Result {
    for placed in circuit.gates() {
        for device in placed.gate.devices() {
            write_device(out, device)?;
        }
    }
    Ok(())
}

/// Render every device card of a circuit to a string.
pub fn circuit_to_string(circuit: &Circuit) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_circuit(&mut out, circuit);
    out
}
