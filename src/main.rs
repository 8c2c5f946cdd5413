//! Gatedelay - CMOS gate network delay estimator
//!
//! Estimates the propagation delay of every input-to-output path of a gate
//! netlist and reports the critical delay per primary output.
//!
//! # Usage
//!
//! ```bash
//! gatedelay adder.net --paths --spice
//! RUST_LOG=debug gatedelay adder.net --vcc 3.3
//! ```

use std::path::PathBuf;

use clap::Parser;
use gatedelay_core::{
    error::Result, netlist, spice, AnalysisConfig, Circuit, DelayAnalyzer, Technology,
};

/// CMOS gate network delay estimator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the gate netlist
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Supply voltage in volts (overrides the netlist's vcc line)
    #[arg(long)]
    vcc: Option<f64>,

    /// List every path with its delay
    #[arg(short, long)]
    paths: bool,

    /// Append SPICE device cards for every transistor
    #[arg(short, long)]
    spice: bool,

    /// Evaluate paths on a single thread
    #[arg(long)]
    sequential: bool,

    /// PMOS channel width in micrometres
    #[arg(long, value_name = "UM")]
    pmos_width: Option<f64>,

    /// NMOS channel width in micrometres
    #[arg(long, value_name = "UM")]
    nmos_width: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut tech = Technology::default();
    if let Some(w) = args.pmos_width {
        tech = tech.with_pmos_width(w);
    }
    if let Some(w) = args.nmos_width {
        tech = tech.with_nmos_width(w);
    }

    let mut config = AnalysisConfig::new().with_sequential(args.sequential);
    if let Some(vcc) = args.vcc {
        config = config.with_supply_voltage(vcc);
    }

    // Parse and build the circuit
    let netlist = netlist::parse_file(&args.netlist)?;
    let circuit = Circuit::from_netlist(&netlist, &tech)?;

    // Evaluate every path
    let report = DelayAnalyzer::new(&circuit, config)?.run()?;
    print!("{}", report.display(&circuit, args.paths));

    if args.spice {
        println!();
        print!("{}", spice::circuit_to_string(&circuit));
    }

    Ok(())
}
