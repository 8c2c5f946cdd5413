//! WASM bindings for Gatedelay Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDelayAnalyzer } from 'gatedelay_core';
//!
//! await init();
//!
//! const analyzer = new WasmDelayAnalyzer(`
//!   vcc 5
//!   xor A B SUM X1
//!   and A B CARRY A1
//! `);
//!
//! for (let i = 0; i < analyzer.output_count(); i++) {
//!   console.log(analyzer.output_name(i), analyzer.critical_delay(i));
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::analysis::{AnalysisConfig, DelayAnalyzer, TimingReport};
use crate::circuit::Circuit;
use crate::components::Technology;
use crate::error::DelayError;
use crate::netlist;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: DelayError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Analyzed netlist exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmDelayAnalyzer {
    report: TimingReport,
}

#[wasm_bindgen]
impl WasmDelayAnalyzer {
    /// Analyze a netlist with the reference technology.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmDelayAnalyzer, JsValue> {
        Self::with_supply(netlist, f64::NAN)
    }

    /// Analyze a netlist at a given supply voltage.
    ///
    /// Pass `NaN` to use the netlist's own `vcc` line.
    #[wasm_bindgen]
    pub fn with_supply(netlist: &str, vcc: f64) -> Result<WasmDelayAnalyzer, JsValue> {
        let parsed = netlist::parse(netlist).map_err(to_js)?;
        let circuit = Circuit::from_netlist(&parsed, &Technology::default()).map_err(to_js)?;

        // Threads are unavailable in the browser.
        let mut config = AnalysisConfig::new().with_sequential(true);
        if !vcc.is_nan() {
            config = config.with_supply_voltage(vcc);
        }
        let report = DelayAnalyzer::new(&circuit, config)
            .and_then(|a| a.run())
            .map_err(to_js)?;

        Ok(WasmDelayAnalyzer { report })
    }

    /// Number of primary outputs.
    #[wasm_bindgen]
    pub fn output_count(&self) -> usize {
        self.report.outputs.len()
    }

    /// Name of the primary output at `index`.
    #[wasm_bindgen]
    pub fn output_name(&self, index: usize) -> Result<String, JsValue> {
        self.report
            .outputs
            .get(index)
            .map(|o| o.name.clone())
            .ok_or_else(|| out_of_range(index))
    }

    /// Critical delay in seconds of the primary output at `index`.
    #[wasm_bindgen]
    pub fn critical_delay(&self, index: usize) -> Result<f64, JsValue> {
        self.report
            .outputs
            .get(index)
            .map(|o| o.critical_delay())
            .ok_or_else(|| out_of_range(index))
    }

    /// Supply voltage the analysis used.
    #[wasm_bindgen]
    pub fn supply_voltage(&self) -> f64 {
        self.report.supply_voltage
    }
}

fn out_of_range(index: usize) -> JsValue {
    to_js(DelayError::WasmError {
        message: format!("output index {} out of range", index),
    })
}
