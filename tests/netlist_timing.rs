//! End-to-end timing of small netlists.

use approx::assert_relative_eq;
use gatedelay_core::components::{Gate, GateKind, Nand2, Technology, Transition, Xor2};
use gatedelay_core::error::ErrorKind;
use gatedelay_core::{netlist, AnalysisConfig, Circuit, DelayAnalyzer, DelayError, TimingReport};

fn analyze(input: &str) -> (Circuit, TimingReport) {
    let netlist = netlist::parse(input).unwrap();
    let circuit = Circuit::from_netlist(&netlist, &Technology::default()).unwrap();
    let report = DelayAnalyzer::new(&circuit, AnalysisConfig::new())
        .unwrap()
        .run()
        .unwrap();
    (circuit, report)
}

#[test]
fn single_nand_matches_closed_form() {
    let (_, report) = analyze("vcc 5\nnand A B OUT G1\n");
    assert_eq!(report.outputs.len(), 1);

    let out = report.output("OUT").unwrap();
    assert_eq!(out.paths.len(), 2);
    let delay = out.critical_delay();
    assert!(delay > 0.0 && delay < 1e-9, "delay = {delay}");
    // Reference 1.2 um process, vcc = 5 V, no external load
    assert_relative_eq!(delay, 4.69792624481023e-11, max_relative = 1e-12);

    let nand = Nand2::new("G1", "A", "B", "OUT", &Technology::default()).unwrap();
    let mut edges = Vec::new();
    for transition in [Transition::Fall, Transition::Rise] {
        let (v1, v2) = transition.swing(5.0);
        let device = match transition {
            Transition::Fall => &nand.nmos[0],
            Transition::Rise => &nand.pmos[0],
        };
        let vt = device.threshold_magnitude();
        let vd = 5.0 - vt;
        let load = nand.internal_capacitance(v1, v2).unwrap();
        let drive = nand.drive_ratio(transition) * device.derived().kp;
        edges.push(load / (drive * vd) * (2.0 * vt / vd + (4.0 * vd / 5.0 - 1.0).ln()));
    }
    assert_relative_eq!(delay, (edges[0] + edges[1]) / 2.0, max_relative = 1e-12);
}

#[test]
fn both_inputs_of_a_nand_see_the_same_delay() {
    let (_, report) = analyze("vcc 5\nnand A B OUT G1\n");
    let paths = &report.outputs[0].paths;
    assert_eq!(paths[0].delay, paths[1].delay);
}

#[test]
fn diamond_has_two_paths() {
    let (circuit, report) = analyze("vcc 5\ninv A B I1\ninv A C I2\nnand B C OUT G1\n");
    assert_eq!(circuit.primary_inputs().len(), 1);
    assert_eq!(circuit.primary_outputs().len(), 1);
    assert_eq!(report.output("OUT").unwrap().paths.len(), 2);
}

#[test]
fn xor_delay_is_sum_of_its_stages() {
    let (_, report) = analyze("vcc 5\nxor A B OUT X1\ncout OUT 30f\n");
    let xor = Xor2::new("X1", "A", "B", "OUT", &Technology::default()).unwrap();
    let stages = xor.stage_delays(5.0, 30e-15).unwrap();
    assert_eq!(stages.len(), 4);
    assert_relative_eq!(
        report.outputs[0].critical_delay(),
        stages.iter().sum::<f64>(),
        max_relative = 1e-12
    );
}

#[test]
fn half_adder_report() {
    let input = "\
# Half adder
vcc 5
xor A B SUM X1
and A B CARRY A1
cload SUM 20f
";
    let (circuit, report) = analyze(input);
    assert_eq!(report.outputs.len(), 2);
    for name in ["SUM", "CARRY"] {
        let out = report.output(name).unwrap();
        assert_eq!(out.paths.len(), 2);
        assert!(out.critical_delay() > 0.0);
    }

    // Each primary input drives one XOR and one AND input.
    let tech = Technology::default();
    let inputs = ["A".to_string(), "B".to_string()];
    let xor = Gate::new(GateKind::Xor2, "X", &inputs, "S", &tech).unwrap();
    let and = Gate::new(GateKind::And2, "Y", &inputs, "C", &tech).unwrap();
    let analyzer = DelayAnalyzer::new(&circuit, AnalysisConfig::new()).unwrap();
    let a = circuit.find_node("A").unwrap();
    assert_relative_eq!(
        analyzer.load(a),
        xor.input_capacitance() + and.input_capacitance(),
        max_relative = 1e-12
    );

    let text = report.display(&circuit, true).to_string();
    assert!(text.starts_with("vcc = 5 V"));
    assert!(text.contains("A -> X1:"));
    assert!(text.contains("B -> A1:"));
    assert_eq!(text.matches("critical:").count(), 2);
}

#[test]
fn supply_override_changes_delay() {
    let netlist = netlist::parse("vcc 5\ninv A OUT I1\ncout OUT 10f\n").unwrap();
    let circuit = Circuit::from_netlist(&netlist, &Technology::default()).unwrap();
    let at_5 = DelayAnalyzer::new(&circuit, AnalysisConfig::new())
        .unwrap()
        .run()
        .unwrap();
    let at_3 = DelayAnalyzer::new(&circuit, AnalysisConfig::new().with_supply_voltage(3.3))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(at_3.supply_voltage, 3.3);
    assert!(at_3.outputs[0].critical_delay() > at_5.outputs[0].critical_delay());
}

#[test]
fn conflicting_drivers_are_rejected() {
    let netlist = netlist::parse("inv A OUT I1\ninv B OUT I2\n").unwrap();
    let err = Circuit::from_netlist(&netlist, &Technology::default()).unwrap_err();
    assert!(matches!(err, DelayError::DriverConflict { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn unknown_suffix_is_a_parse_error() {
    let err = netlist::parse("cout OUT 5q\n").unwrap_err();
    assert!(matches!(err, DelayError::InvalidValue { line: 1, .. }));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn feedback_loop_is_structural_error() {
    let netlist = netlist::parse("vcc 5\nnand A Q N G1\ninv N Q I1\ninv Q OUT I2\n").unwrap();
    let circuit = Circuit::from_netlist(&netlist, &Technology::default()).unwrap();
    let err = DelayAnalyzer::new(&circuit, AnalysisConfig::new())
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, DelayError::CombinationalLoop { .. }));
    assert_eq!(err.kind(), ErrorKind::Structural);
}
