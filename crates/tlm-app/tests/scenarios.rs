//! End-to-end model scenarios, loaded from YAML.

use tlm_app::Essentials;
use tlm_graph::domain::signal;

const ORIFICE_MODEL: &str = r#"
name: orifice-line
settings:
  stop_time: 0.1
  timestep: 0.001
system:
  components:
    - name: supply
      type: HydraulicPressureSourceC
      parameters:
        p: 1.0e5
    - name: orifice
      type: HydraulicLaminarOrifice
      parameters:
        Kc: 1.0e-11
    - name: tank
      type: HydraulicPressureSourceC
      parameters:
        p: 0.0
  connections:
    - from: { component: supply, port: P1 }
      to: { component: orifice, port: P1 }
    - from: { component: orifice, port: P2 }
      to: { component: tank, port: P1 }
  logs:
    - { component: orifice, port: P2, slot: Flow }
    - { component: orifice, port: P1, slot: Pressure }
"#;

/// Source at 1e5 Pa through a laminar orifice (Kc = 1e-11) into an empty
/// tank: q = 1e-6 m^3/s and p1 = 1e5 Pa, already after the first step.
#[test]
fn orifice_line_reaches_expected_operating_point() {
    let mut ess = Essentials::new();
    let model = tlm_project::from_yaml_str(ORIFICE_MODEL).unwrap();
    let mut sys = ess.build_model(&model).unwrap();

    assert!(ess.initialize(&mut sys, model.settings.start_time, model.settings.stop_time));
    assert!(ess.simulate(&mut sys, model.settings.stop_time));
    ess.finalize(&mut sys);

    let q = *sys
        .logger()
        .series("orifice.P2.Flow")
        .unwrap()
        .last()
        .unwrap();
    let p1 = *sys
        .logger()
        .series("orifice.P1.Pressure")
        .unwrap()
        .last()
        .unwrap();
    assert!((q - 1e-6).abs() < 1e-15, "q = {q}");
    assert!((p1 - 1e5).abs() < 1e-9, "p1 = {p1}");

    // Zero-impedance sources: the very first logged step is already there.
    let first_q = sys.logger().series("orifice.P2.Flow").unwrap()[1];
    assert!((first_q - 1e-6).abs() < 1e-15);

    let messages = ess.drain_messages();
    assert!(
        messages
            .iter()
            .all(|m| m.severity < tlm_model::Severity::Error),
        "unexpected errors: {messages:?}"
    );
}

const GAIN_CHAIN_MODEL: &str = r#"
name: gain-chain
settings:
  stop_time: 0.01
  timestep: 0.001
system:
  components:
    - name: sink
      type: SignalSink
    - name: gain3
      type: SignalGain
      parameters: { k: 3.0 }
    - name: gain2
      type: SignalGain
      parameters: { k: 2.0 }
    - name: source
      type: SignalConstant
      parameters: { y: 1.0 }
  connections:
    - from: { component: source, port: out }
      to: { component: gain2, port: in }
    - from: { component: gain2, port: out }
      to: { component: gain3, port: in }
    - from: { component: gain3, port: out }
      to: { component: sink, port: in }
"#;

/// Components are declared sink-first; the sorter must still deliver
/// 1.0 * 2 * 3 = 6.0 at the sink after a single step.
#[test]
fn gain_chain_delivers_six() {
    let mut ess = Essentials::new();
    let model = tlm_project::from_yaml_str(GAIN_CHAIN_MODEL).unwrap();
    let mut sys = ess.build_model(&model).unwrap();

    let dt = sys.timestep();
    assert!(ess.initialize(&mut sys, 0.0, model.settings.stop_time));
    assert!(ess.simulate(&mut sys, dt));

    let node = sys.node_of("sink", "in").unwrap().unwrap();
    let value = ess
        .store_ref()
        .read(ess.store_ref().slot_ref(node, signal::VALUE).unwrap());
    assert_eq!(value, 6.0);
}

const NESTED_MODEL: &str = r#"
name: nested-supply
settings:
  stop_time: 0.01
  timestep: 0.001
system:
  components:
    - name: orifice
      type: HydraulicLaminarOrifice
    - name: tank
      type: HydraulicPressureSourceC
      parameters: { p: 0.0 }
  subsystems:
    - name: supply
      cqs: C
      ports:
        - { name: P1, component: source, port: P1 }
      system:
        components:
          - name: source
            type: HydraulicPressureSourceC
            parameters: { p: 2.0e5 }
  connections:
    - from: { component: supply, port: P1 }
      to: { component: orifice, port: P1 }
    - from: { component: orifice, port: P2 }
      to: { component: tank, port: P1 }
  logs:
    - { component: orifice, port: P2, slot: Flow }
"#;

#[test]
fn nested_model_builds_and_runs() {
    let mut ess = Essentials::new();
    let model = tlm_project::from_yaml_str(NESTED_MODEL).unwrap();
    let mut sys = ess.build_model(&model).unwrap();

    assert!(ess.initialize(&mut sys, 0.0, model.settings.stop_time));
    assert!(ess.simulate(&mut sys, model.settings.stop_time));

    let q = *sys
        .logger()
        .series("orifice.P2.Flow")
        .unwrap()
        .last()
        .unwrap();
    assert!((q - 2e-6).abs() < 1e-15, "q = {q}");
}

#[test]
fn volume_line_settles_toward_supply_pressure() {
    let yaml = r#"
name: volume-line
settings:
  stop_time: 0.5
  timestep: 0.0001
system:
  components:
    - name: supply
      type: HydraulicPressureSourceC
      parameters: { p: 1.0e6 }
    - name: inlet
      type: HydraulicLaminarOrifice
      parameters: { Kc: 1.0e-9 }
    - name: volume
      type: HydraulicVolume
      parameters: { V: 1.0e-4, Beta_e: 1.0e9, alpha: 0.1 }
    - name: outlet
      type: HydraulicLaminarOrifice
      parameters: { Kc: 1.0e-12 }
    - name: tank
      type: HydraulicPressureSourceC
      parameters: { p: 0.0 }
  connections:
    - from: { component: supply, port: P1 }
      to: { component: inlet, port: P1 }
    - from: { component: inlet, port: P2 }
      to: { component: volume, port: P1 }
    - from: { component: volume, port: P2 }
      to: { component: outlet, port: P1 }
    - from: { component: outlet, port: P2 }
      to: { component: tank, port: P1 }
  logs:
    - { component: inlet, port: P2, slot: Pressure }
"#;
    let mut ess = Essentials::new();
    let model = tlm_project::from_yaml_str(yaml).unwrap();
    let mut sys = ess.build_model(&model).unwrap();

    assert!(ess.initialize(&mut sys, 0.0, model.settings.stop_time));
    assert!(ess.simulate(&mut sys, model.settings.stop_time));

    // Inlet passes easily, outlet barely: the volume pressure must settle
    // close to the supply.
    let series = sys.logger().series("inlet.P2.Pressure").unwrap();
    let p_end = *series.last().unwrap();
    assert!(
        p_end > 0.9e6 && p_end <= 1.0e6 + 1.0,
        "volume pressure = {p_end}"
    );
}
