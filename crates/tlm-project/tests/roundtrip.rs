//! Format round-trips and defaulting behavior.

use tlm_project::*;

const HYDRAULIC_YAML: &str = r#"
name: orifice-test
settings:
  stop_time: 0.1
  timestep: 0.001
  log_samples: 50
system:
  components:
    - name: supply
      type: HydraulicPressureSourceC
      parameters:
        p: 2.0e7
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
"#;

#[test]
fn yaml_parses_with_defaults() {
    let model = from_yaml_str(HYDRAULIC_YAML).unwrap();
    assert_eq!(model.name, "orifice-test");
    assert_eq!(model.settings.start_time, 0.0);
    assert_eq!(model.settings.stop_time, 0.1);
    assert_eq!(model.settings.log_samples, 50);
    assert_eq!(model.system.components.len(), 3);
    assert_eq!(model.system.connections.len(), 2);
    assert_eq!(
        model.system.components[0].parameters.get("p"),
        Some(&2.0e7)
    );
}

#[test]
fn yaml_round_trip_preserves_model() {
    let model = from_yaml_str(HYDRAULIC_YAML).unwrap();
    let restored = from_yaml_str(&to_yaml_string(&model).unwrap()).unwrap();
    assert_eq!(model, restored);
}

#[test]
fn json_round_trip_preserves_model() {
    let model = from_yaml_str(HYDRAULIC_YAML).unwrap();
    let json = serde_json::to_string(&model).unwrap();
    let restored = from_json_str(&json).unwrap();
    assert_eq!(model, restored);
}

#[test]
fn subsystem_definitions_round_trip() {
    let yaml = r#"
name: nested
system:
  components:
    - name: supply
      type: HydraulicPressureSourceC
  subsystems:
    - name: load
      cqs: C
      ports:
        - { name: P1, component: volume, port: P1 }
      system:
        components:
          - name: volume
            type: HydraulicVolume
  connections:
    - from: { component: supply, port: P1 }
      to: { component: load, port: P1 }
"#;
    let model = from_yaml_str(yaml).unwrap();
    assert_eq!(model.system.subsystems.len(), 1);
    assert_eq!(model.system.subsystems[0].cqs, CqsDef::C);
    let restored = from_yaml_str(&to_yaml_string(&model).unwrap()).unwrap();
    assert_eq!(model, restored);
}

#[test]
fn invalid_model_fails_to_load() {
    let yaml = r#"
name: broken
system:
  components:
    - name: a
      type: SignalConstant
  connections:
    - from: { component: a, port: out }
      to: { component: missing, port: in }
"#;
    assert!(matches!(
        from_yaml_str(yaml),
        Err(ProjectError::Validation(_))
    ));
}
