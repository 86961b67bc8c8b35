//! Structural model validation.
//!
//! Catches what the schema alone cannot: duplicate names, dangling
//! connection endpoints, and unusable run settings. Port names and
//! parameter names belong to component types and are checked when the model
//! is instantiated against a factory.

use crate::schema::{ModelDef, SystemDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    let s = &model.settings;
    if !(s.timestep.is_finite() && s.timestep > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "settings.timestep".to_string(),
            value: s.timestep.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    if !(s.start_time.is_finite() && s.stop_time.is_finite()) || s.stop_time < s.start_time {
        return Err(ValidationError::InvalidValue {
            field: "settings.stop_time".to_string(),
            value: s.stop_time.to_string(),
            reason: "window must be finite with stop_time >= start_time".to_string(),
        });
    }
    validate_system(&model.system, &model.name)
}

fn validate_system(system: &SystemDef, context: &str) -> Result<(), ValidationError> {
    let mut names: HashSet<&str> = HashSet::new();
    for comp in &system.components {
        if !names.insert(&comp.name) {
            return Err(ValidationError::DuplicateName {
                name: comp.name.clone(),
                context: context.to_string(),
            });
        }
    }
    for sub in &system.subsystems {
        if !names.insert(&sub.name) {
            return Err(ValidationError::DuplicateName {
                name: sub.name.clone(),
                context: context.to_string(),
            });
        }
    }

    for conn in &system.connections {
        for ep in [&conn.from, &conn.to] {
            if !names.contains(ep.component.as_str()) {
                return Err(ValidationError::MissingReference {
                    name: ep.component.clone(),
                    context: format!("{context} connections"),
                });
            }
        }
    }

    for log in &system.logs {
        if !names.contains(log.component.as_str()) {
            return Err(ValidationError::MissingReference {
                name: log.component.clone(),
                context: format!("{context} logs"),
            });
        }
    }

    for sub in &system.subsystems {
        let inner_context = format!("{context}/{}", sub.name);
        let inner_names: HashSet<&str> = sub
            .system
            .components
            .iter()
            .map(|c| c.name.as_str())
            .chain(sub.system.subsystems.iter().map(|s| s.name.as_str()))
            .collect();
        for port in &sub.ports {
            if !inner_names.contains(port.component.as_str()) {
                return Err(ValidationError::MissingReference {
                    name: port.component.clone(),
                    context: format!("{inner_context} ports"),
                });
            }
        }
        let mut port_names = HashSet::new();
        for port in &sub.ports {
            if !port_names.insert(&port.name) {
                return Err(ValidationError::DuplicateName {
                    name: port.name.clone(),
                    context: format!("{inner_context} ports"),
                });
            }
        }
        validate_system(&sub.system, &inner_context)?;
    }

    Ok(())
}
