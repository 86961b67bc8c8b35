//! Component parameters.

use crate::error::{ModelError, ModelResult};
use std::collections::HashMap;
use tlm_core::PortId;

/// Where a parameter value comes from at simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamBinding {
    /// A plain number, settable before initialization.
    Literal(f64),
    /// The value is read from a connected signal port each step; the port id
    /// is local to the owning component.
    SignalPort(PortId),
}

/// One registered parameter: metadata plus current binding.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub default: f64,
    pub binding: ParamBinding,
}

/// Ordered parameter collection with name lookup.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    params: Vec<Parameter>,
    by_name: HashMap<String, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter with its metadata; the initial binding is the
    /// literal default. Re-registering a name replaces the entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        default: f64,
    ) {
        let name = name.into();
        let param = Parameter {
            name: name.clone(),
            description: description.into(),
            unit: unit.into(),
            default,
            binding: ParamBinding::Literal(default),
        };
        if let Some(&i) = self.by_name.get(&name) {
            self.params[i] = param;
        } else {
            self.by_name.insert(name, self.params.len());
            self.params.push(param);
        }
    }

    /// Set a literal value; fails on unknown names so typos in model files
    /// surface at load time.
    pub fn set(&mut self, name: &str, value: f64) -> ModelResult<()> {
        let i = *self
            .by_name
            .get(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        self.params[i].binding = ParamBinding::Literal(value);
        Ok(())
    }

    /// Bind the parameter to a signal port of the owning component.
    pub fn bind_to_port(&mut self, name: &str, port: PortId) -> ModelResult<()> {
        let i = *self
            .by_name
            .get(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        self.params[i].binding = ParamBinding::SignalPort(port);
        Ok(())
    }

    /// Current literal value; the registered default for port-bound
    /// parameters (those are read through the node at simulation time).
    pub fn value(&self, name: &str) -> ModelResult<f64> {
        let i = *self
            .by_name
            .get(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        Ok(match self.params[i].binding {
            ParamBinding::Literal(v) => v,
            ParamBinding::SignalPort(_) => self.params[i].default,
        })
    }

    pub fn binding(&self, name: &str) -> ModelResult<ParamBinding> {
        let i = *self
            .by_name
            .get(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        Ok(self.params[i].binding)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
