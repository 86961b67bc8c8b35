//! Model file schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete simulation model: one top-level system plus run settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub name: String,
    #[serde(default)]
    pub settings: SettingsDef,
    pub system: SystemDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "default_stop_time")]
    pub stop_time: f64,
    #[serde(default = "default_timestep")]
    pub timestep: f64,
    /// Requested number of logged samples; 0 keeps every step.
    #[serde(default)]
    pub log_samples: usize,
}

fn default_stop_time() -> f64 {
    1.0
}

fn default_timestep() -> f64 {
    1e-3
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: default_stop_time(),
            timestep: default_timestep(),
            log_samples: 0,
        }
    }
}

/// One system level: components, connections, nested subsystems, and log
/// requests. Component and subsystem names share a namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SystemDef {
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default)]
    pub subsystems: Vec<SubsystemDef>,
    #[serde(default)]
    pub logs: Vec<LogDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub start_values: Vec<StartValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartValueDef {
    pub port: String,
    pub slot: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: EndpointDef,
    pub to: EndpointDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointDef {
    pub component: String,
    pub port: String,
}

/// A nested system embedded as a TLM boundary component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsystemDef {
    pub name: String,
    pub cqs: CqsDef,
    /// Boundary ports, each shadowing a port of an inner component.
    #[serde(default)]
    pub ports: Vec<SystemPortDef>,
    pub system: SystemDef,
}

/// Causality of a subsystem boundary; containers must pick a side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CqsDef {
    C,
    Q,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemPortDef {
    pub name: String,
    pub component: String,
    pub port: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogDef {
    pub component: String,
    pub port: String,
    pub slot: String,
}
