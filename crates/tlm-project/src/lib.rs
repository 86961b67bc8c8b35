//! tlm-project: the on-disk model description format.
//!
//! Models are declarative: component instances with parameters and start
//! values, connections, nested subsystems, and run settings. YAML is the
//! primary format, JSON an alternative; loading always validates.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{validate_model, ValidationError};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<ModelDef> {
    let model: ModelDef = serde_yaml::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn to_yaml_string(model: &ModelDef) -> ProjectResult<String> {
    Ok(serde_yaml::to_string(model)?)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ModelDef> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(model: &ModelDef, path: &std::path::Path) -> ProjectResult<()> {
    Ok(std::fs::write(path, to_yaml_string(model)?)?)
}

pub fn from_json_str(content: &str) -> ProjectResult<ModelDef> {
    let model: ModelDef = serde_json::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ModelDef> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_json(model: &ModelDef, path: &std::path::Path) -> ProjectResult<()> {
    Ok(std::fs::write(path, serde_json::to_string_pretty(model)?)?)
}
