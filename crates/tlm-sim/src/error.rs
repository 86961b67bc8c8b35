use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Connection refused: {what}")]
    Connection { what: String },

    #[error("Component sorting failed: {what}")]
    Sort { what: String },

    #[error("Initialization failed: {what}")]
    Initialization { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Duplicate component name '{name}'")]
    DuplicateName { name: String },

    #[error("Component type '{name}' is already registered")]
    DuplicateType { name: String },

    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    #[error("Unknown component type '{name}'")]
    UnknownType { name: String },

    #[error("Component '{comp}' has no port '{port}'")]
    UnknownPort { comp: String, port: String },

    #[error(transparent)]
    Model(#[from] tlm_model::ModelError),

    #[error(transparent)]
    Graph(#[from] tlm_graph::GraphError),
}
