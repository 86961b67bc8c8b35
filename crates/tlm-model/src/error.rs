use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Initialization failed: {what}")]
    Initialization { what: String },

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("Port {port} is not bound to a node")]
    UnboundPort { port: tlm_core::PortId },

    #[error(transparent)]
    Graph(#[from] tlm_graph::GraphError),
}
