use crate::Domain;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Slot index {slot} out of range for {domain} node (has {len} slots)")]
    SlotOutOfRange {
        domain: Domain,
        slot: usize,
        len: usize,
    },

    #[error("Unknown slot name '{name}' for {domain} node")]
    UnknownSlot { domain: Domain, name: String },

    #[error("Node {node} does not exist or has been released")]
    DeadNode { node: tlm_core::NodeId },
}
