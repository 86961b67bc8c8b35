//! tlm-graph: node and port layer of the TLM kernel.
//!
//! A `Node` is the typed data buffer shared by the two ports of one
//! connection: a fixed set of named double slots per physical domain.
//! Ports are declared by components as `PortSpec`s; the owning system binds
//! them to nodes in the shared `NodeStore`. Components resolve `SlotRef`
//! handles once during initialization and use them for O(1) reads and writes
//! in the hot simulation loop.

pub mod domain;
pub mod error;
pub mod node;
pub mod port;

pub use domain::{Domain, electric, hydraulic, mechanic, pneumatic, rotational, signal};
pub use error::{GraphError, GraphResult};
pub use node::{Node, NodeStore, SlotRef};
pub use port::{PortKind, PortSpec};
