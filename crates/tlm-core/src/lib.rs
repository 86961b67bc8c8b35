//! tlm-core: stable foundation for the TLM simulation kernel.
//!
//! Contains:
//! - ids (stable compact IDs for nodes, components and ports)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
