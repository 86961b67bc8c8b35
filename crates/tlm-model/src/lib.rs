//! tlm-model: the component abstraction of the TLM kernel.
//!
//! A component declares ports and parameters in `configure`, resolves its
//! node slot handles in `initialize`, and is then stepped with
//! `simulate_one_timestep` by its owning system. The CQS type decides which
//! half of each timestep the component runs in and is immutable after
//! construction.

pub mod component;
pub mod error;
pub mod messages;
pub mod params;

pub use component::{Component, CqsType, InputValue, Setup, SimContext};
pub use error::{ModelError, ModelResult};
pub use messages::{Message, MessageHub, Severity};
pub use params::{ParamBinding, Parameter, ParameterSet};
