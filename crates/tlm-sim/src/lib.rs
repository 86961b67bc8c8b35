//! tlm-sim: systems, ordering, and the fixed-step simulation loop.
//!
//! The crate ties components and nodes together: [`System`] owns components
//! and connections, derives the per-step execution order (Signal sorted by
//! data flow, then C, then Q), and drives the loop. [`ComponentFactory`]
//! maps type names to constructors, [`SimLogger`] records node slots, and
//! [`ParallelSchedule`] partitions a pass into node-disjoint barrier groups.

pub mod error;
pub mod logger;
pub mod registry;
pub mod scheduler;
pub mod sort;
pub mod system;

pub use error::{SimError, SimResult};
pub use logger::SimLogger;
pub use registry::ComponentFactory;
pub use scheduler::{partition, ParallelSchedule};
pub use system::{Endpoint, SimOrder, StopFlag, System};
