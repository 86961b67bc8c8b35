//! tlm-components: built-in component set.
//!
//! A small library exercising every kernel mechanism: C and Q hydraulic
//! elements, signal sources, blocks and sinks, and the loop-breaking unit
//! delay. Larger component catalogs register through the same factory API.

pub mod hydraulic;
pub mod signal;

pub use hydraulic::{HydraulicVolume, LaminarOrifice, PressureSourceC, TurbulentOrifice};
pub use signal::{
    SignalConstant, SignalGain, SignalLowPass, SignalSink, SignalStep, SignalUnitDelay,
};
