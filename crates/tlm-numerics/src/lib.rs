//! tlm-numerics: reusable numerical building blocks for component equations.
//!
//! Provides:
//! - Delay line (circular buffer) for TLM wave propagation and time-delay
//!   blocks
//! - First and second order transfer functions discretized with the bilinear
//!   (Tustin) transform
//! - Bilinear integrator, plain and output-limited
//! - Turbulent orifice flow from wave variables and impedances
//! - Dead-band hysteresis
//! - Dense LU linear solve and a small Newton solver for implicit component
//!   models

pub mod delay;
pub mod error;
pub mod first_order;
pub mod hysteresis;
pub mod integrator;
pub mod linear;
pub mod second_order;
pub mod turbulent;

pub use delay::Delay;
pub use error::{NumericsError, NumericsResult};
pub use first_order::FirstOrderFilter;
pub use hysteresis::hysteresis;
pub use integrator::{Integrator, IntegratorLimited};
pub use linear::{solve_linear, NewtonConfig, NewtonSolver};
pub use second_order::SecondOrderFilter;
pub use turbulent::TurbulentFlow;
