use crate::CoreError;

/// Floating point type used throughout the kernel.
pub type Real = f64;

/// One tolerance pair for everything.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Number of whole timesteps between `from` and `to`, rounded to nearest.
///
/// Used when deciding how many simulation steps a `simulate(stop_t)` call
/// should take; the caller may not get exactly the stop time requested.
pub fn num_steps(from: Real, to: Real, dt: Real) -> usize {
    if dt <= 0.0 || to <= from {
        return 0;
    }
    ((to - from) / dt + 0.5) as usize
}
