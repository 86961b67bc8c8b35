//! Bilinear-transform integrators.

/// Trapezoidal accumulator: `y += dt/2 * (u + u_prev)`.
#[derive(Debug, Clone)]
pub struct Integrator {
    dt: f64,
    delayed_u: f64,
    delayed_y: f64,
}

impl Integrator {
    pub fn new(dt: f64, u0: f64, y0: f64) -> Self {
        Self {
            dt,
            delayed_u: u0,
            delayed_y: y0,
        }
    }

    pub fn initialize_values(&mut self, u0: f64, y0: f64) {
        self.delayed_u = u0;
        self.delayed_y = y0;
    }

    pub fn update(&mut self, u: f64) -> f64 {
        self.delayed_y += self.dt * 0.5 * (u + self.delayed_u);
        self.delayed_u = u;
        self.delayed_y
    }

    pub fn value(&self) -> f64 {
        self.delayed_y
    }
}

/// Integrator with output clamping.
///
/// The clamped output is stored back into the accumulator (no anti-windup):
/// after a long saturation the recovery starts from the limit, not from the
/// unclamped sum.
#[derive(Debug, Clone)]
pub struct IntegratorLimited {
    inner: Integrator,
    min: f64,
    max: f64,
    saturated: bool,
}

impl IntegratorLimited {
    pub fn new(dt: f64, u0: f64, y0: f64, min: f64, max: f64) -> Self {
        Self {
            inner: Integrator::new(dt, u0, y0.clamp(min, max)),
            min,
            max,
            saturated: false,
        }
    }

    pub fn set_min_max(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    pub fn update(&mut self, u: f64) -> f64 {
        let y = self.inner.update(u);
        if y >= self.max {
            self.inner.delayed_y = self.max;
            self.saturated = true;
        } else if y <= self.min {
            self.inner.delayed_y = self.min;
            self.saturated = true;
        } else {
            self.saturated = false;
        }
        self.inner.delayed_y
    }

    pub fn value(&self) -> f64 {
        self.inner.value()
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}
