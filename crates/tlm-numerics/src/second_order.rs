//! Second order transfer function discretized with the bilinear transform.

/// Discrete realization of `G(s) = (a2*s^2 + a1*s + a0) / (b2*s^2 + b1*s + b0)`.
///
/// Numerator is `[a0, a1, a2]`, denominator `[b0, b1, b2]`. Clamping follows
/// the same rule as [`crate::FirstOrderFilter`]: the clamped output feeds the
/// recursion, no anti-windup.
#[derive(Debug, Clone)]
pub struct SecondOrderFilter {
    dt: f64,
    cu: [f64; 3],
    cy: [f64; 3],
    delayed_u: f64,
    delayed2_u: f64,
    delayed_y: f64,
    delayed2_y: f64,
    value: f64,
    min: f64,
    max: f64,
    saturated: bool,
}

impl SecondOrderFilter {
    /// Set up coefficients and initial state.
    ///
    /// `sy0` is the initial output derivative, used to seed the two-step
    /// output history.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dt: f64,
        num: [f64; 3],
        den: [f64; 3],
        u0: f64,
        y0: f64,
        min: f64,
        max: f64,
        sy0: f64,
    ) -> Self {
        let delayed_y = y0.clamp(min, max);
        let mut f = Self {
            dt,
            cu: [0.0; 3],
            cy: [0.0; 3],
            delayed_u: u0,
            delayed2_u: u0,
            delayed_y,
            delayed2_y: delayed_y - sy0 * dt,
            value: y0,
            min,
            max,
            saturated: false,
        };
        f.set_num_den(num, den);
        f
    }

    /// Unclamped variant starting at rest.
    pub fn unbounded(dt: f64, num: [f64; 3], den: [f64; 3], u0: f64, y0: f64) -> Self {
        Self::new(
            dt,
            num,
            den,
            u0,
            y0,
            f64::NEG_INFINITY,
            f64::INFINITY,
            0.0,
        )
    }

    /// Recompute the bilinear coefficients, keeping state.
    pub fn set_num_den(&mut self, num: [f64; 3], den: [f64; 3]) {
        let t = self.dt;
        self.cu[0] = num[0] * t * t + 2.0 * num[1] * t + 4.0 * num[2];
        self.cu[1] = 2.0 * num[0] * t * t - 8.0 * num[2];
        self.cu[2] = num[0] * t * t - 2.0 * num[1] * t + 4.0 * num[2];
        self.cy[0] = den[0] * t * t + 2.0 * den[1] * t + 4.0 * den[2];
        self.cy[1] = 2.0 * den[0] * t * t - 8.0 * den[2];
        self.cy[2] = den[0] * t * t - 2.0 * den[1] * t + 4.0 * den[2];
    }

    pub fn set_min_max(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Reset the delayed samples without touching coefficients.
    pub fn initialize_values(&mut self, u0: f64, y0: f64) {
        self.delayed_u = u0;
        self.delayed2_u = u0;
        self.delayed_y = y0;
        self.delayed2_y = y0;
        self.value = y0;
    }

    /// Advance one timestep with input `u`, returning the new output.
    pub fn update(&mut self, u: f64) -> f64 {
        self.value = (self.cu[0] * u
            + self.cu[1] * self.delayed_u
            + self.cu[2] * self.delayed2_u
            - self.cy[1] * self.delayed_y
            - self.cy[2] * self.delayed2_y)
            / self.cy[0];

        if self.value >= self.max {
            self.value = self.max;
            self.saturated = true;
        } else if self.value <= self.min {
            self.value = self.min;
            self.saturated = true;
        } else {
            self.saturated = false;
        }

        self.delayed2_u = self.delayed_u;
        self.delayed_u = u;
        self.delayed2_y = self.delayed_y;
        self.delayed_y = self.value;
        self.value
    }

    /// Current output value.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}
