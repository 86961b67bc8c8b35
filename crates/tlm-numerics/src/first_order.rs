//! First order transfer function discretized with the bilinear transform.

/// Discrete realization of `G(s) = (a1*s + a0) / (b1*s + b0)`.
///
/// Numerator is `[a0, a1]`, denominator `[b0, b1]`. The output can be
/// clamped to `[min, max]`; the clamped value is what enters the recursion
/// state, so there is no anti-windup. Check `is_saturated()` when that
/// matters.
#[derive(Debug, Clone)]
pub struct FirstOrderFilter {
    dt: f64,
    cu: [f64; 2],
    cy: [f64; 2],
    delayed_u: f64,
    delayed_y: f64,
    value: f64,
    min: f64,
    max: f64,
    saturated: bool,
}

impl FirstOrderFilter {
    /// Set up coefficients and initial state.
    ///
    /// `u0`/`y0` seed the previous input/output samples so the filter starts
    /// in steady state when `y0 = a0/b0 * u0`.
    pub fn new(dt: f64, num: [f64; 2], den: [f64; 2], u0: f64, y0: f64, min: f64, max: f64) -> Self {
        let mut f = Self {
            dt,
            cu: [0.0; 2],
            cy: [0.0; 2],
            delayed_u: u0,
            delayed_y: y0.clamp(min, max),
            value: y0,
            min,
            max,
            saturated: false,
        };
        f.set_num_den(num, den);
        f
    }

    /// Unclamped variant.
    pub fn unbounded(dt: f64, num: [f64; 2], den: [f64; 2], u0: f64, y0: f64) -> Self {
        Self::new(dt, num, den, u0, y0, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Recompute the bilinear coefficients, keeping state.
    pub fn set_num_den(&mut self, num: [f64; 2], den: [f64; 2]) {
        self.cu[0] = num[0] * self.dt - 2.0 * num[1];
        self.cu[1] = num[0] * self.dt + 2.0 * num[1];
        self.cy[0] = den[0] * self.dt - 2.0 * den[1];
        self.cy[1] = den[0] * self.dt + 2.0 * den[1];
    }

    pub fn set_min_max(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Reset the delayed samples without touching coefficients.
    pub fn initialize_values(&mut self, u0: f64, y0: f64) {
        self.delayed_u = u0;
        self.delayed_y = y0;
        self.value = y0;
    }

    /// Advance one timestep with input `u`, returning the new output.
    pub fn update(&mut self, u: f64) -> f64 {
        self.value =
            (self.cu[1] * u + self.cu[0] * self.delayed_u - self.cy[0] * self.delayed_y)
                / self.cy[1];

        if self.value >= self.max {
            self.value = self.max;
            self.saturated = true;
        } else if self.value <= self.min {
            self.value = self.min;
            self.saturated = true;
        } else {
            self.saturated = false;
        }

        self.delayed_y = self.value;
        self.delayed_u = u;
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

#[cfg(test)]
mod tests {
    use super::*;

    // Low-pass G = K / (tau*s + 1): num [K, 0], den [1, tau].
    fn lowpass(dt: f64, k: f64, tau: f64) -> FirstOrderFilter {
        FirstOrderFilter::unbounded(dt, [k, 0.0], [1.0, tau], 0.0, 0.0)
    }

    #[test]
    fn lowpass_converges_to_static_gain() {
        // Constant input u converges to K*u.
        let mut f = lowpass(1e-3, 2.5, 0.05);
        let mut y = 0.0;
        for _ in 0..10_000 {
            y = f.update(3.0);
        }
        assert!((y - 2.5 * 3.0).abs() < 1e-9, "y = {y}");
    }

    #[test]
    fn steady_start_stays_steady() {
        let mut f = FirstOrderFilter::unbounded(1e-3, [2.0, 0.0], [1.0, 0.1], 1.0, 2.0);
        for _ in 0..10 {
            let y = f.update(1.0);
            assert!((y - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn output_clamps_and_flags_saturation() {
        let mut f = FirstOrderFilter::new(1e-3, [1.0, 0.0], [1.0, 1e-4], 0.0, 0.0, -0.5, 0.5);
        for _ in 0..100 {
            f.update(10.0);
        }
        assert_eq!(f.value(), 0.5);
        assert!(f.is_saturated());
        // Clamped value entered the recursion: recovery starts from 0.5,
        // not from the unclamped output.
        let y = f.update(0.0);
        assert!(y < 0.5);
        assert!(!f.is_saturated());
    }

    #[test]
    fn lowpass_response_is_monotone_for_step() {
        let mut f = lowpass(1e-3, 1.0, 0.02);
        let mut prev = 0.0;
        for _ in 0..200 {
            let y = f.update(1.0);
            assert!(y >= prev);
            prev = y;
        }
    }
}
