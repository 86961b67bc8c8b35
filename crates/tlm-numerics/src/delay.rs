//! Fixed-size delay line (circular buffer).

/// Circular buffer of previous values.
///
/// `update(new)` pushes the new value and returns the value from N steps
/// back, where N is the configured step delay. With N = 1 this is the
/// pervasive "value at t-1" used for TLM wave-variable propagation; larger N
/// implements explicit time-delay blocks.
#[derive(Debug, Clone)]
pub struct Delay {
    buf: Vec<f64>,
    newest: usize,
    oldest: usize,
}

impl Delay {
    /// A one-step delay initialized to zero. Call an `initialize_*` method
    /// before use to set history and length.
    pub fn new() -> Self {
        Self {
            buf: vec![0.0],
            newest: 0,
            oldest: 0,
        }
    }

    /// Initialize with a known number of delay steps; the whole history is
    /// filled with `value`. Step counts below 1 are clamped to 1.
    pub fn initialize_steps(&mut self, steps: usize, value: f64) {
        let size = steps.max(1);
        self.buf = vec![value; size];
        self.oldest = 0;
        self.newest = size - 1;
    }

    /// Initialize from a continuous time delay.
    ///
    /// The delay is quantized to `(time_delay / dt + 0.5)` whole steps,
    /// truncated. Partial-step delays are therefore lost; the achieved step
    /// count is returned so callers can report the actual delay.
    pub fn initialize_time(&mut self, time_delay: f64, dt: f64, value: f64) -> usize {
        let steps = if dt > 0.0 {
            (time_delay / dt + 0.5) as usize
        } else {
            1
        };
        self.initialize_steps(steps, value);
        self.steps()
    }

    /// Number of delay steps.
    pub fn steps(&self) -> usize {
        self.buf.len()
    }

    /// Push a new value, pop and return the oldest retained value.
    pub fn update(&mut self, new_value: f64) -> f64 {
        let oldest_value = self.buf[self.oldest];
        self.oldest = (self.oldest + 1) % self.buf.len();
        self.newest = (self.newest + 1) % self.buf.len();
        self.buf[self.newest] = new_value;
        oldest_value
    }

    /// Oldest value without popping.
    pub fn oldest(&self) -> f64 {
        self.buf[self.oldest]
    }

    /// Most recently pushed value.
    pub fn newest(&self) -> f64 {
        self.buf[self.newest]
    }

    /// Value `i` steps back from the newest (0 = newest). Indices past the
    /// retained history saturate to the oldest value.
    pub fn get_idx(&self, i: usize) -> f64 {
        let len = self.buf.len();
        let i = i.min(len - 1);
        self.buf[(self.newest + len - i) % len]
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_delay_scenario() {
        // StepDelay=1 initialized to 0.0: update(5.0) -> 0.0, update(7.0) -> 5.0
        let mut d = Delay::new();
        d.initialize_steps(1, 0.0);
        assert_eq!(d.update(5.0), 0.0);
        assert_eq!(d.update(7.0), 5.0);
    }

    #[test]
    fn n_step_delay_returns_value_n_calls_ago() {
        let mut d = Delay::new();
        d.initialize_steps(3, -1.0);
        assert_eq!(d.update(10.0), -1.0);
        assert_eq!(d.update(20.0), -1.0);
        assert_eq!(d.update(30.0), -1.0);
        assert_eq!(d.update(40.0), 10.0);
        assert_eq!(d.update(50.0), 20.0);
    }

    #[test]
    fn time_quantization_truncates() {
        let mut d = Delay::new();
        // 0.25 s at dt = 0.1 -> 0.25/0.1 + 0.5 = 3.0 -> 3 steps
        assert_eq!(d.initialize_time(0.25, 0.1, 0.0), 3);
        // 0.24 s at dt = 0.1 -> 2.9 -> 2 steps
        assert_eq!(d.initialize_time(0.24, 0.1, 0.0), 2);
        // Sub-step delays clamp to one step
        assert_eq!(d.initialize_time(0.01, 0.1, 0.0), 1);
    }

    #[test]
    fn accessors() {
        let mut d = Delay::new();
        d.initialize_steps(2, 0.0);
        d.update(1.0);
        d.update(2.0);
        assert_eq!(d.newest(), 2.0);
        assert_eq!(d.oldest(), 1.0);
        assert_eq!(d.get_idx(0), 2.0);
        assert_eq!(d.get_idx(1), 1.0);
    }

    #[test]
    fn get_idx_saturates_past_retained_history() {
        let mut d = Delay::new();
        d.initialize_steps(2, 0.0);
        d.update(1.0);
        d.update(2.0);
        // Only two values are retained; deeper lookups pin to the oldest
        // instead of wrapping back around to the newest.
        assert_eq!(d.get_idx(2), 1.0);
        assert_eq!(d.get_idx(100), 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The (N+1)-th update returns exactly the value passed N calls
        // ago, independent of intervening values.
        #[test]
        fn delay_is_exact(
            steps in 1_usize..16,
            values in prop::collection::vec(-1e9_f64..1e9_f64, 17..48),
        ) {
            let mut d = Delay::new();
            d.initialize_steps(steps, 0.0);
            for (i, &v) in values.iter().enumerate() {
                let out = d.update(v);
                if i >= steps {
                    prop_assert_eq!(out, values[i - steps]);
                }
            }
        }
    }
}
