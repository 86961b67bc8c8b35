//! Dead-band hysteresis.

/// Hysteresis with width `width` around input `input`.
///
/// `previous` is the output of the last call. The output follows the input
/// only once the input has moved more than half the width away from the
/// previous output; inside the band the previous output is kept unchanged,
/// so the function is idempotent there.
pub fn hysteresis(input: f64, width: f64, previous: f64) -> f64 {
    let half = width * 0.5;
    if previous < input - half {
        input - half
    } else if previous > input + half {
        input + half
    } else {
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_inside_band() {
        assert_eq!(hysteresis(1.0, 0.5, 1.1), 1.1);
        assert_eq!(hysteresis(1.0, 0.5, 0.8), 0.8);
    }

    #[test]
    fn follows_with_offset_outside_band() {
        // Input rising well above previous output: drag output up to the
        // lower band edge.
        assert_eq!(hysteresis(2.0, 0.5, 0.0), 1.75);
        // Input falling well below: drag output down to the upper edge.
        assert_eq!(hysteresis(-2.0, 0.5, 0.0), -1.75);
    }

    #[test]
    fn idempotent_when_input_static() {
        let mut out = 0.0;
        out = hysteresis(3.0, 1.0, out);
        let settled = out;
        for _ in 0..10 {
            out = hysteresis(3.0, 1.0, out);
            assert_eq!(out, settled);
        }
    }
}
