//! Turbulent orifice flow from TLM wave variables.

/// Closed-form turbulent flow through an orifice.
///
/// Solves `q = Ks * sign(dp) * sqrt(|dp|)` together with the TLM port
/// relations `p1 = c1 + Zc1*q1`, `p2 = c2 + Zc2*q2`, `q2 = -q1 = q`, which
/// gives a quadratic in `q` with the closed-form root below. No iteration.
#[derive(Debug, Clone, Copy)]
pub struct TurbulentFlow {
    ks: f64,
}

impl TurbulentFlow {
    /// `ks` is the flow coefficient (m^3/s per sqrt(Pa)).
    pub fn new(ks: f64) -> Self {
        Self { ks }
    }

    pub fn set_flow_coefficient(&mut self, ks: f64) {
        self.ks = ks;
    }

    /// Flow from side 1 to side 2, positive when `c1 > c2`.
    ///
    /// Antisymmetric: `flow(c1, c2, z1, z2) == -flow(c2, c1, z2, z1)`.
    pub fn flow(&self, c1: f64, c2: f64, zc1: f64, zc2: f64) -> f64 {
        let z = zc1 + zc2;
        let half_kz = self.ks * z * 0.5;
        if c1 > c2 {
            self.ks * ((c1 - c2 + half_kz * half_kz).sqrt() - half_kz)
        } else {
            -self.ks * ((c2 - c1 + half_kz * half_kz).sqrt() - half_kz)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_impedance_reduces_to_orifice_equation() {
        let t = TurbulentFlow::new(1e-7);
        let q = t.flow(1e5, 0.0, 0.0, 0.0);
        assert!((q - 1e-7 * (1e5_f64).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn no_pressure_difference_no_flow() {
        let t = TurbulentFlow::new(1e-7);
        assert_eq!(t.flow(5e5, 5e5, 1e9, 1e9), 0.0);
    }

    #[test]
    fn impedance_reduces_flow() {
        let t = TurbulentFlow::new(1e-7);
        let free = t.flow(1e5, 0.0, 0.0, 0.0);
        let loaded = t.flow(1e5, 0.0, 1e9, 1e9);
        assert!(loaded > 0.0);
        assert!(loaded < free);
    }
}
