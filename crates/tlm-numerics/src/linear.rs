//! Dense linear solve and a small Newton solver for implicit components.

use crate::error::{NumericsError, NumericsResult};
use nalgebra::{DMatrix, DVector};

/// Solve `A x = b` by LU decomposition with partial pivoting.
///
/// Fails with [`NumericsError::SingularMatrix`] when pivoting breaks down;
/// the caller decides whether that is fatal.
pub fn solve_linear(a: &DMatrix<f64>, b: &DVector<f64>) -> NumericsResult<DVector<f64>> {
    if !a.is_square() || a.nrows() != b.len() {
        return Err(NumericsError::InvalidArg {
            what: "solve_linear requires a square matrix matching the RHS length",
        });
    }
    a.clone()
        .lu()
        .solve(b)
        .ok_or(NumericsError::SingularMatrix { size: a.nrows() })
}

/// Newton iteration settings.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    pub max_iterations: usize,
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-10,
            rel_tol: 1e-9,
        }
    }
}

/// Newton-Raphson solver for the Jacobian-linearized equation systems of
/// implicit component models.
///
/// Each iteration solves `J dx = -r` through [`solve_linear`], so a singular
/// Jacobian surfaces as [`NumericsError::SingularMatrix`].
#[derive(Debug, Clone, Default)]
pub struct NewtonSolver {
    config: NewtonConfig,
}

impl NewtonSolver {
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }

    pub fn solve<F, J>(
        &self,
        x0: DVector<f64>,
        residual: F,
        jacobian: J,
    ) -> NumericsResult<DVector<f64>>
    where
        F: Fn(&DVector<f64>) -> DVector<f64>,
        J: Fn(&DVector<f64>) -> DMatrix<f64>,
    {
        let mut x = x0;
        let mut r = residual(&x);
        let r0_norm = r.norm();

        for _ in 0..self.config.max_iterations {
            let r_norm = r.norm();
            if r_norm < self.config.abs_tol || r_norm < self.config.rel_tol * r0_norm {
                return Ok(x);
            }
            let jac = jacobian(&x);
            let dx = solve_linear(&jac, &(-&r))?;
            x += dx;
            r = residual(&x);
        }

        Err(NumericsError::ConvergenceFailed {
            what: format!(
                "Newton did not converge in {} iterations, residual = {}",
                self.config.max_iterations,
                r.norm()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_2x2() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[5.0, 10.0]);
        let x = solve_linear(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_matrix_is_reported() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        let err = solve_linear(&a, &b).unwrap_err();
        assert_eq!(err, NumericsError::SingularMatrix { size: 2 });
    }

    #[test]
    fn dimension_mismatch_is_invalid_arg() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            solve_linear(&a, &b),
            Err(NumericsError::InvalidArg { .. })
        ));
    }

    #[test]
    fn newton_solves_quadratic() {
        // x^2 - 4 = 0 from x0 = 3
        let solver = NewtonSolver::default();
        let x = solver
            .solve(
                DVector::from_element(1, 3.0),
                |x| DVector::from_element(1, x[0] * x[0] - 4.0),
                |x| DMatrix::from_element(1, 1, 2.0 * x[0]),
            )
            .unwrap();
        assert!((x[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn newton_reports_singular_jacobian() {
        let solver = NewtonSolver::default();
        let err = solver
            .solve(
                DVector::from_element(1, 0.0),
                |x| DVector::from_element(1, x[0] * x[0] - 4.0),
                |_| DMatrix::from_element(1, 1, 0.0),
            )
            .unwrap_err();
        assert!(matches!(err, NumericsError::SingularMatrix { .. }));
    }
}
