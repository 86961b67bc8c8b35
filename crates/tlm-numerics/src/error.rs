use thiserror::Error;

pub type NumericsResult<T> = Result<T, NumericsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Singular matrix: LU pivoting failed for {size}x{size} system")]
    SingularMatrix { size: usize },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },
}
