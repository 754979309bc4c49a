/// Precondition violations reported by the regression session.
///
/// Numerical trouble inside the Newton-Raphson loop is never an error; see
/// [`FitOutcome`](crate::newton::FitOutcome) for how those paths are reported.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RegressionError {
    #[display("data point has {actual} variables but the model declares {expected}")]
    Dimension { expected: usize, actual: usize },
    #[display("{rows} data points cannot fit {variables} variables (more rows than variables required)")]
    InsufficientData { rows: usize, variables: usize },
    #[display("model has not been fitted yet")]
    NotFitted,
}
