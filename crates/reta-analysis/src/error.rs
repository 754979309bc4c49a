use reta_regression::RegressionError;

/// Invalid request parameters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("training ({training}%) and testing ({testing}%) must add up to 100%")]
    InvalidSplit { training: u32, testing: u32 },
    #[display("time window is empty: {begin} is not before {end}")]
    EmptyWindow { begin: String, end: String },
}

/// Failure of a [`Predictor`](crate::predictor::Predictor) run.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PredictError {
    #[display("invalid configuration")]
    Config(ConfigError),
    #[display("regression failed")]
    Regression(RegressionError),
    #[display("event store query failed: {_0}")]
    Store(#[error(not(source))] Box<dyn std::error::Error + Send + Sync>),
}
