//! Numerical building blocks for the retention model.
//!
//! This crate has no dependencies and provides:
//!
//! - **Dense matrices** ([`matrix::Matrix`]): row-major storage with transpose, products,
//!   row scaling and an inverse that reports singularity as `None`
//! - **Logistic helpers** ([`logistic`]): sigmoid link, fitted probabilities, mean squared
//!   error and Bernoulli log-likelihood
//!
//! # Examples
//!
//! ```
//! use reta_stats::{logistic, matrix::Matrix};
//!
//! // Two rows, intercept column plus one variable
//! let design = Matrix::from_row_major(2, 2, vec![1.0, -1.0, 1.0, 1.0]);
//! let p = logistic::probabilities(&design, &[0.0, 2.0]);
//! assert!(p[0] < 0.5 && p[1] > 0.5);
//!
//! let mse = logistic::mean_squared_error(&p, &[0.0, 1.0]);
//! assert!(mse < 0.25);
//! ```

pub mod logistic;
pub mod matrix;
