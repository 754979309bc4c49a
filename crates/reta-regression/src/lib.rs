//! Binary logistic regression fitted by Newton-Raphson (IRLS).
//!
//! This crate turns labelled rows into a fitted model with inferential statistics and
//! scores that model against held-out rows.
//!
//! # Pipeline
//!
//! ```text
//! DataPoint rows
//!     ↓ collected by
//! Regression session (fixed variable count)
//!     ↓ fitted by
//! NewtonRaphson (convergence / divergence / stagnation control)
//!     ↓ produces
//! Model (coefficients + standard errors)
//!     ↓ enriched with
//! odds ratios, Wald statistics, confidence intervals, log-likelihood, deviance, chi-square
//!     ↓ scored by
//! evaluate (accuracy on held-out rows)  →  ModelReport (text / HTML / JSON)
//! ```
//!
//! # Modules
//!
//! - [`regression`]: the fit session and its public contract
//! - [`newton`]: the Newton-Raphson loop and its terminal states ([`newton::FitOutcome`])
//! - [`model`]: the fitted model and its statistics
//! - [`evaluate`]: classification accuracy
//! - [`report`]: ordered tabular view of a model
//! - [`trace`]: explicit sink for observing a fit
//!
//! # Errors
//!
//! Only caller-correctable preconditions fail (see [`error::RegressionError`]). Singular
//! matrices, runaway coefficients, repeated worsening and an exhausted iteration budget
//! all end the fit normally with the best coefficients known at that point.
//!
//! # Example
//!
//! ```
//! use reta_regression::{data_point::DataPoint, regression::Regression, trace::TracingSink};
//!
//! let mut regression = Regression::new(1);
//! regression.set_observed_name("Retained");
//! regression.set_variable_name(0, "Sessions");
//! for i in 0..10 {
//!     let retained = i >= 5;
//!     regression
//!         .add_data_point(DataPoint::from_outcome(retained, vec![f64::from(i)]))
//!         .unwrap();
//! }
//!
//! let summary = regression.fit_traced(100, &mut TracingSink).unwrap();
//! println!("fit ended: {}", summary.outcome);
//!
//! let accuracy = regression
//!     .evaluate(regression.data_points())
//!     .unwrap()
//!     .accuracy();
//! assert!(accuracy >= 90.0);
//! println!("{}", regression.report().unwrap());
//! ```

pub mod data_point;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod newton;
pub mod regression;
pub mod report;
pub mod trace;

pub use self::{
    data_point::DataPoint, error::RegressionError, model::Model, newton::FitOutcome,
    regression::Regression,
};
