//! Newton-Raphson (IRLS) estimation of logistic regression coefficients.
//!
//! Each iteration computes
//!
//! ```text
//! b' = b + inv(X'WX) X'(y - p)
//! ```
//!
//! where `p = sigmoid(X b)` and `W = diag(p (1 - p))`. `W` is never built: `WX` is
//! computed by scaling each row of `X` by its weight, which keeps memory at `O(n·k)`
//! instead of `O(n²)`.
//!
//! # Stopping Rules
//!
//! The loop stops on the first of:
//!
//! - **Singular matrix**: `X'WX` cannot be inverted; the best known vector is kept
//! - **Converged**: every coefficient moved by at most `epsilon`; the candidate is kept
//! - **Diverged**: some non-zero coefficient moved by more than `jump_factor` times its
//!   magnitude; the best known vector is kept
//! - **Stalled**: the candidate worsened the mean squared error more than
//!   `max_worse_steps` times in a row; the best known vector is kept
//! - **Iteration budget exhausted**: the best known vector is kept
//!
//! A worsening candidate is not discarded outright: the current vector moves half way
//! towards it and the loop continues from there.
//!
//! None of these outcomes is an error. The caller always receives a coefficient vector
//! together with the [`FitOutcome`] that ended the loop.

use reta_stats::{
    logistic::{mean_squared_error, probabilities},
    matrix::Matrix,
};
use serde::Serialize;

use crate::trace::{TraceEvent, TraceSink, Tracer};

/// Stop when all coefficients change by at most this much.
pub const EPSILON: f64 = 0.01;
/// Stop when a coefficient jumps by more than this multiple of its magnitude.
pub const JUMP_FACTOR: f64 = 1000.0;
/// Stop after this many consecutive worsening steps have been damped.
pub const MAX_WORSE_STEPS: usize = 4;

/// Terminal state of a Newton-Raphson run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant,
)]
pub enum FitOutcome {
    #[display("converged")]
    Converged,
    #[display("diverged")]
    Diverged,
    #[display("stalled after repeated worse steps")]
    Stalled,
    #[display("maximum iterations reached")]
    MaxIterationsReached,
    #[display("singular information matrix")]
    SingularMatrix,
}

/// Parameters of the Newton-Raphson loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    pub max_iterations: usize,
    pub epsilon: f64,
    pub jump_factor: f64,
    pub max_worse_steps: usize,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Result of a Newton-Raphson run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonFit {
    /// Final coefficients, intercept first
    pub coefficients: Vec<f64>,
    /// Square roots of the diagonal of the last computed `inv(X'WX)`
    pub standard_errors: Vec<f64>,
    pub outcome: FitOutcome,
    /// Number of Newton steps attempted
    pub iterations: usize,
}

impl NewtonRaphson {
    /// Creates a solver with the standard stopping constants and the given budget.
    #[must_use]
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            epsilon: EPSILON,
            jump_factor: JUMP_FACTOR,
            max_worse_steps: MAX_WORSE_STEPS,
        }
    }

    /// Fits coefficients for `design` (intercept column included) against `observed`.
    ///
    /// # Panics
    ///
    /// Panics if `design.rows() != observed.len()`.
    #[must_use]
    pub fn fit(
        &self,
        design: &Matrix,
        observed: &[f64],
        sink: Option<&mut dyn TraceSink>,
    ) -> NewtonFit {
        assert_eq!(design.rows(), observed.len(), "one label per design row");
        let mut tracer = Tracer::new(sink);
        let columns = design.cols();
        let design_t = design.transpose();

        let mut coefficients = vec![0.0; columns];
        let mut best = coefficients.clone();
        let mut standard_errors = vec![0.0; columns];
        let mut probs = probabilities(design, &coefficients);
        let mut mse = mean_squared_error(&probs, observed);
        tracer.emit(|| TraceEvent::Started {
            rows: design.rows(),
            columns,
            mse,
        });

        let mut outcome = FitOutcome::MaxIterationsReached;
        let mut iterations = 0;
        let mut worse_steps = 0;
        for iteration in 1..=self.max_iterations {
            iterations = iteration;

            let Some(step) = newton_step(&coefficients, design, &design_t, observed, &probs)
            else {
                outcome = FitOutcome::SingularMatrix;
                break;
            };
            standard_errors = step.covariance_diagonal.iter().map(|v| v.sqrt()).collect();
            let candidate = step.coefficients;
            tracer.emit(|| TraceEvent::Step {
                iteration,
                coefficients: candidate.clone(),
            });

            if no_change(&coefficients, &candidate, self.epsilon) {
                best = candidate;
                outcome = FitOutcome::Converged;
                break;
            }
            if out_of_control(&coefficients, &candidate, self.jump_factor) {
                outcome = FitOutcome::Diverged;
                break;
            }

            probs = probabilities(design, &candidate);
            let candidate_mse = mean_squared_error(&probs, observed);
            if candidate_mse > mse {
                worse_steps += 1;
                if worse_steps > self.max_worse_steps {
                    outcome = FitOutcome::Stalled;
                    break;
                }
                for (b, c) in coefficients.iter_mut().zip(&candidate) {
                    *b = (*b + c) / 2.0;
                }
                mse = candidate_mse;
                tracer.emit(|| TraceEvent::Damped {
                    iteration,
                    mse,
                    worse_steps,
                });
            } else {
                coefficients = candidate;
                best.clone_from(&coefficients);
                mse = candidate_mse;
                worse_steps = 0;
                tracer.emit(|| TraceEvent::Accepted { iteration, mse });
            }
        }

        tracer.emit(|| TraceEvent::Finished {
            outcome,
            iterations,
            coefficients: best.clone(),
        });
        NewtonFit {
            coefficients: best,
            standard_errors,
            outcome,
            iterations,
        }
    }
}

struct NewtonStep {
    coefficients: Vec<f64>,
    covariance_diagonal: Vec<f64>,
}

/// `b + inv(X'WX) X'(y - p)`, or `None` if `X'WX` is singular.
fn newton_step(
    coefficients: &[f64],
    design: &Matrix,
    design_t: &Matrix,
    observed: &[f64],
    probs: &[f64],
) -> Option<NewtonStep> {
    let weights = probs.iter().map(|p| p * (1.0 - p)).collect::<Vec<_>>();
    let information = design_t.product(&design.scale_rows(&weights));
    let covariance = information.inverse()?;

    let residuals = observed
        .iter()
        .zip(probs)
        .map(|(y, p)| y - p)
        .collect::<Vec<_>>();
    let delta = covariance.mul_vec(&design_t.mul_vec(&residuals));
    let coefficients = coefficients.iter().zip(delta).map(|(b, d)| b + d).collect();

    Some(NewtonStep {
        coefficients,
        covariance_diagonal: covariance.diagonal(),
    })
}

fn no_change(old: &[f64], new: &[f64], epsilon: f64) -> bool {
    old.iter().zip(new).all(|(o, n)| (o - n).abs() <= epsilon)
}

fn out_of_control(old: &[f64], new: &[f64], jump_factor: f64) -> bool {
    old.iter()
        .zip(new)
        .filter(|(o, _)| **o != 0.0)
        .any(|(o, n)| (o - n).abs() / o.abs() > jump_factor)
}
