//! Logistic link and goodness-of-fit helpers.

use crate::matrix::Matrix;

/// Standard logistic function `1 / (1 + e^-z)`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted probability for every row of a design matrix: `sigmoid(X * b)`.
///
/// # Panics
///
/// Panics if `coefficients.len() != design.cols()`.
#[must_use]
pub fn probabilities(design: &Matrix, coefficients: &[f64]) -> Vec<f64> {
    design
        .mul_vec(coefficients)
        .into_iter()
        .map(sigmoid)
        .collect()
}

/// Mean squared error between fitted probabilities and observed labels.
///
/// Returns `0.0` for empty input.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn mean_squared_error(probabilities: &[f64], observed: &[f64]) -> f64 {
    assert_eq!(probabilities.len(), observed.len());
    if probabilities.is_empty() {
        return 0.0;
    }
    let sum = probabilities
        .iter()
        .zip(observed)
        .map(|(p, y)| (p - y) * (p - y))
        .sum::<f64>();
    #[expect(clippy::cast_precision_loss)]
    let n = probabilities.len() as f64;
    sum / n
}

/// Bernoulli log-likelihood `Σ y ln(p) + (1 - y) ln(1 - p)`.
///
/// Labels of exactly `0.0` or `1.0` only evaluate the matching term, so a saturated
/// probability on the correct side contributes `0.0` rather than `NaN`.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn log_likelihood(probabilities: &[f64], observed: &[f64]) -> f64 {
    assert_eq!(probabilities.len(), observed.len());
    probabilities
        .iter()
        .zip(observed)
        .map(|(&p, &y)| {
            if y == 1.0 {
                p.ln()
            } else if y == 0.0 {
                (1.0 - p).ln()
            } else {
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            }
        })
        .sum()
}
