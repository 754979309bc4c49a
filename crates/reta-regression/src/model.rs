use reta_stats::{
    logistic::{log_likelihood, probabilities, sigmoid},
    matrix::Matrix,
};
use serde::Serialize;

use crate::error::RegressionError;

/// Two-sided 95% normal quantile used for confidence intervals.
pub const CONFIDENCE_Z: f64 = 1.96;

/// Fitted logistic regression model.
///
/// Every per-coefficient vector has length `p + 1`: index 0 is the intercept and
/// indices `1..=p` follow the declared variable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    pub coefficients: Vec<f64>,
    pub standard_errors: Vec<f64>,
    /// `exp(coefficient)`
    pub odds_ratios: Vec<f64>,
    /// `coefficient / standard_error`
    pub wald_statistics: Vec<f64>,
    pub lower_confidence: Vec<f64>,
    pub upper_confidence: Vec<f64>,
    pub log_likelihood: f64,
    /// `-2 * log_likelihood`
    pub deviance: f64,
    /// Deviance improvement over the constant 0.5 model
    pub chi_square: f64,
}

impl Model {
    /// Creates a model holding only the fitted coefficients.
    ///
    /// Derived statistics stay empty until [`Model::compute_statistics`] runs.
    #[must_use]
    pub fn from_coefficients(coefficients: Vec<f64>, standard_errors: Vec<f64>) -> Self {
        Self {
            coefficients,
            standard_errors,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.coefficients.is_empty()
    }

    /// Number of variables, excluding the intercept.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Fills odds ratios, Wald statistics, confidence intervals, log-likelihood, deviance
    /// and chi-square from the coefficients and the training data they were fitted on.
    pub fn compute_statistics(
        &mut self,
        design: &Matrix,
        observed: &[f64],
    ) -> Result<(), RegressionError> {
        if !self.is_fitted() {
            return Err(RegressionError::NotFitted);
        }
        if design.cols() != self.coefficients.len() {
            return Err(RegressionError::Dimension {
                expected: self.variable_count(),
                actual: design.cols().saturating_sub(1),
            });
        }

        self.odds_ratios = self.coefficients.iter().map(|c| c.exp()).collect();
        self.wald_statistics = self
            .coefficients
            .iter()
            .zip(&self.standard_errors)
            .map(|(c, se)| c / se)
            .collect();
        (self.lower_confidence, self.upper_confidence) = self
            .coefficients
            .iter()
            .zip(&self.standard_errors)
            .map(|(c, se)| (c - CONFIDENCE_Z * se, c + CONFIDENCE_Z * se))
            .unzip();

        let probs = probabilities(design, &self.coefficients);
        self.log_likelihood = log_likelihood(&probs, observed);
        self.deviance = -2.0 * self.log_likelihood;

        // Baseline predicts 0.5 for every row, so each row contributes ln(0.5)
        #[expect(clippy::cast_precision_loss)]
        let baseline_log_likelihood = observed.len() as f64 * 0.5_f64.ln();
        self.chi_square = -2.0 * baseline_log_likelihood - self.deviance;
        Ok(())
    }

    /// Probability of a positive outcome for one row of variable values.
    pub fn probability(&self, variables: &[f64]) -> Result<f64, RegressionError> {
        if !self.is_fitted() {
            return Err(RegressionError::NotFitted);
        }
        if variables.len() != self.variable_count() {
            return Err(RegressionError::Dimension {
                expected: self.variable_count(),
                actual: variables.len(),
            });
        }
        let (intercept, slopes) = self.coefficients.split_at(1);
        let z = intercept[0]
            + slopes
                .iter()
                .zip(variables)
                .map(|(b, x)| b * x)
                .sum::<f64>();
        Ok(sigmoid(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> (Matrix, Vec<f64>) {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let design = Matrix::from_fn(4, 2, |r, c| if c == 0 { 1.0 } else { xs[r] });
        (design, vec![0.0, 1.0, 0.0, 1.0])
    }

    #[test]
    fn test_statistics_require_coefficients() {
        let (design, observed) = design();
        let mut model = Model::default();
        assert_eq!(
            model.compute_statistics(&design, &observed),
            Err(RegressionError::NotFitted)
        );
    }

    #[test]
    fn test_statistics_reject_mismatched_design() {
        let (design, observed) = design();
        let mut model = Model::from_coefficients(vec![0.0, 1.0, 2.0], vec![1.0; 3]);
        assert_eq!(
            model.compute_statistics(&design, &observed),
            Err(RegressionError::Dimension {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_per_coefficient_statistics() {
        let (design, observed) = design();
        let mut model = Model::from_coefficients(vec![-0.5, 0.25], vec![0.5, 0.125]);
        model.compute_statistics(&design, &observed).unwrap();

        assert!((model.odds_ratios[0] - (-0.5_f64).exp()).abs() < 1e-12);
        assert!((model.odds_ratios[1] - 0.25_f64.exp()).abs() < 1e-12);
        assert_eq!(model.wald_statistics, vec![-1.0, 2.0]);
        assert!((model.lower_confidence[0] - (-0.5 - 0.98)).abs() < 1e-12);
        assert!((model.upper_confidence[0] - (-0.5 + 0.98)).abs() < 1e-12);
        assert!((model.lower_confidence[1] - (0.25 - 0.245)).abs() < 1e-12);
        assert!((model.upper_confidence[1] - (0.25 + 0.245)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_model_matches_baseline() {
        let (design, observed) = design();
        let mut model = Model::from_coefficients(vec![0.0, 0.0], vec![1.0, 1.0]);
        model.compute_statistics(&design, &observed).unwrap();

        let expected = 4.0 * 0.5_f64.ln();
        assert!((model.log_likelihood - expected).abs() < 1e-12);
        assert!((model.deviance + 2.0 * expected).abs() < 1e-12);
        assert!(model.chi_square.abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_identity() {
        let (design, observed) = design();
        let mut model = Model::from_coefficients(vec![-1.0, 0.7], vec![1.0, 1.0]);
        model.compute_statistics(&design, &observed).unwrap();
        let expected = -2.0 * 4.0 * 0.5_f64.ln() - model.deviance;
        assert!((model.chi_square - expected).abs() < 1e-12);
    }

    #[test]
    fn test_probability() {
        let model = Model::from_coefficients(vec![1.0, -2.0], vec![]);
        assert!((model.probability(&[0.5]).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(
            model.probability(&[1.0, 2.0]),
            Err(RegressionError::Dimension {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            Model::default().probability(&[]),
            Err(RegressionError::NotFitted)
        );
    }
}
