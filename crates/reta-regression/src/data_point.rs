use reta_stats::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// One observation: a binary label and the values of the declared variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Observed outcome, `0.0` or `1.0`
    pub label: f64,
    /// Variable values in declaration order
    pub variables: Vec<f64>,
}

impl DataPoint {
    #[must_use]
    pub fn new(label: f64, variables: Vec<f64>) -> Self {
        Self { label, variables }
    }

    /// Builds a point from a boolean outcome.
    #[must_use]
    pub fn from_outcome(outcome: bool, variables: Vec<f64>) -> Self {
        Self::new(if outcome { 1.0 } else { 0.0 }, variables)
    }
}

/// Builds the design matrix (leading column of ones) and the label vector.
///
/// Every point must carry `variable_count` variables.
pub(crate) fn design_matrix(points: &[DataPoint], variable_count: usize) -> (Matrix, Vec<f64>) {
    let design = Matrix::from_fn(points.len(), variable_count + 1, |r, c| {
        if c == 0 {
            1.0
        } else {
            points[r].variables[c - 1]
        }
    });
    let observed = points.iter().map(|p| p.label).collect();
    (design, observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_matrix_prepends_intercept() {
        let points = vec![
            DataPoint::new(1.0, vec![2.0, 3.0]),
            DataPoint::from_outcome(false, vec![4.0, 5.0]),
        ];
        let (design, observed) = design_matrix(&points, 2);
        assert_eq!(design.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(design.row(1), &[1.0, 4.0, 5.0]);
        assert_eq!(observed, vec![1.0, 0.0]);
    }

    #[test]
    fn test_design_matrix_without_variables() {
        let points = vec![DataPoint::new(1.0, vec![]); 3];
        let (design, _) = design_matrix(&points, 0);
        assert_eq!(design.cols(), 1);
        assert_eq!(design.rows(), 3);
    }
}
