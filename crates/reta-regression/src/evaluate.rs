use serde::Serialize;

use crate::{data_point::DataPoint, error::RegressionError, model::Model};

/// Probability at or above which a row is classified as positive.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Classification result of a model over held-out rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub correct: usize,
    pub wrong: usize,
}

impl Evaluation {
    #[must_use]
    pub fn total(&self) -> usize {
        self.correct + self.wrong
    }

    /// Percentage of correctly classified rows, `0.0` when there are none.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        #[expect(clippy::cast_precision_loss)]
        let accuracy = 100.0 * self.correct as f64 / self.total() as f64;
        accuracy
    }
}

/// Scores `model` against `points`.
///
/// A row counts as correct when `p >= 0.5` and its label is `1.0`, or `p < 0.5` and its
/// label is `0.0`. Any other label is counted as wrong.
pub fn evaluate(model: &Model, points: &[DataPoint]) -> Result<Evaluation, RegressionError> {
    if !model.is_fitted() {
        return Err(RegressionError::NotFitted);
    }
    let mut evaluation = Evaluation::default();
    for point in points {
        let p = model.probability(&point.variables)?;
        let hit = (p >= DECISION_THRESHOLD && point.label == 1.0)
            || (p < DECISION_THRESHOLD && point.label == 0.0);
        if hit {
            evaluation.correct += 1;
        } else {
            evaluation.wrong += 1;
        }
    }
    Ok(evaluation)
}
