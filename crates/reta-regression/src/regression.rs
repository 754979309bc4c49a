use serde::Serialize;

use crate::{
    data_point::{DataPoint, design_matrix},
    error::RegressionError,
    evaluate::{self, Evaluation},
    model::Model,
    newton::{FitOutcome, NewtonRaphson},
    report::ModelReport,
    trace::TraceSink,
};

/// How the last fit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FitSummary {
    pub outcome: FitOutcome,
    pub iterations: usize,
}

/// A single logistic regression fit.
///
/// The session fixes the number of variables at construction, collects data points,
/// and fits once. Variable and observed names are only used for reporting.
///
/// # Examples
///
/// ```
/// use reta_regression::{data_point::DataPoint, regression::Regression};
///
/// let mut regression = Regression::new(1);
/// regression.set_observed_name("Passed");
/// regression.set_variable_name(0, "Hours");
/// for (hours, passed) in [(1.0, 0.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0), (5.0, 1.0), (6.0, 1.0)] {
///     regression.add_data_point(DataPoint::new(passed, vec![hours])).unwrap();
/// }
/// let summary = regression.fit(100).unwrap();
/// assert!(summary.outcome.is_converged());
/// assert!(regression.model().unwrap().coefficients[1] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Regression {
    observed_name: String,
    variable_names: Vec<String>,
    data_points: Vec<DataPoint>,
    model: Option<Model>,
    summary: Option<FitSummary>,
}

impl Regression {
    /// Creates a session for `variable_count` independent variables.
    #[must_use]
    pub fn new(variable_count: usize) -> Self {
        Self {
            observed_name: String::new(),
            variable_names: vec![String::new(); variable_count],
            data_points: vec![],
            model: None,
            summary: None,
        }
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variable_names.len()
    }

    /// Names variable `index`; out-of-range indices are ignored.
    pub fn set_variable_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(slot) = self.variable_names.get_mut(index) {
            *slot = name.into();
        }
    }

    pub fn set_observed_name(&mut self, name: impl Into<String>) {
        self.observed_name = name.into();
    }

    #[must_use]
    pub fn observed_name(&self) -> &str {
        &self.observed_name
    }

    #[must_use]
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    #[must_use]
    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    /// Appends a training row.
    ///
    /// Rows whose variable count differs from the declared one are rejected here, not
    /// at fit time.
    pub fn add_data_point(&mut self, point: DataPoint) -> Result<(), RegressionError> {
        if point.variables.len() != self.variable_count() {
            return Err(RegressionError::Dimension {
                expected: self.variable_count(),
                actual: point.variables.len(),
            });
        }
        self.data_points.push(point);
        Ok(())
    }

    /// Fits the model with at most `max_iterations` Newton steps.
    pub fn fit(&mut self, max_iterations: usize) -> Result<FitSummary, RegressionError> {
        self.fit_with(&NewtonRaphson::new(max_iterations), None)
    }

    /// Same as [`Regression::fit`], reporting progress to `sink`.
    pub fn fit_traced(
        &mut self,
        max_iterations: usize,
        sink: &mut dyn TraceSink,
    ) -> Result<FitSummary, RegressionError> {
        self.fit_with(&NewtonRaphson::new(max_iterations), Some(sink))
    }

    /// Fits with explicit solver parameters.
    ///
    /// Fails with [`RegressionError::InsufficientData`] unless there are strictly more
    /// rows than variables; the session is left untouched in that case.
    pub fn fit_with(
        &mut self,
        solver: &NewtonRaphson,
        sink: Option<&mut dyn TraceSink>,
    ) -> Result<FitSummary, RegressionError> {
        let rows = self.data_points.len();
        let variables = self.variable_count();
        if rows <= variables {
            return Err(RegressionError::InsufficientData { rows, variables });
        }

        let (design, observed) = design_matrix(&self.data_points, variables);
        let fit = solver.fit(&design, &observed, sink);
        let mut model = Model::from_coefficients(fit.coefficients, fit.standard_errors);
        model.compute_statistics(&design, &observed)?;

        let summary = FitSummary {
            outcome: fit.outcome,
            iterations: fit.iterations,
        };
        self.model = Some(model);
        self.summary = Some(summary);
        Ok(summary)
    }

    pub fn model(&self) -> Result<&Model, RegressionError> {
        self.model.as_ref().ok_or(RegressionError::NotFitted)
    }

    /// Outcome of the last successful fit.
    #[must_use]
    pub fn summary(&self) -> Option<FitSummary> {
        self.summary
    }

    /// Probability of a positive outcome for `point`.
    pub fn predict(&self, point: &DataPoint) -> Result<f64, RegressionError> {
        self.model()?.probability(&point.variables)
    }

    /// Scores the fitted model against held-out rows.
    pub fn evaluate(&self, points: &[DataPoint]) -> Result<Evaluation, RegressionError> {
        evaluate::evaluate(self.model()?, points)
    }

    pub fn report(&self) -> Result<ModelReport, RegressionError> {
        ModelReport::new(&self.observed_name, &self.variable_names, self.model()?)
    }
}
