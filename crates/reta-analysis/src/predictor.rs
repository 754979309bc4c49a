//! End-to-end day-1 retention prediction.
//!
//! ```text
//! EventStore ──► extract_features ──► split_dataset ──► Regression::fit
//!                                          │                   │
//!                                          └── testing ──► evaluate ──► Prediction
//! ```

use std::fmt::{self, Write as _};

use rand::Rng;
use reta_regression::{
    DataPoint, Regression,
    evaluate::Evaluation,
    regression::FitSummary,
    report::{ModelReport, escape_html},
    trace::TracingSink,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::PredictError,
    features::{OBSERVED_NAME, PlayerFeatures, VARIABLE_NAMES, extract_features},
    split::{ClassCounts, SplitRatio, split_dataset},
    store::EventStore,
    window::TimeWindow,
};

/// Validated parameters of one prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorConfig {
    pub window: TimeWindow,
    pub split: SplitRatio,
    pub max_iterations: usize,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    config: PredictorConfig,
}

impl Predictor {
    #[must_use]
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Queries the configured window and extracts one feature row per eligible player.
    pub fn features<S>(&self, store: &S) -> Result<Vec<PlayerFeatures>, PredictError>
    where
        S: EventStore,
    {
        let window = &self.config.window;
        let events = store
            .query_events(window.begin(), window.end())
            .map_err(|e| PredictError::Store(Box::new(e)))?;
        let timed_events = store
            .query_timed_events(window.begin(), window.end())
            .map_err(|e| PredictError::Store(Box::new(e)))?;
        debug!(
            events = events.len(),
            timed_events = timed_events.len(),
            "queried event store"
        );
        Ok(extract_features(window, &events, &timed_events))
    }

    /// Fits a model on the training share of the window and scores it on the rest.
    pub fn run<S, R>(&self, store: &S, rng: &mut R) -> Result<Prediction, PredictError>
    where
        S: EventStore,
        R: Rng + ?Sized,
    {
        let features = self.features(store)?;
        let total = features.len();
        info!(
            players = total,
            retained = ClassCounts::of(&features).retained,
            "extracted player features"
        );

        let split = split_dataset(features, self.config.split, rng);
        let training = split.training_counts();
        let testing = split.testing_counts();
        info!(
            training = training.total(),
            testing = testing.total(),
            "split dataset"
        );

        let mut regression = Regression::new(VARIABLE_NAMES.len());
        regression.set_observed_name(OBSERVED_NAME);
        for (i, name) in VARIABLE_NAMES.into_iter().enumerate() {
            regression.set_variable_name(i, name);
        }
        for row in &split.training {
            regression.add_data_point(row.to_data_point())?;
        }

        let fit = regression.fit_traced(self.config.max_iterations, &mut TracingSink)?;
        let test_points = split
            .testing
            .iter()
            .map(PlayerFeatures::to_data_point)
            .collect::<Vec<DataPoint>>();
        let evaluation = regression.evaluate(&test_points)?;
        let accuracy = evaluation.accuracy();
        info!(
            outcome = %fit.outcome,
            iterations = fit.iterations,
            accuracy,
            "prediction finished"
        );

        Ok(Prediction {
            window: self.config.window,
            total,
            training,
            testing,
            report: regression.report()?,
            fit,
            evaluation,
            accuracy,
        })
    }
}

/// Result of a [`Predictor::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub window: TimeWindow,
    /// Number of eligible players
    pub total: usize,
    pub training: ClassCounts,
    pub testing: ClassCounts,
    pub report: ModelReport,
    pub fit: FitSummary,
    pub evaluation: Evaluation,
    /// Test set accuracy in percent
    pub accuracy: f64,
}

const TITLE: &str = "Logistic Regression Model for Day-1 Retention";
const ACCURACY_LABEL: &str = "Prediction result percentage (cross-validation with testing data)";

impl Prediction {
    fn period(&self) -> String {
        format!(
            "Model created from {} to {}",
            self.window.begin(),
            self.window.end()
        )
    }

    fn fit_line(&self) -> String {
        format!(
            "Fit: {} after {} iterations",
            self.fit.outcome, self.fit.iterations
        )
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        writeln!(out, "{TITLE}").unwrap();
        writeln!(out, "{}", self.period()).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Total Dataset: {}", self.total).unwrap();
        writeln!(
            out,
            "Training vs Testing: {} vs {}",
            self.training.total(),
            self.testing.total()
        )
        .unwrap();
        writeln!(
            out,
            "Retained / Not Retained: {}/{} vs {}/{}",
            self.training.retained,
            self.training.not_retained,
            self.testing.retained,
            self.testing.not_retained
        )
        .unwrap();
        writeln!(out).unwrap();
        out.push_str(&self.report.to_text());
        writeln!(out).unwrap();
        writeln!(out, "{}", self.fit_line()).unwrap();
        writeln!(out, "{ACCURACY_LABEL}: {:.2}", self.accuracy).unwrap();
        out
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write!(
            out,
            "<header><h2>{TITLE}</h2><span>{}</span></header>",
            escape_html(&self.period())
        )
        .unwrap();
        write!(out, "<div>Total Dataset: {}</div>", self.total).unwrap();
        write!(
            out,
            "<div>Training vs Testing: {} vs {}</div><br/>",
            self.training.total(),
            self.testing.total()
        )
        .unwrap();
        out.push_str(&self.report.to_html());
        write!(out, "<div>{}</div>", self.fit_line()).unwrap();
        write!(
            out,
            "<br/><div><h3>{ACCURACY_LABEL}: {:.2}</h3></div>",
            self.accuracy
        )
        .unwrap();
        out
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
