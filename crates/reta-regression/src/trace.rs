//! Explicit trace sink for the Newton-Raphson trainer.
//!
//! The trainer never logs through ambient state. Callers that want to observe a fit
//! pass a [`TraceSink`] to [`Regression::fit_traced`](crate::regression::Regression::fit_traced).
//! [`TracingSink`] forwards events to `tracing`; a `Vec<TraceEvent>` records them.

use crate::newton::FitOutcome;

/// Event emitted while fitting.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Fit started from the all-zero coefficient vector.
    Started { rows: usize, columns: usize, mse: f64 },
    /// A Newton step produced a candidate vector.
    Step {
        iteration: usize,
        coefficients: Vec<f64>,
    },
    /// The candidate improved (or kept) the MSE and was accepted.
    Accepted { iteration: usize, mse: f64 },
    /// The candidate worsened the MSE; coefficients moved half way towards it.
    Damped {
        iteration: usize,
        mse: f64,
        worse_steps: usize,
    },
    /// Fit stopped.
    Finished {
        outcome: FitOutcome,
        iterations: usize,
        coefficients: Vec<f64>,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Forwards trace events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::Started { rows, columns, mse } => {
                tracing::debug!(rows, columns, mse, "newton-raphson started");
            }
            TraceEvent::Step {
                iteration,
                coefficients,
            } => {
                tracing::debug!(iteration, ?coefficients, "candidate coefficients");
            }
            TraceEvent::Accepted { iteration, mse } => {
                tracing::debug!(iteration, mse, "candidate accepted");
            }
            TraceEvent::Damped {
                iteration,
                mse,
                worse_steps,
            } => {
                tracing::debug!(iteration, mse, worse_steps, "candidate worsened fit, damping");
            }
            TraceEvent::Finished {
                outcome,
                iterations,
                coefficients,
            } => {
                tracing::info!(%outcome, iterations, ?coefficients, "newton-raphson finished");
            }
        }
    }
}

/// Optional sink that only builds events when someone listens.
pub(crate) struct Tracer<'a>(Option<&'a mut dyn TraceSink>);

impl<'a> Tracer<'a> {
    pub(crate) fn new(sink: Option<&'a mut dyn TraceSink>) -> Self {
        Self(sink)
    }

    pub(crate) fn emit<F>(&mut self, event: F)
    where
        F: FnOnce() -> TraceEvent,
    {
        if let Some(sink) = self.0.as_deref_mut() {
            sink.record(event());
        }
    }
}
