//! Tabular rendering of a fitted model.
//!
//! [`ModelReport`] is the stable, ordered view of a model: one row per coefficient
//! (intercept first, then variables in declaration order) followed by the model-level
//! fit measures. It renders as plain text or HTML and serializes with serde.
//!
//! Per-coefficient values are printed with 6 decimals, model-level values with 15.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::{error::RegressionError, model::Model};

/// Name used for the intercept row.
pub const INTERCEPT_NAME: &str = "Intercept";

/// Column headers, in row order.
pub const COLUMNS: [&str; 7] = [
    "Name",
    "Coefficient",
    "Odds Ratio",
    "Std. Error",
    "Wald Statistic",
    "Lower Confidence",
    "Upper Confidence",
];

const COEFFICIENT_PRECISION: usize = 6;
const SUMMARY_PRECISION: usize = 15;

/// Upper 5% critical values of the chi-square distribution for 1 to 10 degrees of freedom.
const CHI_SQUARE_CRITICAL_05: [f64; 10] = [
    3.841_458_82,
    5.991_464_55,
    7.814_727_90,
    9.487_729_04,
    11.070_497_69,
    12.591_587_24,
    14.067_140_45,
    15.507_313_06,
    16.918_977_60,
    18.307_038_05,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub coefficient: f64,
    pub odds_ratio: f64,
    pub standard_error: f64,
    pub wald_statistic: f64,
    pub lower_confidence: f64,
    pub upper_confidence: f64,
}

impl ReportRow {
    fn formatted_values(&self) -> [String; 6] {
        [
            self.coefficient,
            self.odds_ratio,
            self.standard_error,
            self.wald_statistic,
            self.lower_confidence,
            self.upper_confidence,
        ]
        .map(|v| format!("{v:.COEFFICIENT_PRECISION$}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub observed_name: String,
    pub rows: Vec<ReportRow>,
    pub log_likelihood: f64,
    pub deviance: f64,
    pub chi_square: f64,
}

impl ModelReport {
    /// Builds the report for a model whose statistics have been computed.
    pub fn new(
        observed_name: &str,
        variable_names: &[String],
        model: &Model,
    ) -> Result<Self, RegressionError> {
        if !model.is_fitted() || model.odds_ratios.is_empty() {
            return Err(RegressionError::NotFitted);
        }
        if variable_names.len() != model.variable_count() {
            return Err(RegressionError::Dimension {
                expected: model.variable_count(),
                actual: variable_names.len(),
            });
        }

        let names = std::iter::once(INTERCEPT_NAME).chain(variable_names.iter().map(String::as_str));
        let rows = names
            .enumerate()
            .map(|(i, name)| ReportRow {
                name: name.to_owned(),
                coefficient: model.coefficients[i],
                odds_ratio: model.odds_ratios[i],
                standard_error: model.standard_errors[i],
                wald_statistic: model.wald_statistics[i],
                lower_confidence: model.lower_confidence[i],
                upper_confidence: model.upper_confidence[i],
            })
            .collect();

        Ok(Self {
            observed_name: observed_name.to_owned(),
            rows,
            log_likelihood: model.log_likelihood,
            deviance: model.deviance,
            chi_square: model.chi_square,
        })
    }

    /// Degrees of freedom of the chi-square test (number of variables).
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Critical chi-square value at the 0.05 level, if tabulated for this model size.
    #[must_use]
    pub fn critical_chi_square(&self) -> Option<f64> {
        let df = self.degrees_of_freedom();
        df.checked_sub(1)
            .and_then(|i| CHI_SQUARE_CRITICAL_05.get(i))
            .copied()
    }

    /// Label/value pairs of the model-level measures.
    #[must_use]
    pub fn summary_lines(&self) -> [(&'static str, String); 3] {
        [
            ("Log Likelihood", self.log_likelihood),
            ("-2 * Log Likelihood (Deviance)", self.deviance),
            ("Chi-Square Goodness of Fit", self.chi_square),
        ]
        .map(|(label, v)| (label, format!("{v:.SUMMARY_PRECISION$}")))
    }

    fn critical_note(&self) -> Option<String> {
        self.critical_chi_square().map(|critical| {
            format!(
                "Note: Critical chi-square value for 0.05 at {} degree of freedom is {critical:.8}",
                self.degrees_of_freedom()
            )
        })
    }

    /// Renders the report as a pipe-separated plain-text table.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Observed: {}", self.observed_name).unwrap();
        writeln!(out, "{}", COLUMNS.join("|")).unwrap();
        for row in &self.rows {
            writeln!(out, "{}|{}", row.name, row.formatted_values().join("|")).unwrap();
        }
        writeln!(out).unwrap();
        for (label, value) in self.summary_lines() {
            writeln!(out, "{label}: {value}").unwrap();
        }
        if let Some(note) = self.critical_note() {
            writeln!(out).unwrap();
            writeln!(out, "{note}").unwrap();
        }
        out
    }

    /// Renders the report as an HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<table><tr>");
        for column in COLUMNS {
            write!(out, "<td>{column}</td>").unwrap();
        }
        out.push_str("</tr>");
        for row in &self.rows {
            write!(out, "<tr><td>{}</td>", escape_html(&row.name)).unwrap();
            for value in row.formatted_values() {
                write!(out, "<td>{value}</td>").unwrap();
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
        for (label, value) in self.summary_lines() {
            write!(out, "<div>{label}: {value}</div>").unwrap();
        }
        if let Some(note) = self.critical_note() {
            write!(out, "<br/><div>{note}</div>").unwrap();
        }
        out
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Escapes the characters that are significant in HTML text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
