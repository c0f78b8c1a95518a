//! Visualization planning
//!
//! Chooses chart specifications for tabular data. Only the first one or two
//! numeric columns are ever charted: a histogram of the first, and a
//! scatter of the first against the second.

use analystforge_common::document::Document;
use analystforge_common::errors::{AppError, Result};
use serde::Serialize;

/// Kind of chart to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Scatter,
}

/// Declarative chart description, independent of any plotting toolkit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationSpec {
    pub title: String,
    pub chart_kind: ChartKind,
    /// One column for histograms, (x, y) for scatter plots
    pub columns: Vec<String>,
    pub insight: String,
}

impl VisualizationSpec {
    fn histogram(column: &str) -> Self {
        Self {
            title: format!("Histogram of {}", column),
            chart_kind: ChartKind::Histogram,
            columns: vec![column.to_string()],
            insight: format!("This histogram shows the distribution of {}.", column),
        }
    }

    fn scatter(x: &str, y: &str) -> Self {
        Self {
            title: format!("Scatter Plot: {} vs {}", x, y),
            chart_kind: ChartKind::Scatter,
            columns: vec![x.to_string(), y.to_string()],
            insight: format!("This scatter plot shows the relationship between {} and {}.", x, y),
        }
    }
}

/// Plan charts for the loaded document
pub fn plan_visualizations(document: Option<&Document>) -> Result<Vec<VisualizationSpec>> {
    let table = document
        .and_then(Document::as_table)
        .ok_or(AppError::NotApplicable)?;

    let numeric: Vec<&str> = table
        .numeric_columns()
        .take(2)
        .map(|c| c.name.as_str())
        .collect();

    match numeric.as_slice() {
        [] => Err(AppError::NoNumericColumns),
        [first] => Ok(vec![VisualizationSpec::histogram(first)]),
        [first, second, ..] => Ok(vec![
            VisualizationSpec::histogram(first),
            VisualizationSpec::scatter(first, second),
        ]),
    }
}
