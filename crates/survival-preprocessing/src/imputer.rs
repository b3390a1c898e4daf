use crate::error::{ImputationError, PreprocessResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use survival_core::{Column, DataFrame};
use tracing::debug;

/// How missing cells of a column are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Median of the present values (numeric columns).
    Median,
    /// Most frequent present value (text columns). Ties go to the
    /// lexicographically smallest value.
    Mode,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Median => f.write_str("median"),
            FillStrategy::Mode => f.write_str("mode"),
        }
    }
}

/// What a single fill did.
#[derive(Debug, Clone, PartialEq)]
pub struct FillRecord {
    pub column: String,
    pub strategy: FillStrategy,
    /// The fill value, rendered for display.
    pub value: String,
    pub missing_before: usize,
    pub missing_after: usize,
}

/// Median of the present values; the mean of the two middle values when
/// the count is even.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Most frequent present value, smallest first on ties.
pub fn mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(v, _)| v.to_string())
}

/// Fill the missing cells of `column` using `strategy`, computing the
/// statistic from `df` itself.
///
/// A column without missing cells is returned unchanged and produces no
/// record.
pub fn fill_missing(
    df: &DataFrame,
    column: &str,
    strategy: FillStrategy,
) -> PreprocessResult<(DataFrame, Option<FillRecord>)> {
    let missing_before = df.column(column)?.null_count();
    if missing_before == 0 {
        return Ok((df.clone(), None));
    }

    let (filled, value) = match strategy {
        FillStrategy::Median => {
            let cells = df.numeric(column)?;
            let m = median(cells).ok_or_else(|| no_values(column))?;
            let col = Column::Numeric(cells.iter().map(|c| Some(c.unwrap_or(m))).collect());
            (col, m.to_string())
        }
        FillStrategy::Mode => {
            let cells = df.text(column)?;
            let m = mode(cells).ok_or_else(|| no_values(column))?;
            let col = Column::Text(
                cells
                    .iter()
                    .map(|c| Some(c.clone().unwrap_or_else(|| m.clone())))
                    .collect(),
            );
            (col, m)
        }
    };

    let missing_after = filled.null_count();
    let out = df.with_column(column, filled)?;
    debug!(
        column,
        %strategy,
        value = %value,
        missing_before,
        missing_after,
        "filled missing values"
    );
    Ok((
        out,
        Some(FillRecord {
            column: column.to_string(),
            strategy,
            value,
            missing_before,
            missing_after,
        }),
    ))
}

fn no_values(column: &str) -> ImputationError {
    ImputationError {
        column: column.to_string(),
        reason: "every value is missing".to_string(),
    }
}
