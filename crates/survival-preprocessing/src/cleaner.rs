use crate::error::PreprocessResult;
use crate::imputer::{fill_missing, FillRecord, FillStrategy};
use serde::{Deserialize, Serialize};
use survival_core::DataFrame;
use tracing::{debug, info};

/// A column and the strategy used to fill its missing cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    pub strategy: FillStrategy,
}

impl ColumnFill {
    pub fn new(column: &str, strategy: FillStrategy) -> Self {
        ColumnFill {
            column: column.to_string(),
            strategy,
        }
    }
}

/// Columns to drop and fills to apply, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningPlan {
    #[serde(default)]
    pub drop: Vec<String>,
    #[serde(default)]
    pub fill: Vec<ColumnFill>,
}

impl CleaningPlan {
    /// Training table: drop `Cabin`, median `Age`, mode `Embarked`.
    pub fn train() -> Self {
        CleaningPlan {
            drop: vec!["Cabin".to_string()],
            fill: vec![
                ColumnFill::new("Age", FillStrategy::Median),
                ColumnFill::new("Embarked", FillStrategy::Mode),
            ],
        }
    }

    /// Test table: drop `Cabin`, median `Age` and `Fare`.
    ///
    /// `Embarked` is not filled here; a missing port in the test table
    /// reaches the encoder and fails there.
    pub fn test() -> Self {
        CleaningPlan {
            drop: vec!["Cabin".to_string()],
            fill: vec![
                ColumnFill::new("Age", FillStrategy::Median),
                ColumnFill::new("Fare", FillStrategy::Median),
            ],
        }
    }
}

/// Missing-value counts around a cleaning pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleaningReport {
    pub missing_before: Vec<(String, usize)>,
    pub missing_after: Vec<(String, usize)>,
    /// Columns that were present and dropped.
    pub dropped: Vec<String>,
    pub fills: Vec<FillRecord>,
}

/// Drops unwanted columns and imputes missing values according to a plan.
///
/// Statistics come from the frame being cleaned, so train and test tables
/// are imputed independently. Drops and fills naming a column the frame
/// lacks are skipped; required columns are enforced when the table is read.
#[derive(Debug, Clone)]
pub struct Cleaner {
    plan: CleaningPlan,
}

impl Cleaner {
    pub fn new(plan: CleaningPlan) -> Self {
        Cleaner { plan }
    }

    pub fn plan(&self) -> &CleaningPlan {
        &self.plan
    }

    pub fn clean(&self, df: &DataFrame) -> PreprocessResult<(DataFrame, CleaningReport)> {
        let mut report = CleaningReport {
            missing_before: df.null_counts(),
            ..Default::default()
        };

        let mut current = df.clone();
        for name in &self.plan.drop {
            if current.has_column(name) {
                current = current.without_column(name);
                report.dropped.push(name.clone());
                debug!(column = %name, "dropped column");
            }
        }

        for fill in &self.plan.fill {
            // An encoded frame no longer carries its categorical source columns.
            if !current.has_column(&fill.column) {
                debug!(column = %fill.column, "fill skipped, column absent");
                continue;
            }
            let (next, record) = fill_missing(&current, &fill.column, fill.strategy)?;
            current = next;
            report.fills.extend(record);
        }

        report.missing_after = current.null_counts();
        info!(
            rows = current.n_rows(),
            cols = current.n_cols(),
            dropped = report.dropped.len(),
            fills = report.fills.len(),
            "cleaned frame"
        );
        Ok((current, report))
    }
}
