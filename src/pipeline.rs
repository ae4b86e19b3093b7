// 🚀 Analysis Pipeline - tables in, report out
// Pure with respect to I/O: callers load the tables, this does the rest.

use tracing::info;

use crate::config::AnalysisConfig;
use crate::dataset::train_test_split;
use crate::error::AnalysisError;
use crate::forest::RandomForestRegressor;
use crate::merge::{merge_tables, ModelTable, FEATURE_NAMES};
use crate::metrics::r2_score;
use crate::report::AnalysisReport;
use crate::tables::InputTables;

/// Join, encode, split, fit and score.
pub fn run_analysis(tables: &InputTables, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    // 1. Merge and derive features
    let records = merge_tables(tables)?;
    let table = ModelTable::from_records(&records);
    info!("Model table: {} of {} merged rows kept", table.len(), records.len());

    if table.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    // 2. Split
    let split = train_test_split(table.len(), config.test_fraction, config.seed)?;
    let (x_train, y_train) = table.select(&split.train);
    let (x_test, y_test) = table.select(&split.test);

    // 3. Fit on the training partition only
    let mut model = RandomForestRegressor::new(config.forest.clone(), config.seed);
    model.fit(&x_train, &y_train)?;

    // 4. Score on held-out rows
    let predictions = model.predict(&x_test);
    let r2 = r2_score(&y_test, &predictions);

    let report = AnalysisReport::new(
        r2,
        &FEATURE_NAMES,
        &model.feature_importances(),
        split.train.len(),
        split.test.len(),
    );
    info!("{}", report.summary());

    Ok(report)
}
