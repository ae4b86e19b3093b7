// Set Revenue Drivers - Core Library
// Loads card-set tables, derives features, fits a random forest on revenue.

pub mod config;
pub mod error;
pub mod tables;
pub mod encoding;
pub mod events;
pub mod aggregate;
pub mod merge;
pub mod dataset;
pub mod forest;
pub mod metrics;
pub mod report;
pub mod pipeline;

// Re-export commonly used types
pub use config::{AnalysisConfig, DataPaths, ForestConfig, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
pub use error::AnalysisError;
pub use tables::{
    CardStat, EventInfluence, SetMetadata, SetSales, InputTables,
    load_card_stats, load_event_influences, load_set_metadata, load_set_sales,
    file_fingerprint,
};
pub use encoding::{meta_score, reprint_binary, rarity_score, LabelEncoder};
pub use events::{
    DatedEvent, EventImpact, EVENT_WINDOW_DAYS,
    event_impact, parse_date, parse_events,
};
pub use aggregate::{CardAggregate, aggregate_cards};
pub use merge::{MergedRecord, ModelTable, FEATURE_NAMES, merge_tables};
pub use dataset::{TrainTestSplit, train_test_split};
pub use forest::{RandomForestRegressor, RegressionTree, TreeNode};
pub use metrics::r2_score;
pub use report::{AnalysisReport, FeatureImportance};
pub use pipeline::run_analysis;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
