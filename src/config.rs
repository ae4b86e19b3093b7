// ⚙️ Analysis Configuration - fixed inputs, seed, and model defaults
// There is no runtime configuration surface: Default is the contract.

use std::path::PathBuf;

/// Seed shared by the train/test split and the forest
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of rows held out for scoring
pub const DEFAULT_TEST_FRACTION: f64 = 0.25;

// ============================================================================
// DATA PATHS
// ============================================================================

/// Locations of the four input tables
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub card_stats: PathBuf,
    pub event_influences: PathBuf,
    pub set_metadata: PathBuf,
    pub set_sales: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            card_stats: PathBuf::from("card_stats.csv"),
            // Absolute, unlike the other three
            event_influences: PathBuf::from("/event_influences.csv"),
            set_metadata: PathBuf::from("set_metadata.csv"),
            set_sales: PathBuf::from("set_sales.csv"),
        }
    }
}

// ============================================================================
// FOREST CONFIG
// ============================================================================

/// Random forest hyperparameters (library defaults, never tuned)
#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// None = grow until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
        }
    }
}

// ============================================================================
// ANALYSIS CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub paths: DataPaths,
    pub seed: u64,
    pub test_fraction: f64,
    pub forest: ForestConfig,
}

impl AnalysisConfig {
    /// Default configuration with a different seed
    pub fn with_seed(seed: u64) -> Self {
        AnalysisConfig {
            seed,
            ..Self::default()
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            paths: DataPaths::default(),
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            forest: ForestConfig::default(),
        }
    }
}
