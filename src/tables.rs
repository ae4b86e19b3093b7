// 📂 Input Tables - CSV loading for the four source datasets
// Rows are loaded verbatim; all interpretation happens in later stages.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, Level};

use crate::config::DataPaths;

// ============================================================================
// ROW TYPES (one per input file, column names are part of the contract)
// ============================================================================

/// One physical card
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardStat {
    #[serde(rename = "Set_Code")]
    pub set_code: String,

    #[serde(rename = "Card_Name")]
    pub card_name: Option<String>,

    /// Low / Medium / High
    #[serde(rename = "Meta_Relevance")]
    pub meta_relevance: Option<String>,

    /// Yes / No
    #[serde(rename = "Is_Reprint")]
    pub is_reprint: Option<String>,

    #[serde(rename = "Rarity")]
    pub rarity: Option<String>,
}

/// One market event
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EventInfluence {
    #[serde(rename = "Date")]
    pub date: Option<String>,

    /// Positive / Neutral / Negative
    #[serde(rename = "Likely_Impact")]
    pub likely_impact: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SetMetadata {
    #[serde(rename = "Code")]
    pub code: String,

    #[serde(rename = "Release_Date")]
    pub release_date: Option<String>,

    #[serde(rename = "Product_Category")]
    pub product_category: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SetSales {
    #[serde(rename = "Code")]
    pub code: String,

    /// Target variable
    #[serde(rename = "Revenue_USD")]
    pub revenue_usd: f64,
}

// ============================================================================
// INPUT TABLES
// ============================================================================

/// All four datasets, in file order
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub card_stats: Vec<CardStat>,
    pub event_influences: Vec<EventInfluence>,
    pub set_metadata: Vec<SetMetadata>,
    pub set_sales: Vec<SetSales>,
}

impl InputTables {
    /// Load every table; the first unreadable file or malformed row aborts.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let tables = InputTables {
            card_stats: load_card_stats(&paths.card_stats)?,
            event_influences: load_event_influences(&paths.event_influences)?,
            set_metadata: load_set_metadata(&paths.set_metadata)?,
            set_sales: load_set_sales(&paths.set_sales)?,
        };

        info!(
            "Loaded {} cards, {} events, {} set metadata rows, {} sales rows",
            tables.card_stats.len(),
            tables.event_influences.len(),
            tables.set_metadata.len(),
            tables.set_sales.len()
        );

        if tracing::enabled!(Level::DEBUG) {
            for path in [
                &paths.card_stats,
                &paths.event_influences,
                &paths.set_metadata,
                &paths.set_sales,
            ] {
                debug!("{} sha256={}", path.display(), file_fingerprint(path)?);
            }
        }

        Ok(tables)
    }
}

pub fn load_card_stats(path: &Path) -> Result<Vec<CardStat>> {
    load_rows(path, "card stat")
}

pub fn load_event_influences(path: &Path) -> Result<Vec<EventInfluence>> {
    load_rows(path, "event influence")
}

pub fn load_set_metadata(path: &Path) -> Result<Vec<SetMetadata>> {
    load_rows(path, "set metadata")
}

pub fn load_set_sales(path: &Path) -> Result<Vec<SetSales>> {
    load_rows(path, "set sales")
}

fn load_rows<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut rows = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        // +2: header line plus 1-based numbering
        let row: T = result.with_context(|| {
            format!("Failed to deserialize {} row {} in {}", kind, line + 2, path.display())
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// SHA-256 of a file's bytes, hex encoded
pub fn file_fingerprint(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
