// 🔗 Set Merge - sales + metadata + card aggregates + event labels
// Produces one record per joined sales row, then the numeric model table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate_cards;
use crate::encoding::LabelEncoder;
use crate::error::AnalysisError;
use crate::events::{event_impact, parse_date, parse_events, EventImpact};
use crate::tables::{InputTables, SetMetadata};

/// Model inputs, in column order
pub const FEATURE_NAMES: [&str; 6] = [
    "Meta_Score",
    "Is_Reprint_Binary",
    "Rarity_Score",
    "Num_Cards",
    "Event_Impact_Encoded",
    "Product_Category_Encoded",
];

// ============================================================================
// MERGED RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub code: String,
    pub revenue_usd: f64,
    pub release_date: Option<NaiveDateTime>,
    pub product_category: String,

    // Card aggregate (None when the set has no card rows)
    pub meta_score: Option<f64>,
    pub is_reprint_binary: Option<f64>,
    pub rarity_score: Option<f64>,
    pub num_cards: Option<usize>,

    pub event_impact: EventImpact,
    pub event_impact_encoded: usize,
    pub product_category_encoded: usize,
}

impl MergedRecord {
    /// Feature vector in FEATURE_NAMES order, or None if any derived feature is missing
    pub fn features(&self) -> Option<[f64; 6]> {
        Some([
            self.meta_score?,
            self.is_reprint_binary?,
            self.rarity_score?,
            self.num_cards? as f64,
            self.event_impact_encoded as f64,
            self.product_category_encoded as f64,
        ])
    }
}

/// Join the four tables into one record per sales row with a metadata match.
///
/// Sales ⋈ metadata is an inner join; card aggregates are left-joined.
/// Categorical columns are label-encoded over the full merged column.
pub fn merge_tables(tables: &InputTables) -> Result<Vec<MergedRecord>, AnalysisError> {
    let aggregates = aggregate_cards(&tables.card_stats);
    let events = parse_events(&tables.event_influences)?;

    let mut metadata_by_code: HashMap<&str, Vec<&SetMetadata>> = HashMap::new();
    for meta in &tables.set_metadata {
        metadata_by_code.entry(meta.code.as_str()).or_default().push(meta);
    }

    let duplicated = metadata_by_code.values().filter(|rows| rows.len() > 1).count();
    if duplicated > 0 {
        warn!("{} set code(s) appear more than once in set metadata; joined rows will repeat", duplicated);
    }

    let mut records = Vec::new();
    let mut unmatched = 0usize;

    for sale in &tables.set_sales {
        let matches = match metadata_by_code.get(sale.code.as_str()) {
            Some(rows) => rows,
            None => {
                unmatched += 1;
                continue;
            }
        };

        for meta in matches {
            let release_date = parse_date(meta.release_date.as_deref(), "Release_Date")?;
            let aggregate = aggregates.get(&sale.code);

            records.push(MergedRecord {
                code: sale.code.clone(),
                revenue_usd: sale.revenue_usd,
                release_date,
                product_category: meta.product_category.clone(),
                meta_score: aggregate.and_then(|a| a.meta_score),
                is_reprint_binary: aggregate.and_then(|a| a.is_reprint_binary),
                rarity_score: aggregate.and_then(|a| a.rarity_score),
                num_cards: aggregate.map(|a| a.num_cards),
                event_impact: event_impact(release_date, &events),
                event_impact_encoded: 0,
                product_category_encoded: 0,
            });
        }
    }

    if unmatched > 0 {
        info!("Dropped {} sales row(s) with no set metadata", unmatched);
    }

    let impact_encoder = LabelEncoder::fit(records.iter().map(|r| r.event_impact.label()));
    let category_encoder = LabelEncoder::fit(records.iter().map(|r| r.product_category.as_str()));
    debug!("Event impact classes: {:?}", impact_encoder.classes());
    debug!("Product category classes: {:?}", category_encoder.classes());

    for record in &mut records {
        // Both encoders were fit on these exact values
        record.event_impact_encoded = impact_encoder
            .transform(record.event_impact.label())
            .unwrap_or_default();
        record.product_category_encoded = category_encoder
            .transform(&record.product_category)
            .unwrap_or_default();
    }

    Ok(records)
}

// ============================================================================
// MODEL TABLE
// ============================================================================

/// Numeric rows ready for the model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTable {
    pub codes: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl ModelTable {
    /// Keep rows whose derived features are all present
    pub fn from_records(records: &[MergedRecord]) -> Self {
        let mut table = ModelTable::default();
        let mut dropped = 0usize;

        for record in records {
            match record.features() {
                Some(row) => {
                    table.codes.push(record.code.clone());
                    table.features.push(row.to_vec());
                    table.targets.push(record.revenue_usd);
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            info!("Dropped {} merged row(s) with missing card features", dropped);
        }

        table
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Copy the given rows out as (features, targets)
    pub fn select(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
        let features = indices.iter().map(|&i| self.features[i].clone()).collect();
        let targets = indices.iter().map(|&i| self.targets[i]).collect();
        (features, targets)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{CardStat, EventInfluence, SetSales};

    fn sale(code: &str, revenue: f64) -> SetSales {
        SetSales {
            code: code.to_string(),
            revenue_usd: revenue,
        }
    }

    fn meta(code: &str, release: &str, category: &str) -> SetMetadata {
        SetMetadata {
            code: code.to_string(),
            release_date: Some(release.to_string()),
            product_category: category.to_string(),
        }
    }

    fn card(set: &str, meta: Option<&str>, rarity: &str) -> CardStat {
        CardStat {
            set_code: set.to_string(),
            card_name: Some(format!("{} card", set)),
            meta_relevance: meta.map(str::to_string),
            is_reprint: Some("No".to_string()),
            rarity: Some(rarity.to_string()),
        }
    }

    fn sample_tables() -> InputTables {
        InputTables {
            card_stats: vec![
                card("AAA", Some("High"), "Rare"),
                card("BBB", Some("Low"), "Common"),
                card("CCC", None, "Common"),
            ],
            event_influences: vec![EventInfluence {
                date: Some("2024-01-20".to_string()),
                likely_impact: Some("Positive".to_string()),
            }],
            set_metadata: vec![
                meta("AAA", "2024-01-10", "Tin"),
                meta("BBB", "2024-06-01", "Booster Pack"),
                meta("CCC", "2024-06-01", "Booster Pack"),
                meta("DDD", "2024-06-01", "Structure Deck"),
            ],
            set_sales: vec![
                sale("AAA", 100.0),
                sale("BBB", 200.0),
                sale("CCC", 300.0),
                sale("DDD", 400.0),
                sale("ZZZ", 500.0),
            ],
        }
    }

    #[test]
    fn test_inner_join_drops_sales_without_metadata() {
        let records = merge_tables(&sample_tables()).unwrap();

        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AAA", "BBB", "CCC", "DDD"]);
    }

    #[test]
    fn test_left_join_keeps_sets_without_cards() {
        let records = merge_tables(&sample_tables()).unwrap();
        let ddd = records.iter().find(|r| r.code == "DDD").unwrap();

        assert_eq!(ddd.meta_score, None);
        assert_eq!(ddd.num_cards, None);
        assert_eq!(ddd.features(), None);
    }

    #[test]
    fn test_event_labels_and_encoding() {
        let records = merge_tables(&sample_tables()).unwrap();

        assert_eq!(records[0].event_impact, EventImpact::Positive);
        assert_eq!(records[1].event_impact, EventImpact::None);

        // Classes sort to ["None", "Positive"]
        assert_eq!(records[0].event_impact_encoded, 1);
        assert_eq!(records[1].event_impact_encoded, 0);

        // Classes sort to ["Booster Pack", "Structure Deck", "Tin"]
        assert_eq!(records[0].product_category_encoded, 2);
        assert_eq!(records[1].product_category_encoded, 0);
        assert_eq!(records[3].product_category_encoded, 1);
    }

    #[test]
    fn test_null_meta_score_is_dropped() {
        let records = merge_tables(&sample_tables()).unwrap();
        let table = ModelTable::from_records(&records);

        assert_eq!(table.codes, vec!["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(table.targets, vec![100.0, 200.0]);
        assert_eq!(table.features[0], vec![2.0, 0.0, 2.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_unmapped_reprint_is_dropped_too() {
        let mut tables = sample_tables();
        tables.card_stats[0].is_reprint = Some("Sometimes".to_string());

        let records = merge_tables(&tables).unwrap();
        let table = ModelTable::from_records(&records);

        assert_eq!(table.codes, vec!["BBB".to_string()]);
    }

    #[test]
    fn test_duplicate_metadata_repeats_rows_in_order() {
        let tables = InputTables {
            card_stats: vec![card("A", Some("High"), "Rare")],
            event_influences: vec![],
            set_metadata: vec![
                meta("A", "2024-01-10", "Tin"),
                meta("A", "2024-02-10", "Booster Pack"),
            ],
            set_sales: vec![sale("A", 100.0)],
        };

        let records = merge_tables(&tables).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.code == "A" && r.revenue_usd == 100.0));
        assert_eq!(records[0].product_category, "Tin");
        assert_eq!(records[1].product_category, "Booster Pack");
        assert_eq!(records[0].product_category_encoded, 1);
        assert_eq!(records[1].product_category_encoded, 0);
    }

    #[test]
    fn test_bad_release_date_is_fatal() {
        let mut tables = sample_tables();
        tables.set_metadata[0].release_date = Some("soon".to_string());

        let err = merge_tables(&tables).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDate { field: "Release_Date", .. }));
    }

    #[test]
    fn test_select_rows() {
        let records = merge_tables(&sample_tables()).unwrap();
        let table = ModelTable::from_records(&records);

        let (x, y) = table.select(&[1]);
        assert_eq!(y, vec![200.0]);
        assert_eq!(x[0][0], 0.0);
    }
}
