// 🧮 Card Aggregation - card-level stats rolled up per set
// Means skip missing scores; a set where every score is missing keeps None.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::encoding::{meta_score, rarity_score, reprint_binary};
use crate::tables::CardStat;

// ============================================================================
// CARD AGGREGATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAggregate {
    pub set_code: String,
    pub meta_score: Option<f64>,
    pub is_reprint_binary: Option<f64>,
    pub rarity_score: Option<f64>,
    /// Rows with a card name
    pub num_cards: usize,
}

/// Running mean that ignores missing values
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[derive(Debug, Default)]
struct SetAccumulator {
    meta: MeanAccumulator,
    reprint: MeanAccumulator,
    rarity: MeanAccumulator,
    named_cards: usize,
}

/// Group cards by Set_Code and compute the per-set feature means.
pub fn aggregate_cards(cards: &[CardStat]) -> BTreeMap<String, CardAggregate> {
    let mut sets: BTreeMap<&str, SetAccumulator> = BTreeMap::new();

    for card in cards {
        let acc = sets.entry(card.set_code.as_str()).or_default();
        acc.meta.push(meta_score(card.meta_relevance.as_deref()));
        acc.reprint.push(reprint_binary(card.is_reprint.as_deref()));
        acc.rarity.push(rarity_score(card.rarity.as_deref()));
        if card.card_name.is_some() {
            acc.named_cards += 1;
        }
    }

    sets.into_iter()
        .map(|(code, acc)| {
            let aggregate = CardAggregate {
                set_code: code.to_string(),
                meta_score: acc.meta.mean(),
                is_reprint_binary: acc.reprint.mean(),
                rarity_score: acc.rarity.mean(),
                num_cards: acc.named_cards,
            };
            (code.to_string(), aggregate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(set: &str, name: Option<&str>, meta: &str, reprint: &str, rarity: &str) -> CardStat {
        CardStat {
            set_code: set.to_string(),
            card_name: name.map(str::to_string),
            meta_relevance: Some(meta.to_string()),
            is_reprint: Some(reprint.to_string()),
            rarity: Some(rarity.to_string()),
        }
    }

    #[test]
    fn test_rarity_mean_and_count() {
        let cards = vec![
            card("MRD", Some("Kuriboh"), "Low", "No", "Common"),
            card("MRD", Some("Black Skull Dragon"), "Medium", "Yes", "Rare"),
            card("MRD", Some("Tiger Axe"), "High", "No", "Super Rare"),
        ];

        let agg = aggregate_cards(&cards);
        let mrd = &agg["MRD"];

        assert_eq!(mrd.num_cards, 3);
        assert_eq!(mrd.rarity_score, Some(2.0));
        assert_eq!(mrd.meta_score, Some(1.0));
        assert!((mrd.is_reprint_binary.unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_means_skip_unmapped_values() {
        let cards = vec![
            card("PSV", Some("Jinzo"), "High", "No", "Ultra Rare"),
            card("PSV", Some("Mystery"), "Legendary", "Unknown", "Ghost Rare"),
        ];

        let agg = aggregate_cards(&cards);
        let psv = &agg["PSV"];

        assert_eq!(psv.num_cards, 2);
        assert_eq!(psv.meta_score, Some(2.0));
        assert_eq!(psv.is_reprint_binary, Some(0.0));
        assert_eq!(psv.rarity_score, Some(4.0));
    }

    #[test]
    fn test_all_unmapped_stays_missing() {
        let cards = vec![card("LON", Some("Odd"), "Extreme", "No", "Mosaic")];

        let agg = aggregate_cards(&cards);

        assert_eq!(agg["LON"].meta_score, None);
        assert_eq!(agg["LON"].rarity_score, None);
        assert_eq!(agg["LON"].is_reprint_binary, Some(0.0));
    }

    #[test]
    fn test_unnamed_cards_do_not_count() {
        let cards = vec![
            card("SRL", Some("Baby Dragon"), "Low", "No", "Common"),
            card("SRL", None, "Low", "No", "Common"),
        ];

        let agg = aggregate_cards(&cards);

        assert_eq!(agg["SRL"].num_cards, 1);
        assert_eq!(agg["SRL"].rarity_score, Some(1.0));
    }

    #[test]
    fn test_groups_by_set() {
        let cards = vec![
            card("A", Some("x"), "Low", "No", "Common"),
            card("B", Some("y"), "High", "Yes", "Secret Rare"),
            card("A", Some("z"), "Low", "No", "Rare"),
        ];

        let agg = aggregate_cards(&cards);

        assert_eq!(agg.len(), 2);
        assert_eq!(agg["A"].num_cards, 2);
        assert_eq!(agg["B"].rarity_score, Some(5.0));
    }
}
