// 🔢 Feature Encoding - categorical card attributes to numbers
// Fixed ordinal maps plus a sorted label encoder for free-form categories.

use std::collections::BTreeMap;

// ============================================================================
// FIXED MAPS
// ============================================================================

const META_LEVELS: [(&str, f64); 3] = [("Low", 0.0), ("Medium", 1.0), ("High", 2.0)];

const REPRINT_FLAGS: [(&str, f64); 2] = [("Yes", 1.0), ("No", 0.0)];

const RARITY_LEVELS: [(&str, f64); 5] = [
    ("Common", 1.0),
    ("Rare", 2.0),
    ("Super Rare", 3.0),
    ("Ultra Rare", 4.0),
    ("Secret Rare", 5.0),
];

fn lookup(table: &[(&str, f64)], value: Option<&str>) -> Option<f64> {
    let value = value?;
    table
        .iter()
        .find(|(label, _)| *label == value)
        .map(|(_, score)| *score)
}

/// Meta_Relevance → Meta_Score (Low 0, Medium 1, High 2)
pub fn meta_score(meta_relevance: Option<&str>) -> Option<f64> {
    lookup(&META_LEVELS, meta_relevance)
}

/// Is_Reprint → Is_Reprint_Binary (Yes 1, No 0)
pub fn reprint_binary(is_reprint: Option<&str>) -> Option<f64> {
    lookup(&REPRINT_FLAGS, is_reprint)
}

/// Rarity → Rarity_Score (Common 1 .. Secret Rare 5)
pub fn rarity_score(rarity: Option<&str>) -> Option<f64> {
    lookup(&RARITY_LEVELS, rarity)
}

// ============================================================================
// LABEL ENCODER
// ============================================================================

/// Integer codes for a categorical column.
///
/// Classes are sorted by byte order before codes are assigned, so the same
/// set of values always gets the same codes regardless of row order.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: BTreeMap<String, usize>,
}

impl LabelEncoder {
    /// Fit on every value of the column
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: BTreeMap<String, usize> =
            values.into_iter().map(|v| (v.to_string(), 0)).collect();

        for (code, slot) in classes.values_mut().enumerate() {
            *slot = code;
        }

        LabelEncoder { classes }
    }

    /// Code for a value seen during fit
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes.get(value).copied()
    }

    /// Classes in code order
    pub fn classes(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_score_mapping() {
        assert_eq!(meta_score(Some("Low")), Some(0.0));
        assert_eq!(meta_score(Some("Medium")), Some(1.0));
        assert_eq!(meta_score(Some("High")), Some(2.0));
        assert_eq!(meta_score(Some("high")), None);
        assert_eq!(meta_score(None), None);
    }

    #[test]
    fn test_reprint_binary_mapping() {
        assert_eq!(reprint_binary(Some("Yes")), Some(1.0));
        assert_eq!(reprint_binary(Some("No")), Some(0.0));
        assert_eq!(reprint_binary(Some("Maybe")), None);
    }

    #[test]
    fn test_rarity_score_mapping() {
        assert_eq!(rarity_score(Some("Common")), Some(1.0));
        assert_eq!(rarity_score(Some("Rare")), Some(2.0));
        assert_eq!(rarity_score(Some("Super Rare")), Some(3.0));
        assert_eq!(rarity_score(Some("Ultra Rare")), Some(4.0));
        assert_eq!(rarity_score(Some("Secret Rare")), Some(5.0));
        assert_eq!(rarity_score(Some("Starlight Rare")), None);
    }

    #[test]
    fn test_label_encoder_sorts_classes() {
        let encoder = LabelEncoder::fit(["Positive", "None", "Negative", "Positive"]);

        assert_eq!(encoder.classes(), vec!["Negative", "None", "Positive"]);
        assert_eq!(encoder.transform("Negative"), Some(0));
        assert_eq!(encoder.transform("None"), Some(1));
        assert_eq!(encoder.transform("Positive"), Some(2));
        assert_eq!(encoder.transform("Neutral"), None);
    }

    #[test]
    fn test_label_encoder_ignores_row_order() {
        let a = LabelEncoder::fit(["Booster Pack", "Structure Deck", "Tin"]);
        let b = LabelEncoder::fit(["Tin", "Booster Pack", "Structure Deck"]);

        for class in ["Booster Pack", "Structure Deck", "Tin"] {
            assert_eq!(a.transform(class), b.transform(class));
        }
        assert_eq!(a.len(), 3);
    }
}
