// 📊 Analysis Report - R² and ranked feature importances
// Display renders the exact stdout format of the tool.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub r2_score: f64,
    /// Sorted by importance, highest first
    pub importances: Vec<FeatureImportance>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl AnalysisReport {
    /// Pair names with importances and rank them (ties keep input order)
    pub fn new(
        r2_score: f64,
        feature_names: &[&str],
        importances: &[f64],
        train_rows: usize,
        test_rows: usize,
    ) -> Self {
        let mut ranked: Vec<FeatureImportance> = feature_names
            .iter()
            .zip(importances)
            .map(|(name, &importance)| FeatureImportance {
                feature: name.to_string(),
                importance,
            })
            .collect();

        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        AnalysisReport {
            r2_score,
            importances: ranked,
            train_rows,
            test_rows,
        }
    }

    pub fn summary(&self) -> String {
        let top = self
            .importances
            .first()
            .map(|f| f.feature.as_str())
            .unwrap_or("-");
        format!(
            "R² {:.4} on {} test rows ({} train), top feature {}",
            self.r2_score, self.test_rows, self.train_rows, top
        )
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model R² Score: {:.2}", self.r2_score)?;
        writeln!(f)?;
        writeln!(f, "Feature Importance (descending):")?;
        for item in &self.importances {
            writeln!(f, "{}: {:.4}", item.feature, item.importance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_is_descending_and_stable() {
        let report = AnalysisReport::new(0.5, &["a", "b", "c", "d"], &[0.1, 0.4, 0.1, 0.4], 3, 1);

        let names: Vec<&str> = report.importances.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_display_format() {
        let report = AnalysisReport::new(
            0.8765,
            &["Meta_Score", "Num_Cards"],
            &[0.25, 0.75],
            75,
            25,
        );

        let expected = "Model R² Score: 0.88\n\
                        \n\
                        Feature Importance (descending):\n\
                        Num_Cards: 0.7500\n\
                        Meta_Score: 0.2500\n";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_summary_mentions_top_feature() {
        let report = AnalysisReport::new(0.1, &["x", "y"], &[0.3, 0.7], 6, 2);
        assert!(report.summary().contains("top feature y"));
    }
}
