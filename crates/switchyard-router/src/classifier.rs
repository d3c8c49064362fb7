// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-count query intent classification.
//!
//! Classifies chat queries as data lookups or general questions by counting
//! how many patterns of each table match. Pure function: no network, no
//! state, no failure mode.

use crate::patterns::{count_matches, DATA_MATCHERS, GENERAL_MATCHERS};

/// Intent category of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    /// Structured-data lookup, answered by the Genie Space.
    Data,
    /// Open-ended question, answered by the general model.
    General,
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryCategory::Data => write!(f, "data"),
            QueryCategory::General => write!(f, "general"),
        }
    }
}

/// Result of classifying a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: QueryCategory,
    /// Heuristic strength in `0.5..=0.95`, not a calibrated probability.
    pub confidence: f32,
    /// Number of data-intent patterns that matched.
    pub data_matches: usize,
    /// Number of general-intent patterns that matched.
    pub general_matches: usize,
    /// Which tie-break rule decided the category.
    pub reason: &'static str,
}

/// Cap when only one pattern table matched.
const EXCLUSIVE_CAP: f32 = 0.95;
/// Cap when both tables matched and one leads.
const CONTESTED_CAP: f32 = 0.85;
const EXCLUSIVE_STEP: f32 = 0.1;
const CONTESTED_STEP: f32 = 0.05;
const BASELINE: f32 = 0.5;

/// Stateless intent classifier over the compiled pattern tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query.
    ///
    /// Rules, first match wins:
    /// 1. only data patterns matched: Data, `0.5 + 0.1n` capped at 0.95
    /// 2. only general patterns matched: General, same formula
    /// 3. data leads: Data, `0.5 + 0.05 * margin` capped at 0.85
    /// 4. general leads: General, same formula
    /// 5. no matches or a tie: General at 0.5
    pub fn classify(&self, query: &str) -> ClassificationResult {
        let normalized = query.trim().to_lowercase();
        let data = count_matches(&DATA_MATCHERS, &normalized);
        let general = count_matches(&GENERAL_MATCHERS, &normalized);
        Self::decide(data, general)
    }

    /// Apply the tie-break rules to a pair of match counts.
    pub fn decide(data: usize, general: usize) -> ClassificationResult {
        let (category, confidence, reason) = if data > 0 && general == 0 {
            (
                QueryCategory::Data,
                scaled(data, EXCLUSIVE_STEP, EXCLUSIVE_CAP),
                "only data patterns matched",
            )
        } else if general > 0 && data == 0 {
            (
                QueryCategory::General,
                scaled(general, EXCLUSIVE_STEP, EXCLUSIVE_CAP),
                "only general patterns matched",
            )
        } else if data > general {
            (
                QueryCategory::Data,
                scaled(data - general, CONTESTED_STEP, CONTESTED_CAP),
                "data patterns outnumber general",
            )
        } else if general > data {
            (
                QueryCategory::General,
                scaled(general - data, CONTESTED_STEP, CONTESTED_CAP),
                "general patterns outnumber data",
            )
        } else {
            (QueryCategory::General, BASELINE, "ambiguous, defaulting to general")
        };

        ClassificationResult {
            category,
            confidence,
            data_matches: data,
            general_matches: general,
            reason,
        }
    }
}

fn scaled(count: usize, step: f32, cap: f32) -> f32 {
    (BASELINE + step * count as f32).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn housing_risk_question_is_data() {
        let r = QueryClassifier::new().classify("how many clients have a housing risk flag");
        assert_eq!(r.category, QueryCategory::Data);
        assert_eq!(r.data_matches, 3);
        assert_eq!(r.general_matches, 0);
        assert!(r.confidence >= 0.7);
        assert!(approx(r.confidence, 0.8));
    }

    #[test]
    fn neural_network_explanation_is_general() {
        let r = QueryClassifier::new().classify("explain how neural networks work");
        assert_eq!(r.category, QueryCategory::General);
        assert_eq!(r.data_matches, 0);
        assert!(r.confidence >= 0.7, "got {}", r.confidence);
    }

    #[test]
    fn no_matches_defaults_to_general() {
        let c = QueryClassifier::new();
        for q in ["", "   ", "hello there", "good morning"] {
            let r = c.classify(q);
            assert_eq!(r.category, QueryCategory::General, "query {q:?}");
            assert!(approx(r.confidence, 0.5));
            assert_eq!(r.reason, "ambiguous, defaulting to general");
        }
    }

    #[test]
    fn data_only_confidence_caps_at_095() {
        let r = QueryClassifier::new()
            .classify("show me the client records in the database table with metrics");
        assert_eq!(r.category, QueryCategory::Data);
        assert!(r.data_matches >= 5);
        assert!(approx(r.confidence, 0.95));
    }

    #[test]
    fn classification_is_case_insensitive_and_trimmed() {
        let c = QueryClassifier::new();
        let lower = c.classify("how many clients");
        let shouty = c.classify("   HOW MANY CLIENTS   ");
        assert_eq!(lower, shouty);
    }

    #[test]
    fn contested_data_lead_uses_smaller_step() {
        let r = QueryClassifier::new().classify("explain the client records in the database");
        assert_eq!(r.category, QueryCategory::Data);
        assert_eq!((r.data_matches, r.general_matches), (3, 1));
        assert!(approx(r.confidence, 0.6));
    }

    #[test]
    fn tie_defaults_to_general() {
        let r = QueryClassifier::new().classify("explain the database");
        assert_eq!((r.data_matches, r.general_matches), (1, 1));
        assert_eq!(r.category, QueryCategory::General);
        assert!(approx(r.confidence, 0.5));
    }

    #[test]
    fn decide_follows_rule_order() {
        let cases = [
            ((1, 0), QueryCategory::Data, 0.6),
            ((4, 0), QueryCategory::Data, 0.9),
            ((9, 0), QueryCategory::Data, 0.95),
            ((0, 2), QueryCategory::General, 0.7),
            ((5, 2), QueryCategory::Data, 0.65),
            ((12, 1), QueryCategory::Data, 0.85),
            ((1, 3), QueryCategory::General, 0.6),
            ((2, 2), QueryCategory::General, 0.5),
            ((0, 0), QueryCategory::General, 0.5),
        ];
        for ((data, general), category, confidence) in cases {
            let r = QueryClassifier::decide(data, general);
            assert_eq!(r.category, category, "({data}, {general})");
            assert!(approx(r.confidence, confidence), "({data}, {general}) -> {}", r.confidence);
        }
    }

    #[test]
    fn category_display() {
        assert_eq!(QueryCategory::Data.to_string(), "data");
        assert_eq!(QueryCategory::General.to_string(), "general");
    }

    proptest::proptest! {
        #[test]
        fn confidence_stays_in_band(query in ".{0,120}") {
            let r = QueryClassifier::new().classify(&query);
            proptest::prop_assert!((0.5..=0.95).contains(&r.confidence));
        }

        #[test]
        fn confidence_non_decreasing_in_margin(general in 0usize..6, data in 0usize..12) {
            let lower = QueryClassifier::decide(data, general);
            let higher = QueryClassifier::decide(data + 1, general);
            if lower.category == QueryCategory::Data && lower.data_matches > lower.general_matches {
                proptest::prop_assert!(higher.confidence >= lower.confidence);
            }
        }
    }
}
