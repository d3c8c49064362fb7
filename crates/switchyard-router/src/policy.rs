// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing policy: Genie Space or general model.
//!
//! Precedence for [`RoutingPolicy::route`]: per-message override > global
//! `force_target` > routing disabled > classification.

use switchyard_config::model::RoutingConfig;
use switchyard_core::RouteTarget;
use tracing::{debug, info};

use crate::classifier::{ClassificationResult, QueryCategory, QueryClassifier};

/// Outcome of routing one query.
#[derive(Debug, Clone)]
pub struct RoutingDecision<'a> {
    pub target: RouteTarget,
    /// Present whenever the classifier was consulted.
    pub classification: Option<ClassificationResult>,
    /// Human-readable reason, suitable for logs and diagnostics.
    pub reason: String,
    /// The query with any override prefix removed.
    pub query: &'a str,
}

/// Decides where a query is answered.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    classifier: QueryClassifier,
    config: RoutingConfig,
}

impl RoutingPolicy {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            classifier: QueryClassifier::new(),
            config,
        }
    }

    /// Classify without deciding.
    pub fn classify(&self, query: &str) -> ClassificationResult {
        self.classifier.classify(query)
    }

    /// True iff the query classifies as data intent with at least
    /// `min_data_confidence`. Ignores overrides and `force_target`.
    pub fn should_route_to_data_service(&self, query: &str) -> bool {
        let result = self.classifier.classify(query);
        info!(
            category = %result.category,
            confidence = result.confidence,
            data_matches = result.data_matches,
            general_matches = result.general_matches,
            "query classified"
        );
        self.accepts(&result)
    }

    /// Explanation of the classifier-only decision, e.g.
    /// `Routing to Genie Space (data query, confidence: 80%)`.
    pub fn explain(&self, query: &str) -> String {
        let result = self.classifier.classify(query);
        Self::describe(&result, self.accepts(&result))
    }

    /// Full routing decision, honoring overrides and config.
    pub fn route<'a>(&self, query: &'a str) -> RoutingDecision<'a> {
        let (override_target, rest) = parse_route_override(query);
        if let Some(target) = override_target {
            debug!(%target, "per-message route override");
            return RoutingDecision {
                target,
                classification: None,
                reason: "per-message override".to_string(),
                query: rest,
            };
        }

        if let Some(target) = self.config.force_target {
            return RoutingDecision {
                target,
                classification: None,
                reason: "global force_target config".to_string(),
                query,
            };
        }

        if !self.config.enabled {
            return RoutingDecision {
                target: RouteTarget::Model,
                classification: None,
                reason: "routing disabled".to_string(),
                query,
            };
        }

        let result = self.classifier.classify(query);
        let to_genie = self.accepts(&result);
        info!(
            category = %result.category,
            confidence = result.confidence,
            to_genie,
            "query routed"
        );
        RoutingDecision {
            target: if to_genie {
                RouteTarget::Genie
            } else {
                RouteTarget::Model
            },
            reason: Self::describe(&result, to_genie),
            classification: Some(result),
            query,
        }
    }

    fn accepts(&self, result: &ClassificationResult) -> bool {
        result.category == QueryCategory::Data
            && result.confidence >= self.config.min_data_confidence
    }

    fn describe(result: &ClassificationResult, to_genie: bool) -> String {
        let destination = if to_genie {
            "Genie Space"
        } else {
            "general model"
        };
        format!(
            "Routing to {destination} ({} query, confidence: {:.0}%)",
            result.category,
            result.confidence * 100.0
        )
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

/// Parse a per-message route prefix.
///
/// `/genie ` and `/llm ` (with trailing space) force the target; the prefix is
/// stripped from the returned text. Anything else returns `(None, text)`.
pub fn parse_route_override(text: &str) -> (Option<RouteTarget>, &str) {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix("/genie ") {
        (Some(RouteTarget::Genie), rest)
    } else if let Some(rest) = trimmed.strip_prefix("/llm ") {
        (Some(RouteTarget::Model), rest)
    } else {
        (None, text)
    }
}
