// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query intent classification and routing for Switchyard.
//!
//! This crate provides:
//! - [`QueryClassifier`]: pattern-count intent classification (pure, no I/O)
//! - [`RoutingPolicy`]: turns a classification into a Genie-or-model decision
//!
//! The policy runs before any model or data-service call, deciding whether a
//! chat query is answered by the general model or by the Genie Space.

pub mod classifier;
pub mod patterns;
pub mod policy;

pub use classifier::{ClassificationResult, QueryCategory, QueryClassifier};
pub use policy::{parse_route_override, RoutingDecision, RoutingPolicy};
