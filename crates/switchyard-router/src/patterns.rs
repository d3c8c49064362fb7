// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent pattern tables.
//!
//! Patterns are matched against the lowercased, trimmed query. Each pattern
//! counts at most once per query no matter how often it occurs.

use std::sync::LazyLock;

use regex::Regex;

/// Patterns indicating a structured-data lookup.
pub const DATA_PATTERNS: &[&str] = &[
    r"\bhow many\b",
    r"\bshow me\b.*\b(data|record|client|metric|table|result)",
    r"\bwhat data\b",
    r"\bquery\b",
    r"\btable[s]?\b",
    r"\bclient[s]?\b",
    r"\bmetric[s]?\b",
    r"\bcount\b.*\b(record|client|row|entry|item)",
    r"\blist\b.*\b(all|client|record|data|table)",
    r"\bfind\b.*\b(record|client|data|entry)",
    r"\bsearch\b.*\b(database|record|client|data)",
    r"\bdatabase\b",
    r"\brecord[s]?\b",
    r"\bhousing risk\b",
    r"\bdisability\b",
    r"\bmental health\b",
    r"\bdemographic[s]?\b",
    r"\bmeasureresponse[s]?\b",
    r"\boutcome[s]?\b",
    r"\bprogram evaluation\b",
    r"\baverage\b.*\b(score|value|count|number)",
    r"\btotal\b.*\b(count|number|client|record)",
    r"\bsum\b",
    r"\bpercentage\b",
    r"\bdistribution\b",
    r"\bbreakdown\b",
    r"\banalyze\b.*\b(data|record|client)",
    r"\banalysis\b.*\b(data|record|client)",
    r"\bstatistic[s]?\b",
    r"\btrend[s]?\b.*\b(data|client|record)",
    r"\bcompare\b.*\b(data|client|record|metric)",
    r"\bcomparison\b.*\b(data|client|record)",
    r"\bfilter\b.*\b(data|record|client|by)",
    r"\bgroup by\b",
    r"\bsort\b.*\b(by|data|record)",
    r"\border by\b",
    r"\bselect\b.*\b(from|data|record)",
    r"\bwhere\b.*\b(=|>|<|is|are)",
    r"\bfrom\b.*\btable\b",
    r"\bai.?final\b",
    r"\bcleaned\b",
    r"\blongitudinal\b",
    r"\bsingle.?record\b",
    r"\bsupport need[s]?\b",
    r"\brisk level[s]?\b",
    r"\bassessment[s]?\b",
];

/// Patterns indicating an open-ended question for the general model.
pub const GENERAL_PATTERNS: &[&str] = &[
    r"\bexplain\b",
    r"\bwhat is\b.*\b(machine learning|ai|artificial intelligence|programming|coding|concept)\b",
    r"\bhow does\b.*\bwork\b",
    r"\bhow\b.*\bworks?\b",
    r"\bwrite\b.*\b(code|script|program|story|poem|essay)\b",
    r"\bcreate\b.*\b(story|poem|essay|content)\b",
    r"\btell me about\b",
    r"\bdefine\b",
    r"\bdescribe\b.*\b(concept|how|what)\b",
    r"\bhelp me understand\b",
    r"\bwhat are the benefits\b",
    r"\bwhat are the advantages\b",
    r"\bwhat are the disadvantages\b",
    r"\bpros and cons\b",
    r"\bopinion\b",
    r"\bthink about\b",
    r"\bsuggestion[s]?\b",
    r"\brecommend\b",
    r"\badvice\b",
    r"\btips\b",
    r"\bbest practice[s]?\b",
    r"\bhow to\b.*\b(learn|improve|start|begin)\b",
    r"\btutorial\b",
    r"\bguide\b",
    r"\bbenefits of\b",
    r"\badvantages of\b",
    r"\bdisadvantages of\b",
    r"\busing\b.*\b(ai|machine learning|python|programming)\b",
];

/// Compiled data-intent matchers, built once per process.
pub static DATA_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DATA_PATTERNS));

/// Compiled general-intent matchers, built once per process.
pub static GENERAL_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(GENERAL_PATTERNS));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid intent pattern {p:?}: {e}")))
        .collect()
}

/// Number of matchers in `set` that match `text` at least once.
pub fn count_matches(set: &[Regex], text: &str) -> usize {
    set.iter().filter(|re| re.is_match(text)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(DATA_MATCHERS.len(), DATA_PATTERNS.len());
        assert_eq!(GENERAL_MATCHERS.len(), GENERAL_PATTERNS.len());
    }

    #[test]
    fn repeated_occurrences_count_once() {
        assert_eq!(count_matches(&DATA_MATCHERS, "clients clients clients"), 1);
    }

    #[test]
    fn word_boundaries_are_respected() {
        // "network" must not satisfy the standalone "work" pattern.
        assert_eq!(count_matches(&GENERAL_MATCHERS, "how big is the network"), 0);
        // "sum" inside "summer" is not a data signal.
        assert_eq!(count_matches(&DATA_MATCHERS, "summer"), 0);
    }
}
