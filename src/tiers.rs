//! Performance tiers: the externally configured score bands and their colors.
//!
//! The tier document is a JSON object mapping a tier key (one per subject plus
//! the overall fallback key) to an ordered list of bands:
//!
//! ```json
//! { "matematicas": [ { "nivel": "Bajo", "min": 0, "max": 2.9, "color": "#f00" } ] }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::subject::{OVERALL_TIER_KEY, Subject};

/// Color shown when no band matches.
pub const NEUTRAL_COLOR: &str = "#cccccc";

/// Label shown when no band matches.
pub const NO_TIER_LABEL: &str = "N/A";

/// One colored score band with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TierRule {
    #[serde(rename = "nivel", alias = "label")]
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub color: String,
}

impl TierRule {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}

/// Which rule sequence a lookup should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKey {
    Subject(Subject),
    /// Averages that are not tied to a subject (by grade, by group).
    Overall,
}

impl TierKey {
    pub fn as_str(self) -> &'static str {
        match self {
            TierKey::Subject(subject) => subject.tier_key(),
            TierKey::Overall => OVERALL_TIER_KEY,
        }
    }
}

/// Rule sequences keyed by tier key, as loaded from the tier document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TierConfig {
    rules: HashMap<String, Vec<TierRule>>,
}

impl TierConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("tier document is not a valid tier mapping")
    }

    pub fn rules_for(&self, key: TierKey) -> Option<&[TierRule]> {
        self.rules.get(key.as_str()).map(Vec::as_slice)
    }

    /// Returns the first band, in declaration order, whose inclusive bounds hold `score`.
    ///
    /// `None` when the key has no rules, the score is not a number, or the
    /// score falls in a gap between bands.
    pub fn resolve(&self, key: TierKey, score: f64) -> Option<&TierRule> {
        if score.is_nan() {
            return None;
        }
        self.rules_for(key)?.iter().find(|rule| rule.contains(score))
    }

    /// Color for a score, falling back to [`NEUTRAL_COLOR`].
    pub fn color(&self, key: TierKey, score: f64) -> &str {
        self.resolve(key, score)
            .map_or(NEUTRAL_COLOR, |rule| rule.color.as_str())
    }

    /// Label for a score, falling back to [`NO_TIER_LABEL`].
    pub fn label(&self, key: TierKey, score: f64) -> &str {
        self.resolve(key, score)
            .map_or(NO_TIER_LABEL, |rule| rule.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
