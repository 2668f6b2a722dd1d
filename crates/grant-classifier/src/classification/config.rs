use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete, data-driven description of the classifier: code tables, keyword
/// tables, the override exception table and every decision threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub codes: CodeTables,
    pub min_abstract_chars: usize,
    pub organizations: OrgIndicators,
    pub weights: KeywordWeights,
    pub categories: Vec<CategoryRules>,
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
    pub decision: DecisionPolicy,
    pub review: ReviewPolicy,
    pub evidence: EvidenceRules,
}

impl RuleSet {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleSetLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn category_rules(&self, category: Category) -> Option<&CategoryRules> {
        self.categories.iter().find(|rules| rules.category == category)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleSetLoadError {
    #[error("failed to read rule set: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule set JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Funding-mechanism code sets and the code-driven rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeTables {
    pub training: Vec<String>,
    pub infrastructure: Vec<String>,
    pub multi_component: Vec<String>,
    pub small_business: Vec<String>,
    pub deterministic_confidence: u8,
    pub cores: CoreRules,
    #[serde(default)]
    pub special: Vec<CodeRule>,
}

/// Sub-project detection for program-project and center grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreRules {
    pub training_phrases: Vec<String>,
    pub infrastructure_phrases: Vec<String>,
    /// Regex patterns matched against the lowercased title.
    #[serde(default)]
    pub title_patterns: Vec<String>,
    pub training_confidence: u8,
    pub infrastructure_confidence: u8,
}

/// A fixed outcome for records matching a condition, applied before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRule {
    pub name: String,
    pub when: Condition,
    pub category: Category,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgIndicators {
    pub company: Vec<String>,
    pub research_institutes: Vec<String>,
    pub university: Vec<String>,
    pub hospital: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeights {
    pub strong: u32,
    pub moderate: u32,
    pub title_term: u32,
    /// Applied to strong and moderate phrases found in the title.
    pub title_multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub category: Category,
    #[serde(default)]
    pub strong: Vec<String>,
    #[serde(default)]
    pub moderate: Vec<String>,
    #[serde(default)]
    pub title_terms: Vec<String>,
    #[serde(default)]
    pub gate: Option<PhraseGate>,
}

/// When none of `any_of` appears in the text only title terms count, at
/// `ungated_title_weight` each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseGate {
    pub any_of: Vec<String>,
    pub ungated_title_weight: u32,
}

/// One entry of the override exception table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub name: String,
    pub when: Condition,
    pub effects: Vec<Adjustment>,
}

/// Every non-empty clause must hold. An empty condition always matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_codes: Vec<String>,
    /// Each group needs at least one phrase present in the full text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub none_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_any_of: Vec<String>,
    /// Matched against the opening of the abstract only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opening_any_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<ScoreTest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum ScoreTest {
    AtLeast { category: Category, points: i32 },
    Exceeds { category: Category, other: Category },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Adjustment {
    Add { category: Category, points: i32 },
    Subtract { category: Category, points: i32 },
    /// Pins the category to zero once every rule has run.
    Zero { category: Category },
    /// After pins, lifts `category` to at least `by` points above `over`.
    Outrank {
        category: Category,
        over: Category,
        by: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: u32,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub margin_bands: Vec<Band>,
    pub base_confidence: u8,
    pub magnitude_bands: Vec<Band>,
    pub secondary_min_score: u32,
    pub secondary_ratio_pct: u32,
    pub fallback_confidence: u8,
    pub fallback_study_terms: Vec<String>,
}

/// Auto-accept thresholds; anything below is routed to the review pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    pub min_confidence: u8,
    pub min_margin: u32,
    pub min_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRules {
    pub phr_developer: Vec<String>,
    pub phr_user: Vec<String>,
    pub title_developer: Vec<String>,
    pub abstract_developer: Vec<String>,
    pub abstract_commercial: Vec<String>,
    pub abstract_user: Vec<String>,
    pub methods_journals: Vec<String>,
    pub therapeutic_journals: Vec<String>,
    pub device_patent_terms: Vec<String>,
    pub therapeutic_patent_terms: Vec<String>,
    pub diagnostic_trial_terms: Vec<String>,
    pub weights: EvidenceWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidenceWeights {
    pub small_business: i32,
    pub company_org: i32,
    pub phr_developer: i32,
    pub phr_user: i32,
    pub title_developer: i32,
    pub abstract_developer: i32,
    pub abstract_commercial: i32,
    pub abstract_user: i32,
    pub methods_journal_each: i32,
    pub methods_journal_cap: i32,
    pub therapeutic_journal_each: i32,
    pub therapeutic_journal_cap: i32,
    pub publication_volume_threshold: usize,
    pub publication_volume: i32,
    pub device_patent_each: i32,
    pub device_patent_cap: i32,
    pub therapeutic_patent_each: i32,
    pub therapeutic_patent_cap: i32,
    pub patent_ratio_threshold: f32,
    pub patent_ratio_bonus: i32,
    pub diagnostic_trials: i32,
    pub therapeutic_trials: i32,
    pub high_threshold: u8,
    pub moderate_threshold: u8,
}
