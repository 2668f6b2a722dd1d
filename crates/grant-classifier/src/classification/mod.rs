mod codes;
mod config;
mod evidence;
mod organization;
mod policy;
mod rules;
mod scorer;
mod standard;
mod text;

#[cfg(test)]
mod tests;

pub use codes::{CodeDecision, CodeRules};
pub use config::{
    Adjustment, Band, CategoryRules, CodeRule, CodeTables, Condition, CoreRules, DecisionPolicy,
    EvidenceRules, EvidenceWeights, KeywordWeights, OrgIndicators, OverrideRule, PhraseGate,
    ReviewPolicy, RuleSet, RuleSetLoadError, ScoreTest,
};
pub use evidence::{EvidenceAssessment, EvidenceLevel, EvidenceSignal, EvidenceTier};
pub use organization::{classify_organization, normalize_org_name};
pub use rules::{CompiledRules, RuleError};
pub use text::GrantText;

use crate::grants::GrantRecord;
use crate::taxonomy::{Category, OrgType};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Per-category score reported alongside a content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
}

/// First-pass classification of one grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub application_id: String,
    pub category: Category,
    pub confidence: u8,
    pub secondary_category: Option<Category>,
    pub org_type: OrgType,
    pub reasoning: String,
    pub needs_review: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<CategoryScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biotools_evidence: Option<EvidenceAssessment>,
}

impl ClassificationResult {
    pub fn score_for(&self, category: Category) -> Option<u32> {
        self.scores
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.score)
    }
}

/// Stateless classifier that applies a compiled rule set to grant records.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    rules: CompiledRules,
}

impl ClassificationEngine {
    pub fn new(rules: RuleSet) -> Result<Self, RuleError> {
        Ok(Self {
            rules: CompiledRules::compile(rules)?,
        })
    }

    pub fn standard() -> Result<Self, RuleError> {
        Self::new(RuleSet::standard())
    }

    pub fn rules(&self) -> &RuleSet {
        self.rules.rule_set()
    }

    pub fn code_rules(&self) -> CodeRules<'_> {
        CodeRules::new(&self.rules)
    }

    pub fn classify_organization(&self, org_name: Option<&str>, activity_code: &str) -> OrgType {
        organization::classify_with(
            &self.rules.set.organizations,
            &self.rules.set.codes.small_business,
            org_name,
            activity_code,
        )
    }

    pub fn assess_biotools_evidence(
        &self,
        record: &GrantRecord,
        org_type: OrgType,
    ) -> EvidenceAssessment {
        let small_business = self.rules.is_small_business(&record.code());
        evidence::assess(&self.rules.set.evidence, small_business, record, org_type)
    }

    /// Classifies one grant. Total and deterministic: any record yields a
    /// result, and the same record always yields the same result.
    pub fn classify_grant(&self, record: &GrantRecord) -> ClassificationResult {
        let code = record.code();
        let org_type = self.classify_organization(record.org_name.as_deref(), &code);
        let text = GrantText::from_record(record);
        let evidence = record
            .has_related_entities()
            .then(|| self.assess_biotools_evidence(record, org_type));

        let base = ClassificationResult {
            application_id: record.application_id.clone(),
            category: Category::Unclassified,
            confidence: 0,
            secondary_category: None,
            org_type,
            reasoning: String::new(),
            needs_review: false,
            scores: Vec::new(),
            biotools_evidence: evidence,
        };

        let code_rules = self.code_rules();
        if let Some(decision) = code_rules.deterministic(&code) {
            return from_code(base, decision);
        }

        let min_chars = self.rules.set.min_abstract_chars;
        if record.abstract_len() < min_chars {
            return ClassificationResult {
                reasoning: format!("abstract shorter than {min_chars} characters"),
                needs_review: true,
                ..base
            };
        }

        if let Some(decision) = code_rules.contextual(&code, &text) {
            return from_code(base, decision);
        }

        self.classify_content(base, &code, &text)
    }

    pub fn classify_all(&self, records: &[GrantRecord]) -> Vec<ClassificationResult> {
        records
            .iter()
            .map(|record| self.classify_grant(record))
            .collect()
    }

    fn classify_content(
        &self,
        base: ClassificationResult,
        code: &str,
        text: &GrantText,
    ) -> ClassificationResult {
        let set = &self.rules.set;
        let card = scorer::score(&self.rules, code, text);
        let scores: Vec<CategoryScore> = card
            .scores
            .iter()
            .map(|(category, score)| CategoryScore {
                category: *category,
                score: *score,
            })
            .collect();

        let Some(ranked) = policy::rank(&card.scores) else {
            let research_code = code.starts_with('R') && !self.rules.is_small_business(code);
            let fallback = policy::fallback(
                &set.decision,
                &text.full,
                research_code,
                self.rules.is_multi_component(code),
            );
            return ClassificationResult {
                category: fallback.category,
                confidence: fallback.confidence,
                reasoning: fallback.reason.to_string(),
                needs_review: true,
                scores,
                ..base
            };
        };

        let confidence = policy::confidence(&set.decision, &ranked);
        let secondary_category = policy::secondary(&set.decision, &ranked);

        let mut reasoning = match ranked.runner_up {
            Some((runner, runner_score)) => format!(
                "{} scored {} against {} at {} (margin {})",
                ranked.winner,
                ranked.top,
                runner,
                runner_score,
                ranked.margin()
            ),
            None => format!("{} scored {}", ranked.winner, ranked.top),
        };
        if !card.applied.is_empty() {
            reasoning.push_str(&format!("; rules: {}", card.applied.join(", ")));
        }

        let mut needs_review = !policy::auto_accept(&set.review, confidence, &ranked);
        let evidence_disagrees = ranked.winner != Category::Biotools
            && base
                .biotools_evidence
                .as_ref()
                .map(|assessment| assessment.level == EvidenceLevel::High)
                .unwrap_or(false);
        if evidence_disagrees {
            needs_review = true;
            reasoning.push_str("; strong biotools evidence disagrees");
        }

        ClassificationResult {
            category: ranked.winner,
            confidence,
            secondary_category,
            reasoning,
            needs_review,
            scores,
            ..base
        }
    }
}

fn from_code(base: ClassificationResult, decision: CodeDecision) -> ClassificationResult {
    ClassificationResult {
        category: decision.category,
        confidence: decision.confidence,
        reasoning: decision.reason,
        needs_review: false,
        ..base
    }
}

/// Tool-development evidence using the built-in keyword tables.
pub fn assess_biotools_evidence(record: &GrantRecord, org_type: OrgType) -> EvidenceAssessment {
    static STANDARD: OnceLock<RuleSet> = OnceLock::new();
    let rules = STANDARD.get_or_init(RuleSet::standard);
    let code = record.code();
    let small_business = rules.codes.small_business.iter().any(|entry| *entry == code);
    evidence::assess(&rules.evidence, small_business, record, org_type)
}
