use super::config::EvidenceRules;
use super::organization::normalize_org_name;
use super::text::{contains_any, GrantText};
use crate::grants::{ClinicalStudy, GrantRecord, Patent, Publication};
use crate::taxonomy::OrgType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceTier {
    Organizational,
    Abstract,
    Publications,
    Patents,
    ClinicalTrials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSignal {
    pub tier: EvidenceTier,
    /// Record field or related collection the signal was read from.
    pub source: String,
    pub signal: String,
    pub weight: i32,
}

/// How strongly a grant looks like research-tool development, built from the
/// grant itself and its publications, patents and clinical studies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceAssessment {
    pub score: u8,
    pub level: EvidenceLevel,
    pub signals: Vec<EvidenceSignal>,
    pub reasoning: String,
}

pub(crate) fn is_methods_journal(rules: &EvidenceRules, publication: &Publication) -> bool {
    journal_matches(&rules.methods_journals, publication)
}

pub(crate) fn is_therapeutic_journal(rules: &EvidenceRules, publication: &Publication) -> bool {
    journal_matches(&rules.therapeutic_journals, publication)
}

fn journal_matches(journals: &[String], publication: &Publication) -> bool {
    let key = normalize_org_name(&format!(
        "{} {}",
        publication.journal_abbr, publication.journal_title
    ));
    journals
        .iter()
        .any(|journal| key.contains(&format!(" {journal} ")))
}

pub(crate) fn is_device_patent(rules: &EvidenceRules, patent: &Patent) -> bool {
    contains_any(&patent.title.to_lowercase(), &rules.device_patent_terms)
}

pub(crate) fn is_therapeutic_patent(rules: &EvidenceRules, patent: &Patent) -> bool {
    contains_any(&patent.title.to_lowercase(), &rules.therapeutic_patent_terms)
}

pub(crate) fn is_diagnostic_trial(rules: &EvidenceRules, study: &ClinicalStudy) -> bool {
    contains_any(&study.title.to_lowercase(), &rules.diagnostic_trial_terms)
}

/// Diagnostic wording wins; every other study counts as therapeutic.
pub(crate) fn is_therapeutic_trial(rules: &EvidenceRules, study: &ClinicalStudy) -> bool {
    !is_diagnostic_trial(rules, study)
}

struct Tally {
    signals: Vec<EvidenceSignal>,
}

impl Tally {
    fn push(
        &mut self,
        tier: EvidenceTier,
        source: &str,
        signal: impl Into<String>,
        weight: i32,
    ) {
        self.signals.push(EvidenceSignal {
            tier,
            source: source.to_string(),
            signal: signal.into(),
            weight,
        });
    }

    fn total(&self) -> i32 {
        self.signals.iter().map(|signal| signal.weight).sum()
    }
}

pub(crate) fn assess(
    rules: &EvidenceRules,
    small_business: bool,
    record: &GrantRecord,
    org_type: OrgType,
) -> EvidenceAssessment {
    let weights = &rules.weights;
    let text = GrantText::from_record(record);
    let phr = record.phr.as_deref().unwrap_or_default().to_lowercase();
    let abstract_text = record
        .abstract_text
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let mut tally = Tally {
        signals: Vec::new(),
    };

    let mechanism = record
        .funding_mechanism
        .as_deref()
        .unwrap_or_default()
        .to_ascii_uppercase();
    if small_business || mechanism.contains("SBIR") || mechanism.contains("STTR") {
        tally.push(
            EvidenceTier::Organizational,
            "funding_mechanism",
            "SBIR/STTR funding",
            weights.small_business,
        );
    }
    if org_type == OrgType::Company {
        tally.push(
            EvidenceTier::Organizational,
            "org_type",
            "organization is a company",
            weights.company_org,
        );
    }
    if contains_any(&phr, &rules.phr_developer) {
        tally.push(
            EvidenceTier::Organizational,
            "phr",
            "health relevance statement describes building a product",
            weights.phr_developer,
        );
    }
    if contains_any(&phr, &rules.phr_user) {
        tally.push(
            EvidenceTier::Organizational,
            "phr",
            "health relevance statement describes applying existing tools",
            weights.phr_user,
        );
    }
    if contains_any(&text.title, &rules.title_developer) {
        tally.push(
            EvidenceTier::Organizational,
            "title",
            "title names a tool under development",
            weights.title_developer,
        );
    }

    if contains_any(&abstract_text, &rules.abstract_developer) {
        tally.push(
            EvidenceTier::Abstract,
            "abstract",
            "abstract describes tool development",
            weights.abstract_developer,
        );
    }
    if contains_any(&abstract_text, &rules.abstract_commercial) {
        tally.push(
            EvidenceTier::Abstract,
            "abstract",
            "abstract mentions commercialization",
            weights.abstract_commercial,
        );
    }
    if contains_any(&abstract_text, &rules.abstract_user) {
        tally.push(
            EvidenceTier::Abstract,
            "abstract",
            "abstract describes using existing tools",
            weights.abstract_user,
        );
    }

    publication_signals(rules, &record.publications, &mut tally);
    patent_signals(rules, &record.patents, record.publications.len(), &mut tally);
    trial_signals(rules, &record.clinical_studies, &mut tally);

    let score = tally.total().clamp(0, 100) as u8;
    let level = if score >= weights.high_threshold {
        EvidenceLevel::High
    } else if score >= weights.moderate_threshold {
        EvidenceLevel::Moderate
    } else {
        EvidenceLevel::Low
    };
    let reasoning = reasoning(level, &tally.signals);

    EvidenceAssessment {
        score,
        level,
        signals: tally.signals,
        reasoning,
    }
}

fn capped(count: usize, each: i32, cap: i32) -> i32 {
    let total = each.saturating_mul(count.min(i32::MAX as usize) as i32);
    if each >= 0 {
        total.min(cap)
    } else {
        total.max(cap)
    }
}

fn publication_signals(rules: &EvidenceRules, publications: &[Publication], tally: &mut Tally) {
    if publications.is_empty() {
        return;
    }
    let weights = &rules.weights;

    let methods = publications
        .iter()
        .filter(|publication| is_methods_journal(rules, publication))
        .count();
    if methods > 0 {
        tally.push(
            EvidenceTier::Publications,
            "publications",
            format!("{methods} methods journal publications"),
            capped(methods, weights.methods_journal_each, weights.methods_journal_cap),
        );
    }

    let therapeutic = publications
        .iter()
        .filter(|publication| is_therapeutic_journal(rules, publication))
        .count();
    if therapeutic > 0 {
        tally.push(
            EvidenceTier::Publications,
            "publications",
            format!("{therapeutic} therapeutic journal publications"),
            capped(
                therapeutic,
                weights.therapeutic_journal_each,
                weights.therapeutic_journal_cap,
            ),
        );
    }

    if publications.len() > weights.publication_volume_threshold {
        tally.push(
            EvidenceTier::Publications,
            "publications",
            format!("{} publications (high academic output)", publications.len()),
            weights.publication_volume,
        );
    }
}

fn patent_signals(
    rules: &EvidenceRules,
    patents: &[Patent],
    publication_count: usize,
    tally: &mut Tally,
) {
    if patents.is_empty() {
        return;
    }
    let weights = &rules.weights;

    let device = patents
        .iter()
        .filter(|patent| is_device_patent(rules, patent))
        .count();
    if device > 0 {
        tally.push(
            EvidenceTier::Patents,
            "patents",
            format!("{device} device or system patents"),
            capped(device, weights.device_patent_each, weights.device_patent_cap),
        );
    }

    let therapeutic = patents
        .iter()
        .filter(|patent| is_therapeutic_patent(rules, patent))
        .count();
    if therapeutic > 0 {
        tally.push(
            EvidenceTier::Patents,
            "patents",
            format!("{therapeutic} therapeutic patents"),
            capped(
                therapeutic,
                weights.therapeutic_patent_each,
                weights.therapeutic_patent_cap,
            ),
        );
    }

    if publication_count > 0 {
        let ratio = patents.len() as f32 / publication_count as f32;
        if ratio > weights.patent_ratio_threshold {
            tally.push(
                EvidenceTier::Patents,
                "patents",
                format!("patent to publication ratio {ratio:.2}"),
                weights.patent_ratio_bonus,
            );
        }
    }
}

fn trial_signals(rules: &EvidenceRules, studies: &[ClinicalStudy], tally: &mut Tally) {
    if studies.is_empty() {
        return;
    }
    let weights = &rules.weights;

    let therapeutic = studies
        .iter()
        .filter(|study| is_therapeutic_trial(rules, study))
        .count();
    let diagnostic = studies.len() - therapeutic;

    if therapeutic > 0 {
        tally.push(
            EvidenceTier::ClinicalTrials,
            "clinical_studies",
            format!("{therapeutic} therapeutic clinical trials"),
            weights.therapeutic_trials,
        );
    } else if diagnostic > 0 {
        tally.push(
            EvidenceTier::ClinicalTrials,
            "clinical_studies",
            format!("{diagnostic} diagnostic clinical trials"),
            weights.diagnostic_trials,
        );
    }
}

fn reasoning(level: EvidenceLevel, signals: &[EvidenceSignal]) -> String {
    let mut reasoning = match level {
        EvidenceLevel::High => "strong evidence of research tool development".to_string(),
        EvidenceLevel::Moderate => "some evidence of research tool development".to_string(),
        EvidenceLevel::Low => "little evidence of research tool development".to_string(),
    };

    let mut positive: Vec<_> = signals.iter().filter(|signal| signal.weight > 0).collect();
    positive.sort_by(|a, b| b.weight.cmp(&a.weight));
    if !positive.is_empty() {
        let names: Vec<_> = positive.iter().take(3).map(|s| s.signal.as_str()).collect();
        reasoning.push_str(&format!("; key indicators: {}", names.join(", ")));
    }

    let mut negative: Vec<_> = signals.iter().filter(|signal| signal.weight < 0).collect();
    negative.sort_by(|a, b| a.weight.cmp(&b.weight));
    if !negative.is_empty() {
        let names: Vec<_> = negative.iter().take(2).map(|s| s.signal.as_str()).collect();
        reasoning.push_str(&format!("; against: {}", names.join(", ")));
    }

    reasoning
}
