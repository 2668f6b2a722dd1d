use super::config::{Band, DecisionPolicy, ReviewPolicy};
use super::text::contains_any;
use crate::taxonomy::Category;

/// Outcome of ranking the content scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ranked {
    pub winner: Category,
    pub top: u32,
    pub runner_up: Option<(Category, u32)>,
}

impl Ranked {
    pub fn margin(&self) -> u32 {
        self.top - self.runner_up.map(|(_, score)| score).unwrap_or(0)
    }
}

/// Highest score wins; ties go to the earlier category in priority order.
/// Returns `None` when every score is zero.
pub(crate) fn rank(scores: &[(Category, u32)]) -> Option<Ranked> {
    let mut ordered: Vec<(Category, u32)> = scores.to_vec();
    ordered.sort_by_key(|(category, _)| priority(*category));
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    let (winner, top) = *ordered.first()?;
    if top == 0 {
        return None;
    }
    Some(Ranked {
        winner,
        top,
        runner_up: ordered.get(1).copied(),
    })
}

fn priority(category: Category) -> usize {
    Category::CONTENT
        .iter()
        .position(|candidate| *candidate == category)
        .unwrap_or(Category::CONTENT.len())
}

fn band(bands: &[Band], value: u32) -> Option<u8> {
    bands
        .iter()
        .filter(|band| value >= band.min)
        .map(|band| band.confidence)
        .max()
}

/// Larger of the margin band and the magnitude band.
pub(crate) fn confidence(policy: &DecisionPolicy, ranked: &Ranked) -> u8 {
    let by_margin = band(&policy.margin_bands, ranked.margin()).unwrap_or(policy.base_confidence);
    let by_magnitude = band(&policy.magnitude_bands, ranked.top).unwrap_or(0);
    by_margin.max(by_magnitude).min(100)
}

pub(crate) fn secondary(policy: &DecisionPolicy, ranked: &Ranked) -> Option<Category> {
    let (category, score) = ranked.runner_up?;
    let meets_floor = score >= policy.secondary_min_score;
    let meets_ratio = score * 100 >= ranked.top * policy.secondary_ratio_pct;
    (meets_floor && meets_ratio).then_some(category)
}

pub(crate) fn auto_accept(policy: &ReviewPolicy, confidence: u8, ranked: &Ranked) -> bool {
    confidence >= policy.min_confidence
        && ranked.margin() >= policy.min_margin
        && ranked.top >= policy.min_score
}

/// Result used when no content category scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fallback {
    pub category: Category,
    pub confidence: u8,
    pub reason: &'static str,
}

pub(crate) fn fallback(
    policy: &DecisionPolicy,
    full_text: &str,
    research_code: bool,
    multi_component: bool,
) -> Fallback {
    if research_code && contains_any(full_text, &policy.fallback_study_terms) {
        return Fallback {
            category: Category::BasicResearch,
            confidence: policy.fallback_confidence,
            reason: "no category keywords matched; research grant describing a study",
        };
    }
    if multi_component {
        return Fallback {
            category: Category::Infrastructure,
            confidence: policy.fallback_confidence,
            reason: "no category keywords matched; multi-component award",
        };
    }
    Fallback {
        category: Category::Unclassified,
        confidence: 0,
        reason: "no category keywords matched",
    }
}
