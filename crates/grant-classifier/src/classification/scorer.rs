use super::config::{Adjustment, CategoryRules, KeywordWeights};
use super::rules::CompiledRules;
use super::text::GrantText;
use crate::taxonomy::Category;

/// Running per-category totals while keywords and overrides are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScoreBoard {
    values: [i32; Category::CONTENT.len()],
}

impl ScoreBoard {
    fn slot(category: Category) -> Option<usize> {
        Category::CONTENT
            .iter()
            .position(|candidate| *candidate == category)
    }

    pub(crate) fn get(&self, category: Category) -> i32 {
        Self::slot(category)
            .map(|index| self.values[index])
            .unwrap_or(0)
    }

    pub(crate) fn add(&mut self, category: Category, points: i32) {
        if let Some(index) = Self::slot(category) {
            self.values[index] = self.values[index].saturating_add(points);
        }
    }

    fn set(&mut self, category: Category, points: i32) {
        if let Some(index) = Self::slot(category) {
            self.values[index] = points;
        }
    }

    /// Floors every category at zero, in tie-break order.
    pub(crate) fn finalize(&self) -> Vec<(Category, u32)> {
        Category::CONTENT
            .iter()
            .zip(self.values.iter())
            .map(|(category, value)| (*category, (*value).max(0) as u32))
            .collect()
    }
}

/// Final scores plus the names of the override rules that fired.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreCard {
    pub scores: Vec<(Category, u32)>,
    pub applied: Vec<String>,
}

pub(crate) fn keyword_score(table: &CategoryRules, weights: &KeywordWeights, text: &GrantText) -> u32 {
    let title_term_hits = table
        .title_terms
        .iter()
        .filter(|term| text.title.contains(term.as_str()))
        .count() as u32;

    if let Some(gate) = &table.gate {
        let open = gate
            .any_of
            .iter()
            .any(|phrase| text.full.contains(phrase.as_str()));
        if !open {
            return title_term_hits * gate.ungated_title_weight;
        }
    }

    let phrase_points = |phrases: &[String], weight: u32| -> u32 {
        phrases
            .iter()
            .map(|phrase| {
                if text.title.contains(phrase.as_str()) {
                    weight * weights.title_multiplier
                } else if text.body.contains(phrase.as_str()) {
                    weight
                } else {
                    0
                }
            })
            .sum()
    };

    phrase_points(&table.strong, weights.strong)
        + phrase_points(&table.moderate, weights.moderate)
        + title_term_hits * weights.title_term
}

/// Keyword totals followed by the ordered override table. A `zero` effect
/// pins its category once every rule has run; `outrank` lifts are applied
/// after the pins.
pub(crate) fn score(rules: &CompiledRules, code: &str, text: &GrantText) -> ScoreCard {
    let set = &rules.set;
    let mut board = ScoreBoard::default();

    for table in &set.categories {
        let points = keyword_score(table, &set.weights, text);
        board.add(table.category, points.min(i32::MAX as u32) as i32);
    }

    let mut pinned = Vec::new();
    let mut lifts = Vec::new();
    let mut applied = Vec::new();
    for (rule, condition) in set.overrides.iter().zip(rules.overrides.iter()) {
        if !condition.matches(code, text, &board) {
            continue;
        }
        for effect in &rule.effects {
            match effect {
                Adjustment::Add { category, points } => board.add(*category, *points),
                Adjustment::Subtract { category, points } => board.add(*category, -*points),
                Adjustment::Zero { category } => pinned.push(*category),
                Adjustment::Outrank { category, over, by } => lifts.push((*category, *over, *by)),
            }
        }
        applied.push(rule.name.clone());
    }

    for category in pinned {
        board.set(category, 0);
    }
    for (category, over, by) in lifts {
        let floor = board.get(over).max(0).saturating_add(by);
        if board.get(category) < floor {
            board.set(category, floor);
        }
    }

    ScoreCard {
        scores: board.finalize(),
        applied,
    }
}
