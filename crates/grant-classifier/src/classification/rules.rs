use super::config::{Condition, RuleSet, ScoreTest};
use super::scorer::ScoreBoard;
use super::text::{contains_any, GrantText};
use crate::taxonomy::Category;
use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule '{rule}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("keyword table for {0} is declared more than once")]
    DuplicateCategory(Category),
    #[error("{0} cannot carry a keyword table")]
    NonContentCategory(Category),
}

/// A rule set with normalized phrases and compiled patterns, ready for the
/// engine. All validation happens here so classification itself cannot fail.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub(crate) set: RuleSet,
    pub(crate) special: Vec<CompiledCondition>,
    pub(crate) overrides: Vec<CompiledCondition>,
    pub(crate) core_title_patterns: Vec<Regex>,
}

impl CompiledRules {
    pub fn compile(mut set: RuleSet) -> Result<Self, RuleError> {
        normalize(&mut set);

        let mut seen = Vec::new();
        for table in &set.categories {
            if !table.category.is_content() {
                return Err(RuleError::NonContentCategory(table.category));
            }
            if seen.contains(&table.category) {
                return Err(RuleError::DuplicateCategory(table.category));
            }
            seen.push(table.category);
        }

        let special = set
            .codes
            .special
            .iter()
            .map(|rule| CompiledCondition::compile(&rule.name, &rule.when))
            .collect::<Result<Vec<_>, _>>()?;
        let overrides = set
            .overrides
            .iter()
            .map(|rule| CompiledCondition::compile(&rule.name, &rule.when))
            .collect::<Result<Vec<_>, _>>()?;
        let core_title_patterns = compile_patterns("core_title", &set.codes.cores.title_patterns)?;

        Ok(Self {
            set,
            special,
            overrides,
            core_title_patterns,
        })
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.set
    }

    pub(crate) fn is_small_business(&self, code: &str) -> bool {
        self.set.codes.small_business.iter().any(|entry| entry == code)
    }

    pub(crate) fn is_multi_component(&self, code: &str) -> bool {
        self.set.codes.multi_component.iter().any(|entry| entry == code)
    }
}

/// Condition with its regular expressions compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledCondition {
    condition: Condition,
    patterns: Vec<Regex>,
    title_patterns: Vec<Regex>,
}

impl CompiledCondition {
    fn compile(rule: &str, condition: &Condition) -> Result<Self, RuleError> {
        Ok(Self {
            condition: condition.clone(),
            patterns: compile_patterns(rule, &condition.patterns)?,
            title_patterns: compile_patterns(rule, &condition.title_patterns)?,
        })
    }

    /// Evaluates every clause except score tests.
    pub(crate) fn matches_text(&self, code: &str, text: &GrantText) -> bool {
        let condition = &self.condition;

        if !condition.activity_codes.is_empty()
            && !condition.activity_codes.iter().any(|entry| entry == code)
        {
            return false;
        }
        if !condition
            .any_of
            .iter()
            .all(|group| contains_any(&text.full, group))
        {
            return false;
        }
        if !condition
            .all_of
            .iter()
            .all(|phrase| text.full.contains(phrase.as_str()))
        {
            return false;
        }
        if contains_any(&text.full, &condition.none_of) {
            return false;
        }
        if !condition.title_any_of.is_empty() && !contains_any(&text.title, &condition.title_any_of)
        {
            return false;
        }
        if !condition.opening_any_of.is_empty()
            && !contains_any(&text.opening, &condition.opening_any_of)
        {
            return false;
        }
        if !self.patterns.is_empty() && !self.patterns.iter().any(|re| re.is_match(&text.full)) {
            return false;
        }
        if !self.title_patterns.is_empty()
            && !self.title_patterns.iter().any(|re| re.is_match(&text.title))
        {
            return false;
        }
        true
    }

    pub(crate) fn matches(&self, code: &str, text: &GrantText, board: &ScoreBoard) -> bool {
        self.matches_text(code, text)
            && self.condition.scores.iter().all(|test| match test {
                ScoreTest::AtLeast { category, points } => board.get(*category) >= *points,
                ScoreTest::Exceeds { category, other } => board.get(*category) > board.get(*other),
            })
    }
}

fn compile_patterns(rule: &str, patterns: &[String]) -> Result<Vec<Regex>, RuleError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                rule: rule.to_string(),
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn lower(phrases: &mut [String]) {
    for phrase in phrases.iter_mut() {
        *phrase = phrase.to_lowercase();
    }
}

fn upper(codes: &mut [String]) {
    for code in codes.iter_mut() {
        *code = code.trim().to_ascii_uppercase();
    }
}

fn normalize_condition(condition: &mut Condition) {
    upper(&mut condition.activity_codes);
    for group in condition.any_of.iter_mut() {
        lower(group);
    }
    lower(&mut condition.all_of);
    lower(&mut condition.none_of);
    lower(&mut condition.title_any_of);
    lower(&mut condition.opening_any_of);
}

/// Phrases match against lowercased text and codes against upper-cased codes,
/// so hand-written rule files may use any case.
fn normalize(set: &mut RuleSet) {
    let codes = &mut set.codes;
    upper(&mut codes.training);
    upper(&mut codes.infrastructure);
    upper(&mut codes.multi_component);
    upper(&mut codes.small_business);
    lower(&mut codes.cores.training_phrases);
    lower(&mut codes.cores.infrastructure_phrases);
    for rule in codes.special.iter_mut() {
        normalize_condition(&mut rule.when);
    }

    let orgs = &mut set.organizations;
    lower(&mut orgs.company);
    lower(&mut orgs.research_institutes);
    lower(&mut orgs.university);
    lower(&mut orgs.hospital);

    for table in set.categories.iter_mut() {
        lower(&mut table.strong);
        lower(&mut table.moderate);
        lower(&mut table.title_terms);
        if let Some(gate) = table.gate.as_mut() {
            lower(&mut gate.any_of);
        }
    }
    for rule in set.overrides.iter_mut() {
        normalize_condition(&mut rule.when);
    }
    lower(&mut set.decision.fallback_study_terms);

    let evidence = &mut set.evidence;
    for phrases in [
        &mut evidence.phr_developer,
        &mut evidence.phr_user,
        &mut evidence.title_developer,
        &mut evidence.abstract_developer,
        &mut evidence.abstract_commercial,
        &mut evidence.abstract_user,
        &mut evidence.methods_journals,
        &mut evidence.therapeutic_journals,
        &mut evidence.device_patent_terms,
        &mut evidence.therapeutic_patent_terms,
        &mut evidence.diagnostic_trial_terms,
    ] {
        lower(phrases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::config::{Adjustment, OverrideRule};
    use crate::grants::GrantRecord;

    fn text(title: &str, abstract_text: &str) -> GrantText {
        GrantText::from_record(
            &GrantRecord::new("1", "R01")
                .with_title(title)
                .with_abstract(abstract_text),
        )
    }

    fn compiled(condition: Condition) -> CompiledCondition {
        CompiledCondition::compile("test", &condition).expect("condition compiles")
    }

    #[test]
    fn standard_rules_compile() {
        let rules = CompiledRules::compile(RuleSet::standard()).expect("standard rules compile");
        assert!(rules.is_small_business("R43"));
        assert!(rules.is_multi_component("P01"));
        assert!(!rules.is_multi_component("R01"));
    }

    #[test]
    fn invalid_pattern_is_rejected_at_compile_time() {
        let mut set = RuleSet::standard();
        set.overrides.push(OverrideRule {
            name: "broken".to_string(),
            when: Condition {
                patterns: vec!["(unclosed".to_string()],
                ..Condition::default()
            },
            effects: vec![Adjustment::Add {
                category: Category::Other,
                points: 1,
            }],
        });

        match CompiledRules::compile(set) {
            Err(RuleError::InvalidPattern { rule, .. }) => assert_eq!(rule, "broken"),
            other => panic!("expected invalid pattern error, got {other:?}"),
        }
    }

    #[test]
    fn keyword_tables_must_be_content_categories() {
        let mut set = RuleSet::standard();
        let mut table = set.categories[0].clone();
        table.category = Category::Training;
        set.categories.push(table);

        assert!(matches!(
            CompiledRules::compile(set),
            Err(RuleError::NonContentCategory(Category::Training))
        ));
    }

    #[test]
    fn duplicate_keyword_tables_are_rejected() {
        let mut set = RuleSet::standard();
        let duplicate = set.categories[1].clone();
        set.categories.push(duplicate);

        assert!(matches!(
            CompiledRules::compile(set),
            Err(RuleError::DuplicateCategory(Category::Therapeutics))
        ));
    }

    #[test]
    fn phrases_are_case_insensitive_after_compile() {
        let mut set = RuleSet::standard();
        set.codes.small_business = vec![" r43 ".to_string()];
        let rules = CompiledRules::compile(set).expect("compiles");
        assert!(rules.is_small_business("R43"));
    }

    #[test]
    fn any_of_groups_each_need_a_match() {
        let condition = compiled(Condition {
            any_of: vec![
                vec!["mindfulness".to_string()],
                vec!["drug".to_string(), "medication".to_string()],
            ],
            ..Condition::default()
        });

        let board = ScoreBoard::default();
        assert!(!condition.matches("R01", &text("t", "a mindfulness program"), &board));
        assert!(condition.matches(
            "R01",
            &text("t", "a mindfulness program with medication support"),
            &board
        ));
    }

    #[test]
    fn none_of_and_opening_clauses() {
        let condition = compiled(Condition {
            opening_any_of: vec!["we will use".to_string()],
            none_of: vec!["develop".to_string()],
            ..Condition::default()
        });
        let board = ScoreBoard::default();

        assert!(condition.matches("R01", &text("t", "We will use an existing atlas."), &board));
        assert!(!condition.matches(
            "R01",
            &text("t", "We will use and develop an atlas."),
            &board
        ));
    }

    #[test]
    fn score_tests_read_the_board() {
        let condition = compiled(Condition {
            scores: vec![ScoreTest::Exceeds {
                category: Category::BasicResearch,
                other: Category::Biotools,
            }],
            ..Condition::default()
        });
        let mut board = ScoreBoard::default();
        let sample = text("t", "abstract");

        assert!(!condition.matches("R01", &sample, &board));
        board.add(Category::BasicResearch, 5);
        assert!(condition.matches("R01", &sample, &board));
    }

    #[test]
    fn title_patterns_match_the_title_only() {
        let condition = compiled(Condition {
            title_patterns: vec![r"\bphase\s+(ii|2)\b".to_string()],
            ..Condition::default()
        });
        let board = ScoreBoard::default();

        assert!(condition.matches("R01", &text("A Phase II study", "abstract"), &board));
        assert!(!condition.matches("R01", &text("A study", "phase ii"), &board));
    }
}
