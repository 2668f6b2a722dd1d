use super::rules::CompiledRules;
use super::text::{first_match, GrantText};
use crate::taxonomy::Category;
use serde::Serialize;

/// Category fixed by the activity code (and, for center grants, the
/// sub-project wording) without content scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeDecision {
    pub category: Category,
    pub confidence: u8,
    pub reason: String,
}

/// Code-driven rules over a compiled rule set.
#[derive(Debug, Clone, Copy)]
pub struct CodeRules<'a> {
    rules: &'a CompiledRules,
}

impl<'a> CodeRules<'a> {
    pub fn new(rules: &'a CompiledRules) -> Self {
        Self { rules }
    }

    /// Training and infrastructure code sets, which apply regardless of text.
    pub fn deterministic(&self, code: &str) -> Option<CodeDecision> {
        let tables = &self.rules.set.codes;
        let confidence = tables.deterministic_confidence;

        if tables.training.iter().any(|entry| entry == code) {
            return Some(CodeDecision {
                category: Category::Training,
                confidence,
                reason: format!("activity code {code} is a training mechanism"),
            });
        }
        if tables.infrastructure.iter().any(|entry| entry == code) {
            return Some(CodeDecision {
                category: Category::Infrastructure,
                confidence,
                reason: format!("activity code {code} funds infrastructure"),
            });
        }
        None
    }

    /// Sub-project cores of multi-component awards, then the special-code
    /// table in order.
    pub fn contextual(&self, code: &str, text: &GrantText) -> Option<CodeDecision> {
        let tables = &self.rules.set.codes;

        if self.rules.is_multi_component(code) {
            let cores = &tables.cores;
            if let Some(phrase) = first_match(&text.full, &cores.training_phrases) {
                return Some(CodeDecision {
                    category: Category::Training,
                    confidence: cores.training_confidence,
                    reason: format!("{code} component with training language ('{phrase}')"),
                });
            }
            if let Some(phrase) = first_match(&text.full, &cores.infrastructure_phrases) {
                return Some(CodeDecision {
                    category: Category::Infrastructure,
                    confidence: cores.infrastructure_confidence,
                    reason: format!("{code} component with core facility language ('{phrase}')"),
                });
            }
            if self
                .rules
                .core_title_patterns
                .iter()
                .any(|pattern| pattern.is_match(&text.title))
            {
                return Some(CodeDecision {
                    category: Category::Infrastructure,
                    confidence: cores.infrastructure_confidence,
                    reason: format!("{code} component titled as a core"),
                });
            }
        }

        tables
            .special
            .iter()
            .zip(self.rules.special.iter())
            .find(|(_, condition)| condition.matches_text(code, text))
            .map(|(rule, _)| CodeDecision {
                category: rule.category,
                confidence: rule.confidence,
                reason: format!("special code rule '{}'", rule.name),
            })
    }

    pub fn classify(&self, code: &str, text: &GrantText) -> Option<CodeDecision> {
        self.deterministic(code)
            .or_else(|| self.contextual(code, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::config::RuleSet;
    use crate::grants::GrantRecord;

    fn rules() -> CompiledRules {
        CompiledRules::compile(RuleSet::standard()).expect("standard rules compile")
    }

    fn text(title: &str, abstract_text: &str) -> GrantText {
        GrantText::from_record(
            &GrantRecord::new("1", "P01")
                .with_title(title)
                .with_abstract(abstract_text),
        )
    }

    #[test]
    fn training_and_infrastructure_codes_are_deterministic() {
        let rules = rules();
        let codes = CodeRules::new(&rules);

        let training = codes.deterministic("T32").expect("training code");
        assert_eq!(training.category, Category::Training);
        assert_eq!(training.confidence, 95);

        let ctsa = codes.deterministic("UL1").expect("infrastructure code");
        assert_eq!(ctsa.category, Category::Infrastructure);

        assert!(codes.deterministic("R01").is_none());
    }

    #[test]
    fn multi_component_cores_use_subproject_language() {
        let rules = rules();
        let codes = CodeRules::new(&rules);

        let mentoring = codes
            .contextual("P20", &text("Project 3", "The mentoring core supports junior faculty."))
            .expect("mentoring core");
        assert_eq!(
            (mentoring.category, mentoring.confidence),
            (Category::Training, 85)
        );

        let facility = codes
            .contextual("U54", &text("Imaging", "The imaging core provides microscopy."))
            .expect("core facility");
        assert_eq!(
            (facility.category, facility.confidence),
            (Category::Infrastructure, 82)
        );

        let titled = codes
            .contextual("P01", &text("Core B: Animal Models", "Provides mice."))
            .expect("titled core");
        assert_eq!(titled.category, Category::Infrastructure);

        assert!(codes
            .contextual("P01", &text("Project 2: Tau spreading", "We study tau."))
            .is_none());
    }

    #[test]
    fn special_code_table_applies_in_order() {
        let rules = rules();
        let codes = CodeRules::new(&rules);
        let plain = text("Program", "Program description");

        assert_eq!(
            codes.contextual("U45", &plain).map(|d| d.category),
            Some(Category::Training)
        );
        assert_eq!(
            codes.contextual("U2F", &plain).map(|d| d.category),
            Some(Category::Other)
        );
        assert_eq!(
            codes.contextual("UC7", &plain).map(|d| (d.category, d.confidence)),
            Some((Category::Infrastructure, 85))
        );
        assert_eq!(
            codes
                .contextual("UG1", &text("Site", "A clinical trials network site"))
                .map(|d| d.category),
            Some(Category::Infrastructure)
        );
        assert!(codes.contextual("UG1", &plain).is_none());
        assert_eq!(
            codes
                .contextual("U01", &text("Data Coordinating Center for a cohort", "abstract"))
                .map(|d| d.confidence),
            Some(80)
        );
    }

    #[test]
    fn classify_prefers_deterministic_sets() {
        let rules = rules();
        let codes = CodeRules::new(&rules);
        let decision = codes
            .classify("K99", &text("Core A: Administration", "admin core"))
            .expect("code decision");
        assert_eq!(decision.category, Category::Training);
    }
}
