//! Properties that hold for every grant the engine sees, whatever the text.

use std::sync::OnceLock;

use grant_classifier::classification::{classify_organization, ClassificationEngine};
use grant_classifier::{Category, GrantRecord, OrgType};
use proptest::prelude::*;

fn engine() -> &'static ClassificationEngine {
    static ENGINE: OnceLock<ClassificationEngine> = OnceLock::new();
    ENGINE.get_or_init(|| ClassificationEngine::standard().expect("standard rules compile"))
}

const VOCABULARY: &[&str] = &[
    "novel", "platform", "assay", "drug", "clinical", "trial", "patients", "mechanism",
    "mouse", "device", "implant", "mobile", "app", "biomarker", "diagnostic", "screening",
    "therapy", "behavioral", "intervention", "software", "database", "resource", "imaging",
    "phase ii", "placebo", "randomized", "signaling", "pathway", "policy", "epidemiology",
    "sensor", "wearable", "vaccine", "antibody", "core", "training", "mentoring", "the",
    "of", "and", "we", "will", "develop", "a", "tool", "method",
];

const CODES: &[&str] = &[
    "R01", "R21", "R43", "R44", "SB1", "U01", "U54", "P01", "P30", "T32", "K99", "UL1",
    "R24", "UG1", "U2F", "", "r01",
];

fn arb_text(max_words: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 0..max_words)
        .prop_map(|words| words.join(" "))
}

fn arb_grant() -> impl Strategy<Value = GrantRecord> {
    (
        prop::sample::select(CODES),
        arb_text(12),
        arb_text(80),
        prop::option::of(prop::sample::select(&[
            "UNIVERSITY OF IOWA",
            "ACME BIOSCIENCES INC",
            "MAYO CLINIC ROCHESTER",
            "BROAD INSTITUTE, INC.",
            "",
        ][..])),
    )
        .prop_map(|(code, title, abstract_text, org)| {
            let mut grant = GrantRecord::new("4242", code)
                .with_title(title)
                .with_abstract(abstract_text);
            grant.org_name = org.map(str::to_string);
            grant
        })
}

proptest! {
    #[test]
    fn every_grant_gets_a_bounded_result(grant in arb_grant()) {
        let result = engine().classify_grant(&grant);
        prop_assert_eq!(&result.application_id, &grant.application_id);
        prop_assert!(result.confidence <= 100);
        prop_assert!(!result.reasoning.is_empty());
        if result.category == Category::Unclassified {
            prop_assert!(result.needs_review);
        }
    }

    #[test]
    fn classification_is_idempotent(grant in arb_grant()) {
        let first = engine().classify_grant(&grant);
        let second = engine().classify_grant(&grant);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn small_business_grants_never_score_basic_research(
        code in prop::sample::select(&["R41", "R42", "R43", "R44", "SB1", "U44"][..]),
        abstract_text in arb_text(80),
    ) {
        let grant = GrantRecord::new("9", code)
            .with_title("mechanism of signaling pathway")
            .with_abstract(abstract_text);
        let result = engine().classify_grant(&grant);
        prop_assert_eq!(result.score_for(Category::BasicResearch).unwrap_or(0), 0);
        prop_assert_ne!(result.category, Category::BasicResearch);
    }

    #[test]
    fn short_abstracts_are_unclassified(
        code in prop::sample::select(&["R01", "R21", "R43", "U01", "P01"][..]),
        abstract_text in "[a-z ]{0,49}",
    ) {
        let grant = GrantRecord::new("7", code)
            .with_title("novel drug platform for diagnostic imaging")
            .with_abstract(abstract_text);
        let result = engine().classify_grant(&grant);
        prop_assert_eq!(result.category, Category::Unclassified);
        prop_assert_eq!(result.confidence, 0);
        prop_assert!(result.needs_review);
    }

    #[test]
    fn deterministic_codes_ignore_text(
        code in prop::sample::select(&["T32", "F31", "K99", "P30", "UL1", "S10"][..]),
        abstract_text in arb_text(40),
    ) {
        let grant = GrantRecord::new("3", code).with_abstract(abstract_text);
        let result = engine().classify_grant(&grant);
        prop_assert!(matches!(result.category, Category::Training | Category::Infrastructure));
        prop_assert_eq!(result.confidence, 95);
        prop_assert!(!result.needs_review);
    }

    #[test]
    fn accepted_content_results_clear_the_review_bar(grant in arb_grant()) {
        let result = engine().classify_grant(&grant);
        if !result.needs_review && !result.scores.is_empty() {
            prop_assert!(result.confidence >= 90);
            let top = result.score_for(result.category).unwrap_or(0);
            prop_assert!(top >= 60);
        }
    }

    #[test]
    fn organization_classifier_is_total(name in prop::option::of(".{0,60}"), code in "[A-Z0-9]{0,3}") {
        let org_type = classify_organization(name.as_deref(), &code);
        prop_assert!(OrgType::ALL.contains(&org_type));
    }

    #[test]
    fn small_business_codes_always_mean_company(
        code in prop::sample::select(&["R41", "R42", "R43", "R44", "SB1", "U44"][..]),
        name in prop::option::of(prop::sample::select(&[
            "UNIVERSITY OF MICHIGAN",
            "MASSACHUSETTS GENERAL HOSPITAL",
            "SCRIPPS RESEARCH INSTITUTE",
            "",
        ][..])),
    ) {
        prop_assert_eq!(classify_organization(name, code), OrgType::Company);
    }
}
