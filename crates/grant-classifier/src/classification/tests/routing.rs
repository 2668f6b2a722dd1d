use super::common::*;
use crate::classification::EvidenceLevel;
use crate::grants::Patent;
use crate::taxonomy::Category;

#[test]
fn code_results_are_always_accepted() {
    let engine = engine();
    let result = engine.classify_grant(&grant("UL1", "Clinical and Translational Science Award", ""));
    assert!(!result.needs_review);
}

#[test]
fn close_content_calls_are_flagged() {
    let engine = engine();
    let result = engine.classify_grant(&tool_grant());
    assert!(
        result.needs_review,
        "margin below the auto-accept threshold should be reviewed"
    );
}

#[test]
fn evidence_is_attached_only_when_related_entities_exist() {
    let engine = engine();
    assert!(engine.classify_grant(&tool_grant()).biotools_evidence.is_none());

    let mut record = tool_grant();
    record.patents.push(Patent {
        patent_id: Some("US1".to_string()),
        title: "Screening apparatus".to_string(),
    });
    let result = engine.classify_grant(&record);
    assert!(result.biotools_evidence.is_some());
}

#[test]
fn strong_tool_evidence_flags_a_disagreeing_winner() {
    let engine = engine();
    let mut record = behavioral_grant().with_org("ACME INC");
    record.funding_mechanism = Some("SBIR-STTR RPGs".to_string());
    record.patents = (0..2)
        .map(|index| Patent {
            patent_id: Some(format!("US{index}")),
            title: "Wearable sensor system".to_string(),
        })
        .collect();

    let result = engine.classify_grant(&record);

    assert_eq!(result.category, Category::Other);
    let evidence = result.biotools_evidence.as_ref().expect("evidence attached");
    assert_eq!(evidence.level, EvidenceLevel::High);
    assert!(result.needs_review);
    assert!(result.reasoning.contains("disagrees"));
}

#[test]
fn free_function_evidence_matches_engine() {
    let engine = engine();
    let record = small_business_drug_grant();
    let org_type = engine.classify_organization(record.org_name.as_deref(), &record.activity_code);

    assert_eq!(
        crate::classification::assess_biotools_evidence(&record, org_type),
        engine.assess_biotools_evidence(&record, org_type)
    );
}
