use crate::classification::ClassificationEngine;
use crate::grants::GrantRecord;

pub(super) fn engine() -> ClassificationEngine {
    ClassificationEngine::standard().expect("standard rules compile")
}

pub(super) fn grant(code: &str, title: &str, abstract_text: &str) -> GrantRecord {
    GrantRecord::new("10001", code)
        .with_title(title)
        .with_abstract(abstract_text)
        .with_org("UNIVERSITY OF IOWA")
}

pub(super) fn tool_grant() -> GrantRecord {
    grant(
        "R01",
        "Development of a novel CRISPR screening platform",
        "We will develop a high-throughput screening platform for the research community \
         and distribute protocols and reagents to laboratories studying gene function.",
    )
}

pub(super) fn behavioral_grant() -> GrantRecord {
    grant(
        "R01",
        "Cognitive behavioral therapy for smoking cessation",
        "We will test a mindfulness-based intervention delivered in community clinics \
         to adults who want to quit smoking.",
    )
}

pub(super) fn small_business_drug_grant() -> GrantRecord {
    GrantRecord::new("10002", "R43")
        .with_title("Optimization of an antifibrotic drug candidate")
        .with_abstract(
            "This project covers drug candidate optimization and preclinical development \
             of a small molecule that blocks fibrosis signaling pathways in the lung.",
        )
        .with_org("FIBROGEN LABS")
}
