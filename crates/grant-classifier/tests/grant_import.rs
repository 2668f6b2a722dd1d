//! File-based import feeding the batch runner and the CSV sink.

use std::fs;
use std::sync::Arc;

use grant_classifier::classification::ClassificationEngine;
use grant_classifier::grants::{GrantImporter, RelatedEvidence};
use grant_classifier::pipeline::{BatchRunner, CsvSink};
use grant_classifier::OrgType;

const GRANTS: &str = "\
APPLICATION_ID,ACTIVITY,PROJECT_TITLE,ORG_NAME,PHR,ABSTRACT_TEXT
2001,T32,Training program in cardiovascular research,UNIVERSITY OF IOWA,,
2002,R44,Wearable sensor system for arrhythmia monitoring,ACME CARDIO INC,,\"We will build a wearable sensor system that records cardiac rhythm continuously and alerts clinicians.\"
,R01,Row without an identifier,SOMEWHERE,,
";

const PATENTS: &str = "\
APPLICATION_ID,PATENT_ID,PATENT_TITLE
2002,US1234567,Wearable sensor system for cardiac monitoring
2002,US7654321,Implantable electrode array
";

const PUBLICATIONS: &str = "\
APPLICATION_ID,PMID,JOURNAL_ABBR,JOURNAL_TITLE
2001,3100001,Circulation,Circulation
";

#[test]
fn imports_grants_and_attaches_related_entities() {
    let dir = tempfile::tempdir().expect("tempdir");
    let grants_path = dir.path().join("grants.csv");
    let patents_path = dir.path().join("patents.csv");
    let publications_path = dir.path().join("publications.csv");
    fs::write(&grants_path, GRANTS).expect("write grants");
    fs::write(&patents_path, PATENTS).expect("write patents");
    fs::write(&publications_path, PUBLICATIONS).expect("write publications");

    let mut grants = GrantImporter::from_path(&grants_path).expect("import grants");
    assert_eq!(grants.len(), 2);
    assert_eq!(grants[1].activity_code, "R44");
    assert!(grants[0].abstract_text.is_none());

    let mut related = RelatedEvidence::new();
    assert_eq!(related.load_patents_path(&patents_path).expect("patents"), 2);
    assert_eq!(
        related
            .load_publications_path(&publications_path)
            .expect("publications"),
        1
    );
    assert_eq!(related.attach(&mut grants), 2);
    assert_eq!(grants[1].patents.len(), 2);
    assert_eq!(grants[0].publications.len(), 1);

    let engine = ClassificationEngine::standard().expect("standard rules compile");
    let device = engine.classify_grant(&grants[1]);
    assert_eq!(device.org_type, OrgType::Company);
    let evidence = device.biotools_evidence.expect("evidence attached");
    assert!(evidence.score <= 100);
    assert!(!evidence.signals.is_empty());
}

#[tokio::test]
async fn batch_output_lands_in_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let grants_path = dir.path().join("grants.csv");
    let output_path = dir.path().join("classified.csv");
    fs::write(&grants_path, GRANTS).expect("write grants");

    let grants = GrantImporter::from_path(&grants_path).expect("import grants");
    let engine = Arc::new(ClassificationEngine::standard().expect("standard rules compile"));
    let sink = Arc::new(CsvSink::create(&output_path).expect("create output"));
    let report = BatchRunner::new(engine).with_sink(sink).run(&grants).await;

    assert_eq!(report.summary.stored, 2);

    let written = fs::read_to_string(&output_path).expect("read output");
    let mut reader = csv::Reader::from_reader(written.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "application_id",
            "primary_category",
            "category_confidence",
            "secondary_category",
            "org_type",
            "review_flag",
            "reasoning",
        ]
    );
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 2);

    let training = rows
        .iter()
        .find(|row| &row[0] == "2001")
        .expect("training row");
    assert_eq!(&training[1], "training");
    assert_eq!(&training[2], "95");
    assert_eq!(&training[4], "university");
    assert_eq!(&training[5], "false");
}

const REPORTER_GRANTS: &str = "\
APPLICATION_ID,CORE_PROJECT_NUM,ACTIVITY,PROJECT_TITLE,ORG_NAME,ABSTRACT_TEXT
3001,R44GM100001,R44,Benchtop sequencer,SEQWORKS INC,We will build a benchtop sequencer.
3002,R44GM100001,R44,Benchtop sequencer,SEQWORKS INC,We will build a benchtop sequencer.
3003,R01CA200002,R01,Tumor immunology,UNIVERSITY OF IOWA,
";

const REPORTER_PATENTS: &str = "\
PATENT_ID,PATENT_TITLE,PROJECT_ID,PATENT_ORG_NAME
US123,Sequencing apparatus,R44GM100001,SEQWORKS INC
";

const REPORTER_PUBLICATIONS: &str = "\
PMID,PUB_TITLE,JOURNAL_TITLE_ABBR,JOURNAL_TITLE,PUB_YEAR
4001,A benchtop sequencer,Nat Methods,Nature methods,2024
4002,Checkpoint blockade in mice,Cancer Res,Cancer research,2023
";

const REPORTER_PUBLICATION_LINKS: &str = "\
PMID,PROJECT_NUMBER
4001,R44GM100001
4002,R01CA200002
";

const REPORTER_STUDIES: &str = "\
Core Project Number,ClinicalTrials.gov ID,Study,Study Status
R01CA200002,NCT0001,Checkpoint inhibitor therapy in melanoma,Recruiting
R01CA200002,NCT0001,Checkpoint inhibitor therapy in melanoma,Recruiting
";

#[test]
fn reporter_exports_attach_by_core_project_number() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = |name: &str, contents: &str| {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write export");
        path
    };
    let grants_path = path("projects.csv", REPORTER_GRANTS);
    let patents_path = path("patents.csv", REPORTER_PATENTS);
    let publications_path = path("pub.csv", REPORTER_PUBLICATIONS);
    let links_path = path("publnk.csv", REPORTER_PUBLICATION_LINKS);
    let studies_path = path("clinical.csv", REPORTER_STUDIES);

    let mut grants = GrantImporter::from_path(&grants_path).expect("import grants");
    assert_eq!(grants[0].project_number.as_deref(), Some("R44GM100001"));

    let mut related = RelatedEvidence::new();
    assert_eq!(related.load_patents_path(&patents_path).expect("patents"), 1);
    assert_eq!(
        related
            .load_publications_path(&publications_path)
            .expect("publications"),
        2
    );
    assert_eq!(
        related
            .load_publication_links_path(&links_path)
            .expect("publication links"),
        2
    );
    assert_eq!(
        related
            .load_clinical_studies_path(&studies_path)
            .expect("clinical studies"),
        1
    );

    assert_eq!(related.attach(&mut grants), 3);
    for year in &grants[..2] {
        assert_eq!(year.patents.len(), 1);
        assert_eq!(year.publications.len(), 1);
        assert_eq!(year.publications[0].journal_abbr, "Nat Methods");
        assert!(year.clinical_studies.is_empty());
    }
    assert_eq!(grants[2].clinical_studies.len(), 1);
    assert_eq!(grants[2].publications[0].pmid.as_deref(), Some("4002"));
    assert!(grants[2].patents.is_empty());
}
