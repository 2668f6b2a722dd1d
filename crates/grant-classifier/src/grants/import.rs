use super::domain::{ClinicalStudy, GrantRecord, Patent, Publication};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read grant export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid grant CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct GrantRow {
    #[serde(alias = "APPLICATION_ID", alias = "appl_id")]
    application_id: String,
    #[serde(
        default,
        alias = "CORE_PROJECT_NUM",
        alias = "core_project_num",
        deserialize_with = "empty_string_as_none"
    )]
    project_number: Option<String>,
    #[serde(default, alias = "ACTIVITY", alias = "activity")]
    activity_code: String,
    #[serde(default, alias = "PROJECT_TITLE", alias = "project_title")]
    title: String,
    #[serde(
        default,
        alias = "ABSTRACT_TEXT",
        alias = "abstract_text",
        deserialize_with = "empty_string_as_none"
    )]
    r#abstract: Option<String>,
    #[serde(default, alias = "PHR", deserialize_with = "empty_string_as_none")]
    phr: Option<String>,
    #[serde(default, alias = "ORG_NAME", deserialize_with = "empty_string_as_none")]
    org_name: Option<String>,
    #[serde(
        default,
        alias = "FUNDING_MECHANISM",
        deserialize_with = "empty_string_as_none"
    )]
    funding_mechanism: Option<String>,
}

impl From<GrantRow> for GrantRecord {
    fn from(row: GrantRow) -> Self {
        GrantRecord {
            application_id: row.application_id,
            project_number: row.project_number,
            activity_code: row.activity_code,
            title: row.title,
            abstract_text: row.r#abstract,
            phr: row.phr,
            org_name: row.org_name,
            funding_mechanism: row.funding_mechanism,
            ..GrantRecord::default()
        }
    }
}

/// Related rows attach to a grant by application id, or failing that by
/// core project number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RelatedKey {
    Application(String),
    Project(String),
}

impl RelatedKey {
    fn from_columns(
        application_id: Option<String>,
        project_number: Option<String>,
    ) -> Option<Self> {
        application_id
            .map(RelatedKey::Application)
            .or_else(|| project_number.map(|number| RelatedKey::project(&number)))
    }

    fn project(number: &str) -> Self {
        RelatedKey::Project(number.trim().to_ascii_uppercase())
    }

    fn for_grant(grant: &GrantRecord) -> Vec<Self> {
        let mut keys = vec![RelatedKey::Application(grant.application_id.clone())];
        if let Some(number) = &grant.project_number {
            keys.push(RelatedKey::project(number));
        }
        keys
    }
}

#[derive(Debug, Deserialize)]
struct PublicationRow {
    #[serde(
        default,
        alias = "APPLICATION_ID",
        alias = "appl_id",
        deserialize_with = "empty_string_as_none"
    )]
    application_id: Option<String>,
    #[serde(
        default,
        alias = "PROJECT_NUMBER",
        alias = "CORE_PROJECT_NUM",
        deserialize_with = "empty_string_as_none"
    )]
    project_number: Option<String>,
    #[serde(default, alias = "PMID", deserialize_with = "empty_string_as_none")]
    pmid: Option<String>,
    #[serde(
        default,
        alias = "JOURNAL_TITLE_ABBR",
        alias = "JOURNAL_ABBR",
        alias = "journal_abbreviation"
    )]
    journal_abbr: String,
    #[serde(default, alias = "JOURNAL_TITLE", alias = "journal")]
    journal_title: String,
}

/// Row of the PMID to project link file.
#[derive(Debug, Deserialize)]
struct PublicationLinkRow {
    #[serde(default, alias = "PMID", deserialize_with = "empty_string_as_none")]
    pmid: Option<String>,
    #[serde(
        default,
        alias = "PROJECT_NUMBER",
        alias = "CORE_PROJECT_NUM",
        deserialize_with = "empty_string_as_none"
    )]
    project_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PatentRow {
    #[serde(
        default,
        alias = "APPLICATION_ID",
        alias = "appl_id",
        deserialize_with = "empty_string_as_none"
    )]
    application_id: Option<String>,
    #[serde(
        default,
        alias = "PROJECT_ID",
        alias = "PROJECT_NUMBER",
        alias = "CORE_PROJECT_NUM",
        deserialize_with = "empty_string_as_none"
    )]
    project_number: Option<String>,
    #[serde(default, alias = "PATENT_ID", deserialize_with = "empty_string_as_none")]
    patent_id: Option<String>,
    #[serde(default, alias = "PATENT_TITLE", alias = "patent_title")]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ClinicalStudyRow {
    #[serde(
        default,
        alias = "APPLICATION_ID",
        alias = "appl_id",
        deserialize_with = "empty_string_as_none"
    )]
    application_id: Option<String>,
    #[serde(
        default,
        alias = "Core Project Number",
        alias = "PROJECT_NUMBER",
        alias = "CORE_PROJECT_NUM",
        deserialize_with = "empty_string_as_none"
    )]
    project_number: Option<String>,
    #[serde(
        default,
        alias = "ClinicalTrials.gov ID",
        alias = "NCT_ID",
        deserialize_with = "empty_string_as_none"
    )]
    nct_id: Option<String>,
    #[serde(default, alias = "Study", alias = "STUDY_TITLE", alias = "study_title")]
    title: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads grant rows from a CSV export.
pub struct GrantImporter;

impl GrantImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<GrantRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<GrantRecord>, ImportError> {
        let mut csv_reader = csv_reader(reader);
        let mut grants = Vec::new();

        for (index, record) in csv_reader.deserialize::<GrantRow>().enumerate() {
            let row = record?;
            if row.application_id.trim().is_empty() {
                warn!(row = index + 1, "skipping grant row without application id");
                continue;
            }
            grants.push(GrantRecord::from(row));
        }

        debug!(count = grants.len(), "grant export parsed");
        Ok(grants)
    }
}

/// Publications, patents and clinical studies keyed by application id or
/// core project number.
#[derive(Debug, Default)]
pub struct RelatedEvidence {
    publications: HashMap<RelatedKey, Vec<Publication>>,
    /// Publications without a grant column, joined through the link file.
    catalog: HashMap<String, Publication>,
    links: Vec<(RelatedKey, String)>,
    patents: HashMap<RelatedKey, Vec<Patent>>,
    clinical_studies: HashMap<RelatedKey, Vec<ClinicalStudy>>,
}

impl RelatedEvidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows carrying a grant column attach directly; the rest are kept by
    /// PMID for [`RelatedEvidence::load_publication_links`].
    pub fn load_publications<R: Read>(&mut self, reader: R) -> Result<usize, ImportError> {
        let mut count = 0;
        for (index, record) in csv_reader(reader)
            .deserialize::<PublicationRow>()
            .enumerate()
        {
            let row = record?;
            let publication = Publication {
                pmid: row.pmid.clone(),
                journal_abbr: row.journal_abbr,
                journal_title: row.journal_title,
            };
            match (RelatedKey::from_columns(row.application_id, row.project_number), row.pmid) {
                (Some(key), _) => self.publications.entry(key).or_default().push(publication),
                (None, Some(pmid)) => {
                    if self.catalog.insert(pmid, publication).is_some() {
                        continue;
                    }
                }
                (None, None) => {
                    warn!(row = index + 1, "skipping publication without grant or PMID");
                    continue;
                }
            }
            count += 1;
        }
        Ok(count)
    }

    /// Reads `PMID,PROJECT_NUMBER` pairs linking publications to projects.
    pub fn load_publication_links<R: Read>(&mut self, reader: R) -> Result<usize, ImportError> {
        let mut count = 0;
        for record in csv_reader(reader).deserialize::<PublicationLinkRow>() {
            let row = record?;
            if let (Some(pmid), Some(number)) = (row.pmid, row.project_number) {
                self.links.push((RelatedKey::project(&number), pmid));
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn load_patents<R: Read>(&mut self, reader: R) -> Result<usize, ImportError> {
        let mut count = 0;
        for (index, record) in csv_reader(reader).deserialize::<PatentRow>().enumerate() {
            let row = record?;
            let Some(key) = RelatedKey::from_columns(row.application_id, row.project_number) else {
                warn!(row = index + 1, "skipping patent without grant or project");
                continue;
            };
            self.patents.entry(key).or_default().push(Patent {
                patent_id: row.patent_id,
                title: row.title,
            });
            count += 1;
        }
        Ok(count)
    }

    pub fn load_clinical_studies<R: Read>(&mut self, reader: R) -> Result<usize, ImportError> {
        let mut count = 0;
        for (index, record) in csv_reader(reader)
            .deserialize::<ClinicalStudyRow>()
            .enumerate()
        {
            let row = record?;
            let Some(key) = RelatedKey::from_columns(row.application_id, row.project_number) else {
                warn!(row = index + 1, "skipping clinical study without grant or project");
                continue;
            };
            let studies = self.clinical_studies.entry(key).or_default();
            // RePORTER repeats a study once per linked project year.
            if row.nct_id.is_some() && studies.iter().any(|study| study.nct_id == row.nct_id) {
                continue;
            }
            studies.push(ClinicalStudy {
                nct_id: row.nct_id,
                title: row.title,
            });
            count += 1;
        }
        Ok(count)
    }

    pub fn load_publications_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<usize, ImportError> {
        self.load_publications(std::fs::File::open(path)?)
    }

    pub fn load_publication_links_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<usize, ImportError> {
        self.load_publication_links(std::fs::File::open(path)?)
    }

    pub fn load_patents_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ImportError> {
        self.load_patents(std::fs::File::open(path)?)
    }

    pub fn load_clinical_studies_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<usize, ImportError> {
        self.load_clinical_studies(std::fs::File::open(path)?)
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
            && self.links.is_empty()
            && self.patents.is_empty()
            && self.clinical_studies.is_empty()
    }

    fn linked_publications(&self) -> HashMap<&RelatedKey, Vec<&Publication>> {
        let mut linked: HashMap<&RelatedKey, Vec<&Publication>> = HashMap::new();
        let mut unresolved = 0usize;
        for (key, pmid) in &self.links {
            match self.catalog.get(pmid) {
                Some(publication) => linked.entry(key).or_default().push(publication),
                None => unresolved += 1,
            }
        }
        if unresolved > 0 {
            debug!(unresolved, "publication links without a matching publication row");
        }
        linked
    }

    /// Copies matching entities onto their grants, so repeated application
    /// ids and fiscal years of one project all receive them. Returns how many
    /// grants received at least one entity.
    pub fn attach(&self, grants: &mut [GrantRecord]) -> usize {
        let linked = self.linked_publications();
        let mut enriched = 0;
        for grant in grants.iter_mut() {
            for key in RelatedKey::for_grant(grant) {
                if let Some(publications) = self.publications.get(&key) {
                    grant.publications.extend(publications.iter().cloned());
                }
                if let Some(publications) = linked.get(&key) {
                    grant
                        .publications
                        .extend(publications.iter().map(|publication| (*publication).clone()));
                }
                if let Some(patents) = self.patents.get(&key) {
                    grant.patents.extend(patents.iter().cloned());
                }
                if let Some(studies) = self.clinical_studies.get(&key) {
                    grant.clinical_studies.extend(studies.iter().cloned());
                }
            }
            if grant.has_related_entities() {
                enriched += 1;
            }
        }
        enriched
    }
}
