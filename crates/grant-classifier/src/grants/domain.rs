use serde::{Deserialize, Serialize};

/// Grant metadata as exported by RePORTER, plus any cross-referenced entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub application_id: String,
    /// Core project number shared by every fiscal year of a project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    #[serde(default)]
    pub activity_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub phr: Option<String>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub funding_mechanism: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<Publication>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patents: Vec<Patent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clinical_studies: Vec<ClinicalStudy>,
}

impl GrantRecord {
    pub fn new(application_id: impl Into<String>, activity_code: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            activity_code: activity_code.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    pub fn with_phr(mut self, phr: impl Into<String>) -> Self {
        self.phr = Some(phr.into());
        self
    }

    pub fn with_project_number(mut self, project_number: impl Into<String>) -> Self {
        self.project_number = Some(project_number.into());
        self
    }

    pub fn with_org(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = Some(org_name.into());
        self
    }

    /// Normalized activity code (trimmed, upper-case).
    pub fn code(&self) -> String {
        self.activity_code.trim().to_ascii_uppercase()
    }

    /// Abstract length in characters after trimming.
    pub fn abstract_len(&self) -> usize {
        self.abstract_text
            .as_deref()
            .map(|text| text.trim().chars().count())
            .unwrap_or(0)
    }

    pub fn has_related_entities(&self) -> bool {
        !self.publications.is_empty()
            || !self.patents.is_empty()
            || !self.clinical_studies.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub pmid: Option<String>,
    #[serde(default)]
    pub journal_abbr: String,
    #[serde(default)]
    pub journal_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patent {
    #[serde(default)]
    pub patent_id: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalStudy {
    #[serde(default)]
    pub nct_id: Option<String>,
    #[serde(default)]
    pub title: String,
}
