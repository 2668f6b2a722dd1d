use crate::grants::GrantRecord;
use serde::Serialize;

const PHR_LIMIT: usize = 1_000;
const ABSTRACT_LIMIT: usize = 1_500;

const INSTRUCTIONS: &str = r#"Classify each of these NIH grants. Return a JSON array with one object per grant.

Grants to classify:
{grants}

For each grant, return:
{
  "application_id": "the grant's application_id",
  "primary_category": "training|infrastructure|basic_research|biotools|therapeutics|diagnostics|medical_device|digital_health|other",
  "category_confidence": 0-100,
  "org_type": "company|university|hospital|research_institute|other"
}

Category definitions:
- training: fellowships, career development and institutional training programs.
- infrastructure: centers, cores, shared equipment, conferences, coordinating centers.
- basic_research: studies whose output is knowledge about mechanisms or biology.
- biotools: DEVELOPING research tools, assays, platforms, methods, databases. The output is a tool for researchers.
- therapeutics: DEVELOPING drugs, biologics, vaccines or other treatments. Not behavioral interventions.
- diagnostics: DEVELOPING tests for disease detection, screening or prognosis.
- medical_device: DEVELOPING physical devices or implants for patient care.
- digital_health: DEPLOYING software, telehealth or apps in patient care.
- other: behavioral interventions, health services, disparities, epidemiology, policy and non-medical research.

Tool development versus tool application:
- "Developing a CRISPR screening platform" is biotools.
- "Using CRISPR to treat sickle cell disease" is therapeutics.
- "Drug discovery using high-throughput screening" is therapeutics.

Organization types:
- company: commercial entities (Inc., LLC, Corp., Therapeutics, Biosciences).
- university: academic institutions.
- hospital: medical centers, health systems, clinics.
- research_institute: independent research organizations.
- other: government agencies and non-profits.

Return ONLY the JSON array, no other text."#;

/// Grant fields sent to the reviewer, with long text truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub application_id: String,
    pub title: String,
    pub org_name: String,
    pub activity_code: String,
    pub phr: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl ReviewItem {
    pub fn from_record(record: &GrantRecord) -> Self {
        Self {
            application_id: record.application_id.clone(),
            title: record.title.clone(),
            org_name: record.org_name.clone().unwrap_or_default(),
            activity_code: record.code(),
            phr: truncate(record.phr.as_deref().unwrap_or_default(), PHR_LIMIT),
            abstract_text: truncate(
                record.abstract_text.as_deref().unwrap_or_default(),
                ABSTRACT_LIMIT,
            ),
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

pub fn build_prompt(records: &[GrantRecord]) -> Result<String, serde_json::Error> {
    let items: Vec<ReviewItem> = records.iter().map(ReviewItem::from_record).collect();
    let grants = serde_json::to_string_pretty(&items)?;
    Ok(INSTRUCTIONS.replacen("{grants}", &grants, 1))
}
