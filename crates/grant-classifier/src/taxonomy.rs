use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grant category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Training,
    Infrastructure,
    BasicResearch,
    Biotools,
    Therapeutics,
    Diagnostics,
    MedicalDevice,
    DigitalHealth,
    Other,
    Unclassified,
}

impl Category {
    /// Categories scored from grant text, in tie-break priority order.
    pub const CONTENT: [Category; 7] = [
        Category::BasicResearch,
        Category::Therapeutics,
        Category::Biotools,
        Category::Diagnostics,
        Category::MedicalDevice,
        Category::DigitalHealth,
        Category::Other,
    ];

    pub const ALL: [Category; 10] = [
        Category::Training,
        Category::Infrastructure,
        Category::BasicResearch,
        Category::Biotools,
        Category::Therapeutics,
        Category::Diagnostics,
        Category::MedicalDevice,
        Category::DigitalHealth,
        Category::Other,
        Category::Unclassified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Training => "training",
            Category::Infrastructure => "infrastructure",
            Category::BasicResearch => "basic_research",
            Category::Biotools => "biotools",
            Category::Therapeutics => "therapeutics",
            Category::Diagnostics => "diagnostics",
            Category::MedicalDevice => "medical_device",
            Category::DigitalHealth => "digital_health",
            Category::Other => "other",
            Category::Unclassified => "unclassified",
        }
    }

    pub fn is_content(&self) -> bool {
        Self::CONTENT.contains(self)
    }

    /// Lenient conversion for values produced outside the engine. Anything
    /// outside the enumeration becomes `Other`.
    pub fn coerce(raw: &str) -> Self {
        raw.parse().unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Category::ALL
            .into_iter()
            .find(|category| category.label() == normalized)
            .ok_or_else(|| UnknownLabel {
                kind: "category",
                value: raw.to_string(),
            })
    }
}

/// Kind of organization that holds the grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    Company,
    University,
    Hospital,
    ResearchInstitute,
    Other,
}

impl OrgType {
    pub const ALL: [OrgType; 5] = [
        OrgType::Company,
        OrgType::University,
        OrgType::Hospital,
        OrgType::ResearchInstitute,
        OrgType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrgType::Company => "company",
            OrgType::University => "university",
            OrgType::Hospital => "hospital",
            OrgType::ResearchInstitute => "research_institute",
            OrgType::Other => "other",
        }
    }

    pub fn coerce(raw: &str) -> Self {
        raw.parse().unwrap_or(OrgType::Other)
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrgType {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        OrgType::ALL
            .into_iter()
            .find(|org_type| org_type.label() == normalized)
            .ok_or_else(|| UnknownLabel {
                kind: "org type",
                value: raw.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_with_loose_formatting() {
        assert_eq!("Basic Research".parse::<Category>(), Ok(Category::BasicResearch));
        assert_eq!(" medical-device ".parse::<Category>(), Ok(Category::MedicalDevice));
        assert_eq!("research_institute".parse::<OrgType>(), Ok(OrgType::ResearchInstitute));
        assert!("genomics".parse::<Category>().is_err());
    }

    #[test]
    fn coerce_maps_unknown_values_to_other() {
        assert_eq!(Category::coerce("biotools"), Category::Biotools);
        assert_eq!(Category::coerce("vaccines"), Category::Other);
        assert_eq!(OrgType::coerce("government"), OrgType::Other);
    }

    #[test]
    fn serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&Category::DigitalHealth).expect("serialize");
        assert_eq!(json, "\"digital_health\"");
        let parsed: OrgType = serde_json::from_str("\"research_institute\"").expect("deserialize");
        assert_eq!(parsed, OrgType::ResearchInstitute);
    }

    #[test]
    fn content_categories_exclude_code_only_labels() {
        assert!(Category::Biotools.is_content());
        assert!(!Category::Training.is_content());
        assert!(!Category::Unclassified.is_content());
    }
}
