use super::config::{OrgIndicators, RuleSet};
use super::text::contains_any;
use crate::taxonomy::OrgType;
use std::sync::OnceLock;

/// Normalizes an organization name for indicator matching: zero-width
/// characters removed, `.`/`,` turned into spaces, whitespace collapsed,
/// lowercased and padded with one space on each side so indicators such as
/// `" inc "` only match whole tokens.
pub fn normalize_org_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}'))
        .map(|ch| if matches!(ch, '.' | ',') { ' ' } else { ch })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} ", collapsed.to_lowercase())
}

pub(crate) fn classify_with(
    indicators: &OrgIndicators,
    small_business_codes: &[String],
    org_name: Option<&str>,
    activity_code: &str,
) -> OrgType {
    let code = activity_code.trim().to_ascii_uppercase();
    if small_business_codes.iter().any(|entry| *entry == code) {
        return OrgType::Company;
    }

    let name = match org_name.map(normalize_org_name) {
        Some(name) if !name.trim().is_empty() => name,
        _ => return OrgType::Other,
    };

    if contains_any(&name, &indicators.company) {
        return OrgType::Company;
    }
    if contains_any(&name, &indicators.research_institutes) {
        return OrgType::ResearchInstitute;
    }

    match (
        earliest(&name, &indicators.university),
        earliest(&name, &indicators.hospital),
    ) {
        (Some(university), Some(hospital)) if hospital < university => OrgType::Hospital,
        (Some(_), _) => OrgType::University,
        (None, Some(_)) => OrgType::Hospital,
        (None, None) => OrgType::Other,
    }
}

fn earliest(name: &str, indicators: &[String]) -> Option<usize> {
    indicators
        .iter()
        .filter_map(|indicator| name.find(indicator.as_str()))
        .min()
}

fn standard_tables() -> &'static (OrgIndicators, Vec<String>) {
    static TABLES: OnceLock<(OrgIndicators, Vec<String>)> = OnceLock::new();
    TABLES.get_or_init(|| {
        let rules = RuleSet::standard();
        (rules.organizations, rules.codes.small_business)
    })
}

/// Organization type from the grantee name and activity code using the
/// built-in indicator tables. Total: unknown or empty names yield `Other`.
pub fn classify_organization(org_name: Option<&str>, activity_code: &str) -> OrgType {
    let (indicators, small_business) = standard_tables();
    classify_with(indicators, small_business, org_name, activity_code)
}
