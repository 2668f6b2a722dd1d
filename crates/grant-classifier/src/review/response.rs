use super::{ReviewError, ReviewVerdict};
use crate::taxonomy::{Category, OrgType};
use serde_json::Value;

const DEFAULT_CONFIDENCE: u8 = 50;

/// Parses a reviewer reply into verdicts. Markdown fences are stripped,
/// unknown labels become `other`, and missing or non-numeric confidence
/// falls back to 50. Objects without an application id are dropped.
pub fn parse_verdicts(raw: &str) -> Result<Vec<ReviewVerdict>, ReviewError> {
    let body = strip_fences(raw);
    let value: Value = serde_json::from_str(body)
        .or_else(|_| match (body.find('['), body.rfind(']')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end]),
            _ => serde_json::from_str(body),
        })
        .map_err(|err| ReviewError::Malformed(err.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ReviewError::Malformed("expected a JSON array".to_string()));
    };

    Ok(items.iter().filter_map(verdict_from).collect())
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn verdict_from(item: &Value) -> Option<ReviewVerdict> {
    let application_id = match item.get("application_id")? {
        Value::String(id) if !id.trim().is_empty() => id.trim().to_string(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };

    let category = item
        .get("primary_category")
        .or_else(|| item.get("category"))
        .and_then(Value::as_str)
        .map(Category::coerce)
        .unwrap_or(Category::Other);

    let confidence = item
        .get("category_confidence")
        .or_else(|| item.get("confidence"))
        .and_then(confidence_from)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let org_type = item
        .get("org_type")
        .and_then(Value::as_str)
        .map(OrgType::coerce)
        .unwrap_or(OrgType::Other);

    Some(ReviewVerdict {
        application_id,
        category,
        confidence,
        org_type,
    })
}

fn confidence_from(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(number.round().clamp(0.0, 100.0) as u8)
}
