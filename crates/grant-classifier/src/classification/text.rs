use crate::grants::GrantRecord;

const OPENING_CHARS: usize = 500;

/// Lowercased, whitespace-collapsed views of a grant's text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantText {
    pub title: String,
    /// Abstract followed by the public health relevance statement.
    pub body: String,
    /// Title, abstract and PHR.
    pub full: String,
    /// First characters of the abstract, where authors state what they do.
    pub opening: String,
}

impl GrantText {
    pub fn from_record(record: &GrantRecord) -> Self {
        let title = normalize(&record.title);
        let abstract_text = normalize(record.abstract_text.as_deref().unwrap_or_default());
        let phr = normalize(record.phr.as_deref().unwrap_or_default());

        let body = join(&[&abstract_text, &phr]);
        let full = join(&[&title, &body]);
        let opening = abstract_text.chars().take(OPENING_CHARS).collect();

        Self {
            title,
            body,
            full,
            opening,
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| haystack.contains(phrase.as_str()))
}

pub(crate) fn first_match<'a>(haystack: &str, phrases: &'a [String]) -> Option<&'a str> {
    phrases
        .iter()
        .find(|phrase| haystack.contains(phrase.as_str()))
        .map(String::as_str)
}
