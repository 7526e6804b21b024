//! Outline normalization.
//!
//! Turns the loosely structured JSON a language model returns into
//! [`SlideRecord`]s. Every entry produces exactly one record, whatever shape
//! its fields have; the worst case is a record with no bullets.

use crate::clean::clean_text;
use crate::types::{SlideRecord, MAX_BULLETS, UNTITLED};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Separators used to break a single content string into bullets.
static BULLET_SPLIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n|•|-").unwrap());

/// Normalize a parsed model response.
///
/// Arrays are normalized entry by entry; any other value yields no slides.
pub fn normalize_value(value: &Value) -> Vec<SlideRecord> {
    match value {
        Value::Array(entries) => normalize_outline(entries),
        _ => Vec::new(),
    }
}

/// Normalize a list of raw slide objects into slide records.
///
/// The output has the same length and order as the input.
pub fn normalize_outline(entries: &[Value]) -> Vec<SlideRecord> {
    entries.iter().map(normalize_entry).collect()
}

/// Normalize a single raw slide entry.
fn normalize_entry(entry: &Value) -> SlideRecord {
    // Non-object entries are treated as untitled content.
    let (title, content) = match entry {
        Value::Object(map) => (map.get("title"), map.get("content")),
        other => (None, Some(other)),
    };

    let title = title
        .map(value_to_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let bullets = content_fragments(content)
        .iter()
        .map(|fragment| clean_text(fragment).trim().to_string())
        .filter(|bullet| !bullet.is_empty())
        .take(MAX_BULLETS)
        .collect();

    SlideRecord::new(title, bullets)
}

/// Resolve the content field into raw bullet fragments.
fn content_fragments(content: Option<&Value>) -> Vec<String> {
    match content {
        None => Vec::new(),
        Some(Value::String(text)) => split_content(text),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| value_to_text(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::Null) => Vec::new(),
        Some(other) => vec![value_to_text(other)],
    }
}

/// Split a content string on newlines, bullet markers, and hyphens.
fn split_content(text: &str) -> Vec<String> {
    BULLET_SPLIT_REGEX
        .split(text)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render any JSON value as display text.
///
/// Strings are used verbatim, null becomes empty, everything else uses its
/// JSON text.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
