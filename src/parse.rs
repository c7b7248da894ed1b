//! Decoding of JSON answers from model text output.
//!
//! Models often wrap their JSON in a fenced code block. The fence is removed
//! by exact literal prefix/suffix matching before decoding.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Opening fence with a language tag.
pub const RESPONSE_PREFIX: &str = "```json";

/// Bare fence delimiter.
pub const FENCE: &str = "```";

/// Remove a surrounding fenced code block, if any.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let body = if let Some(rest) = trimmed.strip_prefix(RESPONSE_PREFIX) {
        rest
    } else if let Some(rest) = trimmed.strip_prefix(FENCE) {
        rest
    } else {
        return trimmed;
    };

    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Decode model output as JSON, stripping a fence first.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(strip_fence(text))?)
}

/// Decode model output, returning `fallback` on any failure.
///
/// Failures are logged with `fallback = true` so degraded answers can be
/// told apart from genuine empty results.
pub fn parse_or<T: DeserializeOwned>(flow: &str, text: &str, fallback: T) -> T {
    match parse_json(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                flow,
                fallback = true,
                error = %e,
                "Could not decode model output: {}",
                preview(text, 200)
            );
            fallback
        }
    }
}

/// Decode a JSON array answer item by item.
///
/// Items that do not decode as `T` are dropped with a warning and the rest
/// are kept. A non-array answer yields an empty list.
pub fn parse_list<T: DeserializeOwned>(flow: &str, text: &str) -> Vec<T> {
    let items: Vec<Value> = parse_or(flow, text, Vec::new());
    let total = items.len();

    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(flow, error = %e, "Skipping undecodable item: {}", preview(&item.to_string(), 200));
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!(flow, kept = decoded.len(), total, "Dropped items from model answer");
    }
    decoded
}

/// First `max_chars` characters of `text`, for log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n[{\"link\": \"https://example.com\"}]\n```";
        assert_eq!(strip_fence(text), "[{\"link\": \"https://example.com\"}]");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_fence("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_text_is_untouched() {
        assert_eq!(strip_fence("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_strip_does_not_eat_payload_characters() {
        // Payload ends with characters that also occur in the fence marker.
        let text = "```json\n\"json\"```";
        assert_eq!(strip_fence(text), "\"json\"");

        let value: String = parse_json(text).unwrap();
        assert_eq!(value, "json");
    }

    #[test]
    fn test_fenced_and_raw_decode_identically() {
        let raw = r#"{"reservation": ["https://r.com/book"], "menu": []}"#;
        let fenced = format!("```json\n{}\n```", raw);

        let a: Value = parse_json(raw).unwrap();
        let b: Value = parse_json(&fenced).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, json!({"reservation": ["https://r.com/book"], "menu": []}));
    }

    #[test]
    fn test_parse_or_returns_fallback() {
        let value: Vec<Value> = parse_or("test", "not json", Vec::new());
        assert!(value.is_empty());

        let value: Value = parse_or("test", "```json\n{broken\n```", json!({"x": 1}));
        assert_eq!(value, json!({"x": 1}));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_parse_list_keeps_good_items() {
        let items: Vec<Item> = parse_list("test", r#"[{"id": 1}, {"id": "x"}, {"name": "no id"}, {"id": 4}]"#);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_parse_list_non_array_is_empty() {
        let items: Vec<Item> = parse_list("test", r#"{"id": 1}"#);
        assert!(items.is_empty());
    }

    #[test]
    fn test_preview_is_char_safe() {
        assert_eq!(preview("héllo", 2), "hé...");
        assert_eq!(preview("hi", 10), "hi");
    }
}
