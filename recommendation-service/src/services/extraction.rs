//! Recovery of structured recommendations from free-form model text.
//!
//! Gemini regularly wraps its JSON answer in prose or markdown fences.
//! Extraction walks a fixed sequence of strategies, first success wins;
//! normalization folds the accepted payload shapes into the canonical
//! two-category lists.

use crate::models::{Book, RecommendationLists};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// How much raw model text to keep in error messages.
const RAW_PREVIEW_LEN: usize = 1000;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to extract JSON from model text; raw: {preview}")]
    NoJson { preview: String },

    #[error("model JSON has an unsupported shape: {0}")]
    UnsupportedShape(serde_json::Error),
}

/// Accepted shapes of a model answer, tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParsedRecommendations {
    /// `{"results": {"fiction": [...], "nonfiction": [...]}}`
    Wrapped { results: RecommendationLists },
    /// `{"fiction": [...], "nonfiction": [...]}`; both lists default to
    /// empty, so any other object collapses to two empty lists.
    Flat(RecommendationLists),
    /// A bare array is taken entirely as the fiction list.
    FictionOnly(Vec<Book>),
}

/// Pull a JSON value out of arbitrary model text.
///
/// Strategies, in order:
/// 1. content of the first ```` ```json ```` fence
/// 2. content of the first generic ```` ``` ```` fence
/// 3. the trimmed whole text
/// then a strict parse of the candidate, then the greedy brace block
/// (first `{` to last `}`, spanning newlines) within it.
pub fn extract_json_from_text(text: &str) -> Result<Value, ExtractionError> {
    let candidate = fenced_candidate(text);

    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&candidate[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(ExtractionError::NoJson {
        preview: text.chars().take(RAW_PREVIEW_LEN).collect(),
    })
}

/// Strip the first markdown fence, preferring ```` ```json ````.
/// An unclosed fence yields everything after the opening marker.
fn fenced_candidate(text: &str) -> &str {
    for marker in ["```json", "```"] {
        if let Some((_, rest)) = text.split_once(marker) {
            return rest
                .split_once("```")
                .map(|(inner, _)| inner)
                .unwrap_or(rest)
                .trim();
        }
    }
    text.trim()
}

/// Map a parsed payload onto the canonical lists.
pub fn normalize(value: Value) -> Result<RecommendationLists, ExtractionError> {
    let parsed: ParsedRecommendations =
        serde_json::from_value(value).map_err(ExtractionError::UnsupportedShape)?;

    Ok(match parsed {
        ParsedRecommendations::Wrapped { results } => results,
        ParsedRecommendations::Flat(lists) => lists,
        ParsedRecommendations::FictionOnly(fiction) => RecommendationLists {
            fiction,
            nonfiction: Vec::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_fence_extracts_unchanged() {
        let text = "Here you go:\n```json\n{\"fiction\":[],\"nonfiction\":[]}\n```\nEnjoy!";
        let value = extract_json_from_text(text).unwrap();
        assert_eq!(value, json!({"fiction": [], "nonfiction": []}));
    }

    #[test]
    fn generic_fence_extracts() {
        let text = "```\n{\"fiction\": []}\n```";
        let value = extract_json_from_text(text).unwrap();
        assert_eq!(value, json!({"fiction": []}));
    }

    #[test]
    fn unclosed_fence_still_parses() {
        let text = "```json\n{\"fiction\": [], \"nonfiction\": []}";
        let value = extract_json_from_text(text).unwrap();
        assert_eq!(value, json!({"fiction": [], "nonfiction": []}));
    }

    #[test]
    fn brace_block_recovered_from_prose() {
        let text = "Sure! Here are some picks.\n{\n  \"fiction\": [{\"title\": \"Matilda\"}]\n}\nHope that helps.";
        let value = extract_json_from_text(text).unwrap();
        assert_eq!(value["fiction"][0]["title"], "Matilda");
    }

    #[test]
    fn plain_json_without_decoration_parses() {
        let value = extract_json_from_text("  {\"nonfiction\": []}  ").unwrap();
        assert_eq!(value, json!({"nonfiction": []}));
    }

    #[test]
    fn unparsable_text_fails_with_preview() {
        let err = extract_json_from_text("I cannot help with that.").unwrap_err();
        match err {
            ExtractionError::NoJson { preview } => {
                assert!(preview.contains("cannot help"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nested_results_read_from_inner_object() {
        let value = json!({
            "results": {
                "fiction": [{"title": "Inner"}],
                "nonfiction": []
            },
            "fiction": [{"title": "Outer"}]
        });
        let lists = normalize(value).unwrap();
        assert_eq!(lists.fiction.len(), 1);
        assert_eq!(lists.fiction[0].title, "Inner");
    }

    #[test]
    fn flat_object_read_from_top_level() {
        let value = json!({"fiction": [{"title": "Holes"}], "nonfiction": []});
        let lists = normalize(value).unwrap();
        assert_eq!(lists.fiction[0].title, "Holes");
        assert!(lists.nonfiction.is_empty());
    }

    #[test]
    fn bare_array_becomes_fiction() {
        let value = json!([{"title": "Hatchet"}, {"title": "Wonder"}]);
        let lists = normalize(value).unwrap();
        assert_eq!(lists.fiction.len(), 2);
        assert!(lists.nonfiction.is_empty());
    }

    #[test]
    fn unrelated_object_normalizes_to_empty_lists() {
        let lists = normalize(json!({"message": "no recommendations"})).unwrap();
        assert!(lists.fiction.is_empty());
        assert!(lists.nonfiction.is_empty());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let lists = normalize(json!({"fiction": [{"title": "BFG"}]})).unwrap();
        assert_eq!(lists.fiction.len(), 1);
        assert!(lists.nonfiction.is_empty());
    }

    #[test]
    fn scalar_payload_is_unsupported() {
        assert!(normalize(json!(42)).is_err());
    }
}
