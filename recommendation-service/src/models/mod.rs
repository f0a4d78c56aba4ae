//! Request and response types for the recommendation API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Reader profile submitted by the client.
///
/// `age` and `reading_level` are required; any additional keys are kept
/// verbatim and fed into the generation prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderProfile {
    #[serde(default)]
    pub age: Option<Number>,
    #[serde(default)]
    pub reading_level: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReaderProfile {
    /// Both required fields must be truthy: present, non-zero, non-empty.
    pub fn has_required_fields(&self) -> bool {
        let age_ok = self
            .age
            .as_ref()
            .map(|n| n.as_f64().unwrap_or(0.0) != 0.0)
            .unwrap_or(false);
        let level_ok = self
            .reading_level
            .as_deref()
            .map(|l| !l.is_empty())
            .unwrap_or(false);
        age_ok && level_ok
    }

    /// Truthy entries only, in the shape the prompt embeds.
    pub fn truthy_entries(&self) -> Map<String, Value> {
        let mut entries = Map::new();
        if let Some(age) = &self.age {
            if age.as_f64().unwrap_or(0.0) != 0.0 {
                entries.insert("age".to_string(), Value::Number(age.clone()));
            }
        }
        if let Some(level) = &self.reading_level {
            if !level.is_empty() {
                entries.insert("reading_level".to_string(), Value::String(level.clone()));
            }
        }
        for (key, value) in &self.extra {
            if is_truthy(value) {
                entries.insert(key.clone(), value.clone());
            }
        }
        entries
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn default_max_results() -> usize {
    5
}

/// Body of `POST /api/recommend`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub profile: ReaderProfile,
    #[serde(default = "default_max_results")]
    pub max_results_per_category: usize,
    /// Accepted for API compatibility; not enforced on the output.
    #[serde(default)]
    pub exclude_titles: Vec<String>,
    /// Accepted for API compatibility; not enforced on the output.
    #[serde(default)]
    pub seed: Option<String>,
}

/// A recommended book.
///
/// Every field is defaulted so a partially filled model answer still
/// decodes; unknown keys are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: Option<i64>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub short_description: Option<String>,
    pub age_range: Option<String>,
    pub why_recommended: Option<String>,
    pub tags: Vec<String>,
    pub content_warnings: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The canonical two-category result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationLists {
    pub fiction: Vec<Book>,
    pub nonfiction: Vec<Book>,
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationSource {
    Mock,
    Gemini,
    FallbackMock,
}

/// Body of a successful `POST /api/recommend` response.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub results: RecommendationLists,
    pub source: RecommendationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_with_both_fields_is_valid() {
        let profile: ReaderProfile =
            serde_json::from_value(json!({"age": 8, "reading_level": "Beginner"})).unwrap();
        assert!(profile.has_required_fields());
    }

    #[test]
    fn profile_missing_reading_level_is_invalid() {
        let profile: ReaderProfile = serde_json::from_value(json!({"age": 8})).unwrap();
        assert!(!profile.has_required_fields());
    }

    #[test]
    fn zero_age_and_empty_level_are_falsy() {
        let profile: ReaderProfile =
            serde_json::from_value(json!({"age": 0, "reading_level": "Beginner"})).unwrap();
        assert!(!profile.has_required_fields());

        let profile: ReaderProfile =
            serde_json::from_value(json!({"age": 8, "reading_level": ""})).unwrap();
        assert!(!profile.has_required_fields());
    }

    #[test]
    fn truthy_entries_drop_empty_values() {
        let profile: ReaderProfile = serde_json::from_value(json!({
            "age": 8,
            "reading_level": "Beginner",
            "interests": ["dragons"],
            "favorite_author": "",
            "siblings": 0
        }))
        .unwrap();

        let entries = profile.truthy_entries();
        assert_eq!(entries["age"], json!(8));
        assert_eq!(entries["interests"], json!(["dragons"]));
        assert!(!entries.contains_key("favorite_author"));
        assert!(!entries.contains_key("siblings"));
    }

    #[test]
    fn request_defaults_apply() {
        let request: RecommendRequest =
            serde_json::from_value(json!({"profile": {"age": 8, "reading_level": "Beginner"}}))
                .unwrap();
        assert_eq!(request.max_results_per_category, 5);
        assert!(request.exclude_titles.is_empty());
        assert!(request.seed.is_none());
    }

    #[test]
    fn source_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(RecommendationSource::FallbackMock).unwrap(),
            json!("fallback-mock")
        );
        assert_eq!(
            serde_json::to_value(RecommendationSource::Mock).unwrap(),
            json!("mock")
        );
    }

    #[test]
    fn book_decodes_from_partial_object() {
        let book: Book = serde_json::from_value(json!({"title": "Charlotte's Web"})).unwrap();
        assert_eq!(book.title, "Charlotte's Web");
        assert!(book.tags.is_empty());
        assert!(book.content_warnings.is_none());
    }
}
