//! Deterministic mock catalog.
//!
//! Served directly in mock mode and as the fallback whenever the live
//! Gemini call fails.

use crate::models::{Book, RecommendationLists};

/// Fixed dataset, trimmed to `max_per_category` entries per list.
pub fn mock_recommendations(max_per_category: usize) -> RecommendationLists {
    let mut fiction = vec![Book {
        title: "The Dragon's Secret".to_string(),
        author: "Maria Swift".to_string(),
        year: Some(2023),
        isbn: Some("978-1234567890".to_string()),
        cover_url: Some("https://via.placeholder.com/200x300".to_string()),
        short_description: Some(
            "A young wizard discovers a friendly dragon hiding in the school library, \
             leading to an adventure about friendship and courage."
                .to_string(),
        ),
        age_range: Some("8-12".to_string()),
        why_recommended: Some("Based on interests.".to_string()),
        tags: vec![
            "fantasy".to_string(),
            "friendship".to_string(),
            "adventure".to_string(),
            "dragons".to_string(),
        ],
        content_warnings: Some(vec!["mild peril".to_string()]),
        ..Default::default()
    }];

    let mut nonfiction = vec![Book {
        title: "Amazing Science Experiments at Home".to_string(),
        author: "Dr. Sarah Smart".to_string(),
        year: Some(2024),
        isbn: Some("978-0987654321".to_string()),
        cover_url: Some("https://via.placeholder.com/200x300".to_string()),
        short_description: Some(
            "A collection of safe and fun science experiments that can be done with \
             everyday household items."
                .to_string(),
        ),
        age_range: Some("7-13".to_string()),
        why_recommended: Some("Perfect for science lovers.".to_string()),
        tags: vec![
            "science".to_string(),
            "experiments".to_string(),
            "education".to_string(),
            "STEM".to_string(),
        ],
        content_warnings: None,
        ..Default::default()
    }];

    fiction.truncate(max_per_category);
    nonfiction.truncate(max_per_category);

    RecommendationLists {
        fiction,
        nonfiction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_one_title_per_category() {
        let lists = mock_recommendations(5);
        assert_eq!(lists.fiction.len(), 1);
        assert_eq!(lists.nonfiction.len(), 1);
        assert_eq!(lists.fiction[0].title, "The Dragon's Secret");
        assert_eq!(lists.nonfiction[0].title, "Amazing Science Experiments at Home");
    }

    #[test]
    fn zero_max_yields_empty_lists() {
        let lists = mock_recommendations(0);
        assert!(lists.fiction.is_empty());
        assert!(lists.nonfiction.is_empty());
    }
}
