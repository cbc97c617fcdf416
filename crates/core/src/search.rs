//! Client-side catalog search.
//!
//! Search runs over the full catalog snapshot rather than the current
//! page, so it is a plain in-memory substring filter.

use crate::project::Project;

/// Normalize a raw query: trim and lowercase. Returns `None` when nothing
/// searchable remains, meaning "no search active".
///
/// # Examples
///
/// ```
/// use catalog_core::search::normalize_query;
///
/// assert_eq!(normalize_query("  ML "), Some("ml".to_string()));
/// assert_eq!(normalize_query("   "), None);
/// ```
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Whether a project matches an already-normalized query.
///
/// Title, description, and category labels are each checked for a
/// case-insensitive substring; any hit is a match.
pub fn matches(project: &Project, needle: &str) -> bool {
    project.title.to_lowercase().contains(needle)
        || project.description.to_lowercase().contains(needle)
        || project
            .categories
            .iter()
            .any(|c| c.label().to_lowercase().contains(needle))
}

/// Filter projects by a raw query. An empty query returns everything.
pub fn filter_projects(projects: &[Project], query: &str) -> Vec<Project> {
    match normalize_query(query) {
        None => projects.to_vec(),
        Some(needle) => projects
            .iter()
            .filter(|p| matches(p, &needle))
            .cloned()
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Category, CategorySet};
    use crate::types::ProjectId;

    fn project(id: &str, title: &str, description: &str, categories: &[Category]) -> Project {
        Project {
            id: ProjectId::new(id),
            title: title.to_string(),
            description: description.to_string(),
            categories: categories.iter().copied().collect::<CategorySet>(),
            price: 10.0,
            actual_price: 20.0,
            documentation: None,
            code_files: None,
            created_at: None,
        }
    }

    fn catalog() -> Vec<Project> {
        vec![
            project("1", "ML Pipeline", "Training loop", &[Category::Python]),
            project("2", "Web App", "Storefront", &[Category::React]),
            project("3", "Sensor Hub", "Collects readings", &[Category::IoT]),
        ]
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let hits = filter_projects(&catalog(), "ml");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "ML Pipeline");
    }

    #[test]
    fn description_match() {
        let hits = filter_projects(&catalog(), "STORE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "2");
    }

    #[test]
    fn category_match() {
        let hits = filter_projects(&catalog(), "iot");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "3");
    }

    #[test]
    fn blank_query_returns_everything() {
        assert_eq!(filter_projects(&catalog(), "  ").len(), 3);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_projects(&catalog(), "blockchain").is_empty());
    }
}
