//! JSON shapes exchanged with the remote API.
//!
//! The PHP backend is loose about types: ids and amounts arrive as either
//! strings or numbers, and optional fields may be absent or `null`. These
//! types absorb that looseness so the rest of the workspace only sees
//! [`Project`].

use serde::Deserialize;

use catalog_core::pagination::total_pages_for;
use catalog_core::project::parse_categories;
use catalog_core::types::{parse_amount, parse_timestamp};
use catalog_core::{Project, ProjectId};

/// The `status` discriminator every envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// The common response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<WireProject>>,
    #[serde(default)]
    pub project: Option<WireProject>,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }
}

/// Pagination block returned with a paged list.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

impl PaginationMeta {
    /// Page count as reported, or derived from the record total when the
    /// server left `pages` out.
    pub fn total_pages(&self) -> u32 {
        if self.pages > 0 {
            self.pages
        } else {
            total_pages_for(self.total)
        }
    }
}

/// A JSON value that may be a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }

    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Scalar::Text(s) => parse_amount(s),
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
        }
    }
}

/// A project record as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireProject {
    pub id: Scalar,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "categories")]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub actual_price: Option<Scalar>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub code_files: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<WireProject> for Project {
    fn from(wire: WireProject) -> Self {
        let amount = |value: &Option<Scalar>| value.as_ref().and_then(Scalar::as_amount).unwrap_or(0.0);
        let price = amount(&wire.price);
        let actual_price = amount(&wire.actual_price);

        Project {
            id: ProjectId::new(wire.id.into_text()),
            title: wire.title,
            description: wire.description.unwrap_or_default(),
            categories: parse_categories(wire.category.as_deref().unwrap_or_default()),
            price,
            actual_price,
            documentation: wire.documentation.filter(|s| !s.is_empty()),
            code_files: wire.code_files.filter(|s| !s.is_empty()),
            created_at: wire.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Body of `get-customers.php`.
#[derive(Debug, Deserialize)]
pub struct CustomersEnvelope {
    #[serde(default)]
    pub customers: Vec<catalog_core::customers::CustomerOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Category;

    #[test]
    fn project_with_string_fields() {
        let wire: WireProject = serde_json::from_value(serde_json::json!({
            "id": "17",
            "title": "ML Pipeline",
            "description": "Training loop",
            "category": "Python, Machine Learning",
            "price": "499.00",
            "actual_price": "999.00",
            "documentation": "ml.pdf",
            "code_files": "",
            "created_at": "2024-03-09 14:05:00"
        }))
        .expect("should deserialize");

        let project = Project::from(wire);
        assert_eq!(project.id.as_str(), "17");
        assert_eq!(project.price, 499.0);
        assert_eq!(project.actual_price, 999.0);
        assert!(project.categories.contains(&Category::MachineLearning));
        assert_eq!(project.documentation.as_deref(), Some("ml.pdf"));
        assert!(project.code_files.is_none());
        assert!(project.created_at.is_some());
    }

    #[test]
    fn project_with_numeric_fields_and_nulls() {
        let wire: WireProject = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Web App",
            "description": null,
            "categories": "React",
            "price": 0,
            "actual_price": 250.5
        }))
        .expect("should deserialize");

        let project = Project::from(wire);
        assert_eq!(project.id.as_str(), "4");
        assert_eq!(project.description, "");
        assert_eq!(project.price, 0.0);
        assert_eq!(project.actual_price, 250.5);
        assert!(project.categories.contains(&Category::React));
    }

    #[test]
    fn pagination_falls_back_to_total() {
        let meta: PaginationMeta =
            serde_json::from_value(serde_json::json!({"page": 1, "limit": 10, "total": 25}))
                .expect("should deserialize");
        assert_eq!(meta.total_pages(), 3);
    }

    #[test]
    fn error_envelope() {
        let env: ApiEnvelope =
            serde_json::from_value(serde_json::json!({"status": "error", "message": "Invalid id"}))
                .expect("should deserialize");
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("Invalid id"));
    }
}
