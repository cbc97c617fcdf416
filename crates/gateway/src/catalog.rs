//! The catalog gateway seam.
//!
//! [`CatalogGateway`] is what the state engine talks to. The production
//! implementation is [`HttpCatalogGateway`](crate::HttpCatalogGateway);
//! tests substitute scripted in-memory gateways.

use async_trait::async_trait;

use catalog_core::{Project, ProjectId, ProjectSubmission};

use crate::error::GatewayError;

/// One page of the catalog plus the server's pagination figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPage {
    pub items: Vec<Project>,
    /// Page the server says it returned.
    pub page: u32,
    /// Total record count.
    pub total: u64,
    /// Total page count at the requested page size (at least one).
    pub total_pages: u32,
}

/// Outcome of a successful create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
    /// The stored record, when the server echoes it back. The engine does
    /// not merge this; it reloads instead.
    pub project: Option<Project>,
}

/// Outcome of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

/// Request/response access to the remote catalog. Implementations hold no
/// catalog state and never retry.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch one page of `page_size` projects.
    async fn list(&self, page: u32, page_size: u32) -> Result<ProjectPage, GatewayError>;

    /// Fetch every project, unpaginated.
    async fn list_all(&self) -> Result<Vec<Project>, GatewayError>;

    /// Create (no id) or update (id present) a project.
    async fn submit(&self, submission: &ProjectSubmission) -> Result<SubmitReceipt, GatewayError>;

    /// Delete a project.
    async fn remove(&self, id: &ProjectId) -> Result<Acknowledgement, GatewayError>;
}
