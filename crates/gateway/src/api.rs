//! REST client for the remote catalog API.
//!
//! Wraps the catalog endpoint (paged list, full snapshot, multipart
//! create/update, delete) using [`reqwest`]. Authentication and insight
//! endpoints are added to the same client in [`crate::auth`] and
//! [`crate::insights`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use catalog_core::{Project, ProjectId, ProjectSubmission};

use crate::catalog::{Acknowledgement, CatalogGateway, ProjectPage, SubmitReceipt};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::session::SessionContext;
use crate::wire::ApiEnvelope;

/// HTTP client for one catalog API deployment.
pub struct HttpCatalogGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    session: Arc<SessionContext>,
}

impl HttpCatalogGateway {
    /// Create a client, applying the configured request timeout if any.
    pub fn new(config: GatewayConfig, session: Arc<SessionContext>) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
            session,
        })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: GatewayConfig,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            client,
            config,
            session,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    // ---- crate helpers ----

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Token for an operation that requires one. Without a session no
    /// request is attempted.
    pub(crate) async fn bearer(&self) -> Result<String, GatewayError> {
        self.session.token().await.ok_or(GatewayError::Unauthorized)
    }

    /// Turn a response into a successful envelope.
    ///
    /// - 401/403 become [`GatewayError::Unauthorized`].
    /// - `status: "error"` becomes [`GatewayError::Rejected`] with the
    ///   server's message, or `fallback` if it sent none.
    /// - Anything else that is not a 2xx with a parsable envelope becomes
    ///   [`GatewayError::Status`] or [`GatewayError::Decode`].
    pub(crate) async fn read_envelope(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<ApiEnvelope, GatewayError> {
        let status = response.status();
        if is_auth_failure(status) {
            return Err(GatewayError::Unauthorized);
        }

        let body = response.text().await?;
        match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) if !envelope.is_success() => Err(GatewayError::rejected(
                envelope.message.unwrap_or_else(|| fallback.to_string()),
            )),
            Ok(envelope) if status.is_success() => Ok(envelope),
            Ok(_) => Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) if status.is_success() => Err(GatewayError::Decode(e)),
            Err(_) => Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Parse a bare (non-envelope) JSON body.
    pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if is_auth_failure(status) {
            return Err(GatewayError::Unauthorized);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn catalog_url(&self) -> String {
        self.config.url(&self.config.catalog_endpoint)
    }

    /// A GET on the catalog endpoint, carrying the token when one is held.
    async fn catalog_get(&self) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(self.catalog_url())
            .header(ACCEPT, "application/json");
        match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn into_projects(envelope: &mut ApiEnvelope, fallback: &str) -> Result<Vec<Project>, GatewayError> {
    let data = envelope.data.take().ok_or_else(|| {
        GatewayError::rejected(envelope.message.clone().unwrap_or_else(|| fallback.to_string()))
    })?;
    Ok(data.into_iter().map(Project::from).collect())
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn list(&self, page: u32, page_size: u32) -> Result<ProjectPage, GatewayError> {
        tracing::debug!(page, page_size, "Requesting catalog page");

        let response = self
            .catalog_get()
            .await
            .query(&[("page", page), ("limit", page_size)])
            .send()
            .await?;

        let mut envelope = Self::read_envelope(response, "Failed to load projects").await?;
        let items = into_projects(&mut envelope, "Failed to load projects")?;

        // Without a pagination block, assume the requested page exists so
        // reconciliation leaves the current page alone.
        let (served_page, total, total_pages) = match envelope.pagination {
            Some(meta) => (
                if meta.page > 0 { meta.page } else { page },
                meta.total,
                meta.total_pages(),
            ),
            None => (page, items.len() as u64, page.max(1)),
        };

        Ok(ProjectPage {
            items,
            page: served_page,
            total,
            total_pages,
        })
    }

    async fn list_all(&self) -> Result<Vec<Project>, GatewayError> {
        tracing::debug!("Requesting full catalog snapshot");

        let response = self.catalog_get().await.send().await?;
        let mut envelope = Self::read_envelope(response, "Failed to load projects").await?;
        into_projects(&mut envelope, "Failed to load projects")
    }

    async fn submit(&self, submission: &ProjectSubmission) -> Result<SubmitReceipt, GatewayError> {
        let token = self.bearer().await?;

        let mut form = Form::new();
        for (name, value) in submission.text_fields() {
            form = form.text(name, value);
        }
        for attachment in submission.attachments() {
            let part = Part::bytes(attachment.bytes().to_vec())
                .file_name(attachment.file_name().to_string());
            form = form.part(attachment.kind().field_name(), part);
        }

        let response = self
            .client
            .post(self.catalog_url())
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let envelope = Self::read_envelope(response, "Operation failed").await?;

        tracing::info!(
            id = ?submission.id,
            update = submission.is_update(),
            "Project submitted",
        );

        Ok(SubmitReceipt {
            message: envelope.message,
            project: envelope.project.map(Project::from),
        })
    }

    async fn remove(&self, id: &ProjectId) -> Result<Acknowledgement, GatewayError> {
        let token = self.bearer().await?;

        let response = self
            .client
            .delete(self.catalog_url())
            .query(&[("id", id.as_str())])
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let envelope = Self::read_envelope(response, "Delete failed").await?;

        tracing::info!(%id, "Project deleted");

        Ok(Acknowledgement {
            message: envelope.message,
        })
    }
}
