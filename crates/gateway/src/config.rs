use std::time::Duration;

/// Where the remote API lives and what its endpoints are called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL without trailing slash, e.g. `https://shop.example.org/api`.
    pub base_url: String,
    /// Catalog list/create/update/delete endpoint.
    pub catalog_endpoint: String,
    pub login_endpoint: String,
    /// Endpoint answering `?logout=true`.
    pub auth_endpoint: String,
    pub stats_endpoint: String,
    pub customers_endpoint: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Default endpoint names under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            catalog_endpoint: "list.php".into(),
            login_endpoint: "admin_login.php".into(),
            auth_endpoint: "auth.php".into(),
            stats_endpoint: "dashboard-stats.php".into(),
            customers_endpoint: "get-customers.php".into(),
            request_timeout: None,
        }
    }

    pub fn with_catalog_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.catalog_endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}
