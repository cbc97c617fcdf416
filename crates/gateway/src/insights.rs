//! Order and customer statistics endpoints.

use reqwest::header::ACCEPT;

use catalog_core::customers::{CustomerOrder, DashboardStats};

use crate::api::HttpCatalogGateway;
use crate::error::GatewayError;
use crate::wire::CustomersEnvelope;

impl HttpCatalogGateway {
    /// Fetch the dashboard's headline figures.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, GatewayError> {
        let token = self.bearer().await?;
        let response = self
            .client()
            .get(self.config().url(&self.config().stats_endpoint))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Fetch every customer order. Filtering and pagination happen
    /// locally in [`CustomerLedger`](catalog_core::customers::CustomerLedger).
    pub async fn customer_orders(&self) -> Result<Vec<CustomerOrder>, GatewayError> {
        let token = self.bearer().await?;
        let response = self
            .client()
            .get(self.config().url(&self.config().customers_endpoint))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let envelope: CustomersEnvelope = Self::read_json(response).await?;
        tracing::debug!(count = envelope.customers.len(), "Loaded customer orders");
        Ok(envelope.customers)
    }
}
