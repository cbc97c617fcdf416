//! Order and customer statistics.
//!
//! The remote API returns the whole customer order list in one response;
//! [`CustomerLedger`] filters it by customer name and paginates locally
//! with the same [`PAGE_SIZE`] the catalog uses.

use serde::{Deserialize, Serialize};

use crate::pagination::{total_pages_for, PaginationState, PAGE_SIZE};

/// One recent order shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub customer_name: String,
    pub project_title: String,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_customers: u64,
    pub total_revenue: f64,
    pub success_orders: u64,
    pub pending_orders: u64,
    pub average_order_value: f64,
    #[serde(default)]
    pub recent_orders: Vec<RecentOrder>,
}

/// A purchase together with the buyer's contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    pub project_title: String,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Searchable, locally paginated view over every customer order.
#[derive(Debug, Clone, Default)]
pub struct CustomerLedger {
    orders: Vec<CustomerOrder>,
    query: String,
    page: u32,
}

impl CustomerLedger {
    pub fn new(orders: Vec<CustomerOrder>) -> Self {
        Self {
            orders,
            query: String::new(),
            page: 1,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the name filter. Always returns to the first page, since the
    /// old page number means nothing against a different result set.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Orders whose customer name contains the query (case-insensitive),
    /// across the whole dataset.
    pub fn filtered(&self) -> Vec<&CustomerOrder> {
        let needle = self.query.trim().to_lowercase();
        self.orders
            .iter()
            .filter(|o| needle.is_empty() || o.customer_name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn total_pages(&self) -> u32 {
        total_pages_for(self.filtered().len() as u64)
    }

    pub fn set_page(&mut self, page: u32) -> u32 {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState {
            page: self.page.max(1),
            total_pages: self.total_pages(),
            page_size: PAGE_SIZE,
        }
    }

    /// The current page of filtered orders.
    pub fn visible(&self) -> Vec<&CustomerOrder> {
        let start = (self.page.max(1) as usize - 1) * PAGE_SIZE as usize;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(name: &str) -> CustomerOrder {
        CustomerOrder {
            customer_name: name.to_string(),
            customer_email: format!("{}@example.com", name.to_lowercase()),
            customer_phone: String::new(),
            project_title: "Web App".to_string(),
            amount: 499.0,
            status: "success".to_string(),
            created_at: None,
        }
    }

    fn ledger(n: usize) -> CustomerLedger {
        CustomerLedger::new((0..n).map(|i| order(&format!("Customer {i}"))).collect())
    }

    #[test]
    fn paginates_with_shared_page_size() {
        let mut l = ledger(23);
        assert_eq!(l.total_pages(), 3);
        assert_eq!(l.visible().len(), 10);
        l.set_page(3);
        assert_eq!(l.visible().len(), 3);
    }

    #[test]
    fn search_filters_whole_dataset_before_paginating() {
        let mut l = ledger(30);
        l.set_page(3);
        l.set_query("customer 2");
        // "Customer 2" and "Customer 20".."Customer 29"
        assert_eq!(l.filtered().len(), 11);
        assert_eq!(l.pagination().page, 1);
        assert_eq!(l.total_pages(), 2);
    }

    #[test]
    fn empty_ledger_has_one_page() {
        let l = CustomerLedger::new(Vec::new());
        assert_eq!(l.total_pages(), 1);
        assert!(l.visible().is_empty());
    }

    #[test]
    fn set_page_clamps() {
        let mut l = ledger(12);
        assert_eq!(l.set_page(9), 2);
        assert_eq!(l.set_page(0), 1);
    }

    #[test]
    fn dashboard_stats_tolerates_missing_recent_orders() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "total_orders": 4,
            "total_customers": 3,
            "total_revenue": 1996.0,
            "success_orders": 3,
            "pending_orders": 1,
            "average_order_value": 499.0
        }))
        .expect("stats should deserialize");
        assert!(stats.recent_orders.is_empty());
        assert_eq!(stats.total_orders, 4);
    }
}
