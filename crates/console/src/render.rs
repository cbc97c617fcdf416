//! Plain-text rendering of catalog, dashboard, and customer views.

use std::fmt::Write;

use catalog_core::customers::{CustomerLedger, DashboardStats};
use catalog_core::pagination::{page_window, PageSlot};
use catalog_core::types::format_amount;
use catalog_core::PaginationState;
use catalog_engine::CatalogView;

pub fn catalog(view: &CatalogView) -> String {
    let mut out = String::new();

    if !view.query.trim().is_empty() {
        let _ = writeln!(
            out,
            "Search \"{}\": {} result(s)",
            view.query.trim(),
            view.items.len()
        );
    }

    if view.items.is_empty() {
        out.push_str("No projects found\n");
    } else {
        let _ = writeln!(
            out,
            "{:<8} {:<32} {:<28} {:>10} {:>12}",
            "ID", "TITLE", "CATEGORIES", "PRICE", "ACTUAL"
        );
        for project in &view.items {
            let _ = writeln!(
                out,
                "{:<8} {:<32} {:<28} {:>10} {:>12}",
                project.id.as_str(),
                truncate(&project.title, 32),
                truncate(&project.category_label(), 28),
                format_amount(project.price),
                format_amount(project.actual_price),
            );
        }
    }

    if let Some(pagination) = view.pagination {
        out.push_str(&pager(pagination));
        out.push('\n');
    }
    out
}

/// `Page 2 of 9  1 [2] 3 4 5 6 ... 9`
pub fn pager(state: PaginationState) -> String {
    let mut line = format!("Page {} of {}", state.page, state.total_pages);
    let slots = page_window(state.page, state.total_pages);
    if !slots.is_empty() {
        line.push_str("  ");
        let rendered: Vec<String> = slots
            .into_iter()
            .map(|slot| match slot {
                PageSlot::Page(p) if p == state.page => format!("[{p}]"),
                PageSlot::Page(p) => p.to_string(),
                PageSlot::Gap => "...".to_string(),
            })
            .collect();
        line.push_str(&rendered.join(" "));
    }
    line
}

pub fn stats(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Orders:          {}", stats.total_orders);
    let _ = writeln!(out, "  successful:    {}", stats.success_orders);
    let _ = writeln!(out, "  pending:       {}", stats.pending_orders);
    let _ = writeln!(out, "Customers:       {}", stats.total_customers);
    let _ = writeln!(out, "Revenue:         {}", format_amount(stats.total_revenue));
    let _ = writeln!(out, "Average order:   {}", format_amount(stats.average_order_value));

    if !stats.recent_orders.is_empty() {
        out.push_str("\nRecent orders\n");
        for order in &stats.recent_orders {
            let _ = writeln!(
                out,
                "  {:<24} {:<32} {:>10} {}",
                truncate(&order.customer_name, 24),
                truncate(&order.project_title, 32),
                format_amount(order.amount),
                order.status,
            );
        }
    }
    out
}

pub fn customers(ledger: &CustomerLedger) -> String {
    let mut out = String::new();
    let visible = ledger.visible();

    if visible.is_empty() {
        out.push_str("No customer orders found\n");
    } else {
        for order in visible {
            let _ = writeln!(
                out,
                "{:<24} {:<28} {:<14} {:<28} {:>10} {}",
                truncate(&order.customer_name, 24),
                truncate(&order.customer_email, 28),
                truncate(&order.customer_phone, 14),
                truncate(&order.project_title, 28),
                format_amount(order.amount),
                order.status,
            );
        }
    }

    out.push_str(&pager(ledger.pagination()));
    out.push('\n');
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
