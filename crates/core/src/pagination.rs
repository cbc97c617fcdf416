//! Page bookkeeping for the paginated catalog view.
//!
//! [`PaginationController`] only knows numbers: the current page and how
//! many pages the server says exist. It never fails; out-of-range requests
//! are clamped.

use serde::Serialize;

/// Fixed page size, shared by server queries and every client-side slice.
pub const PAGE_SIZE: u32 = 10;

/// Most page buttons shown around the current page by [`page_window`].
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Number of pages needed for `total` records at [`PAGE_SIZE`]. Never
/// below one.
pub fn total_pages_for(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Read-only copy of the controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub page: u32,
    pub total_pages: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    page: u32,
    total_pages: u32,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
        }
    }
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn state(&self) -> PaginationState {
        PaginationState {
            page: self.page,
            total_pages: self.total_pages,
            page_size: PAGE_SIZE,
        }
    }

    /// Move to page `n`, clamped to `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn set_page(&mut self, n: u32) -> u32 {
        self.page = n.clamp(1, self.total_pages);
        self.page
    }

    pub fn advance(&mut self) -> u32 {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn retreat(&mut self) -> u32 {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Adopt a new page total from the server.
    ///
    /// If the current page no longer exists it is pulled back to the last
    /// page. Returns `true` when the current page changed.
    pub fn reconcile(&mut self, total_pages: u32) -> bool {
        self.total_pages = total_pages.max(1);
        let before = self.page;
        self.set_page(before);
        self.page != before
    }
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// One slot of the compact page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    /// Elided run of pages.
    Gap,
}

/// Compute the page selector for `page` of `total_pages`.
///
/// The first and last page are always present; up to
/// [`MAX_VISIBLE_PAGES`] pages surround the current one, and elided runs
/// become [`PageSlot::Gap`]. A single page needs no selector and yields
/// an empty list.
///
/// # Examples
///
/// ```
/// use catalog_core::pagination::{page_window, PageSlot::{Gap, Page}};
///
/// assert_eq!(
///     page_window(5, 10),
///     vec![Page(1), Gap, Page(3), Page(4), Page(5), Page(6), Page(7), Gap, Page(10)]
/// );
/// ```
pub fn page_window(page: u32, total_pages: u32) -> Vec<PageSlot> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let page = i64::from(page);
    let total = i64::from(total_pages);
    let max_visible = i64::from(MAX_VISIBLE_PAGES);
    let half = max_visible / 2;

    let mut start = (page - half).max(2);
    let mut end = (page + half).min(total - 1);

    if page <= half + 2 {
        start = 2;
        end = (max_visible + 1).min(total - 1);
    }
    if page >= total - (half + 1) {
        end = total - 1;
        start = (total - max_visible).max(2);
    }

    let mut slots = vec![PageSlot::Page(1)];
    if start > 2 {
        slots.push(PageSlot::Gap);
    }
    // Bounds are within [2, total - 1], so the narrowing is lossless.
    slots.extend((start..=end).map(|p| PageSlot::Page(p as u32)));
    if end < total - 1 {
        slots.push(PageSlot::Gap);
    }
    slots.push(PageSlot::Page(total_pages));
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageSlot::{Gap, Page};

    // -- controller ---------------------------------------------------------

    #[test]
    fn starts_on_first_of_one_page() {
        let c = PaginationController::new();
        assert_eq!((c.page(), c.total_pages()), (1, 1));
    }

    #[test]
    fn set_page_clamps_to_bounds() {
        let mut c = PaginationController::new();
        c.reconcile(3);
        assert_eq!(c.set_page(5), 3);
        assert_eq!(c.set_page(0), 1);
        assert_eq!(c.set_page(2), 2);
    }

    #[test]
    fn set_page_always_in_range() {
        let mut c = PaginationController::new();
        for total in 1..=6 {
            c.reconcile(total);
            for requested in 0..=10 {
                let page = c.set_page(requested);
                assert!((1..=total).contains(&page), "page {page} of {total}");
            }
        }
    }

    #[test]
    fn advance_and_retreat_stop_at_edges() {
        let mut c = PaginationController::new();
        c.reconcile(2);
        assert_eq!(c.advance(), 2);
        assert_eq!(c.advance(), 2);
        assert_eq!(c.retreat(), 1);
        assert_eq!(c.retreat(), 1);
    }

    #[test]
    fn reconcile_pulls_back_past_end_page() {
        let mut c = PaginationController::new();
        c.reconcile(3);
        c.set_page(3);
        assert!(c.reconcile(2));
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn reconcile_keeps_valid_page() {
        let mut c = PaginationController::new();
        c.reconcile(3);
        c.set_page(2);
        assert!(!c.reconcile(5));
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn reconcile_zero_total_means_one_page() {
        let mut c = PaginationController::new();
        c.reconcile(0);
        assert_eq!(c.total_pages(), 1);
    }

    #[test]
    fn total_pages_from_record_count() {
        assert_eq!(total_pages_for(0), 1);
        assert_eq!(total_pages_for(10), 1);
        assert_eq!(total_pages_for(11), 2);
        assert_eq!(total_pages_for(25), 3);
    }

    // -- page window --------------------------------------------------------

    #[test]
    fn single_page_has_no_window() {
        assert!(page_window(1, 1).is_empty());
    }

    #[test]
    fn few_pages_listed_in_full() {
        assert_eq!(page_window(1, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn window_near_start() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn window_near_end() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Gap, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }
}
