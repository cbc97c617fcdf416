//! The catalog state engine.
//!
//! Two sources feed the view: the current page as served by the remote API
//! and a full snapshot fetched separately for search. While a query is
//! active the view is the snapshot filtered by that query and pagination is
//! inert; otherwise it is the current page.
//!
//! Page loads are never cancelled. Each one records the page it targets and
//! a sequence number when issued, and its response is committed only if the
//! controller still points at that page and no newer load has committed.
//! The state lock is never held across a gateway call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use catalog_core::search::{filter_projects, normalize_query};
use catalog_core::{PaginationController, PaginationState, Project, ProjectForm, ProjectId, PAGE_SIZE};
use catalog_gateway::{CatalogGateway, GatewayError, SessionContext};

use crate::error::EngineError;
use crate::events::{CatalogEvent, EventBus};

const LOAD_FAILED: &str = "Failed to load projects";
const SAVE_FAILED: &str = "Operation failed";
const DELETE_FAILED: &str = "Delete failed";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a page load did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was committed. `page` is where the controller ended up,
    /// which may be lower than requested if the catalog shrank.
    Committed {
        page: u32,
        total_pages: u32,
        count: usize,
    },
    /// The response arrived after the view had moved on and was dropped.
    Stale { page: u32 },
    /// Nothing was requested (search active, or already at the boundary).
    Inert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Refreshed { count: usize },
    /// A newer snapshot had already been committed.
    Superseded,
}

/// Result of a successful create, update, or delete.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationReport {
    /// The server's confirmation message, if it sent one.
    pub message: Option<String>,
    /// The reconciling reload that followed. A failed reload does not undo
    /// the mutation, so it is reported here rather than as the result.
    pub reload: Result<LoadOutcome, EngineError>,
}

/// Everything a presentation layer needs to render the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub items: Vec<Project>,
    /// `None` while a search query is active.
    pub pagination: Option<PaginationState>,
    pub loading: bool,
    pub query: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CatalogState {
    paged_items: Vec<Project>,
    all_items: Vec<Project>,
    pagination: PaginationController,
    query: String,
    /// Page of the items currently in `paged_items`.
    committed_page: u32,
    has_loaded: bool,
    load_issued: u64,
    load_committed: u64,
    snapshot_issued: u64,
    snapshot_committed: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            paged_items: Vec::new(),
            all_items: Vec::new(),
            pagination: PaginationController::new(),
            query: String::new(),
            committed_page: 1,
            has_loaded: false,
            load_issued: 0,
            load_committed: 0,
            snapshot_issued: 0,
            snapshot_committed: 0,
        }
    }
}

impl CatalogState {
    fn searching(&self) -> bool {
        normalize_query(&self.query).is_some()
    }
}

/// Counts an operation as in flight until dropped, whichever way the
/// operation exits.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// CatalogEngine
// ---------------------------------------------------------------------------

/// Owns the catalog view and keeps it consistent with the server.
pub struct CatalogEngine<G: ?Sized> {
    gateway: Arc<G>,
    session: Arc<SessionContext>,
    state: RwLock<CatalogState>,
    loading: AtomicUsize,
    submitting: AtomicUsize,
    events: EventBus,
}

impl<G: CatalogGateway + ?Sized> CatalogEngine<G> {
    /// `session` must be the same context the gateway reads its token
    /// from, so that dropping it here stops further authorized calls.
    pub fn new(gateway: Arc<G>, session: Arc<SessionContext>) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(CatalogState::default()),
            loading: AtomicUsize::new(0),
            submitting: AtomicUsize::new(0),
            events: EventBus::default(),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Whether any page load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    /// Whether any create, update, or delete is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0
    }

    pub async fn pagination(&self) -> PaginationState {
        self.state.read().await.pagination.state()
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    // ---- loading ----

    /// Load `page` (clamped to the known page range) and make it current.
    pub async fn load(&self, page: u32) -> Result<LoadOutcome, EngineError> {
        self.ensure_session().await?;
        let _loading = InFlight::enter(&self.loading);

        let mut requested = page;
        loop {
            let (target, seq) = {
                let mut state = self.state.write().await;
                if !state.has_loaded {
                    // Nothing is known about the page range yet; let the
                    // first response decide.
                    state.pagination.reconcile(requested.max(1));
                }
                let target = state.pagination.set_page(requested);
                state.load_issued += 1;
                (target, state.load_issued)
            };

            tracing::debug!(page = target, seq, "Requesting catalog page");
            let result = self.gateway.list(target, PAGE_SIZE).await;

            let mut state = self.state.write().await;
            let stale = state.pagination.page() != target || seq < state.load_committed;

            let served = match result {
                Ok(served) => served,
                Err(GatewayError::Unauthorized) => {
                    drop(state);
                    return Err(self.expire_session().await);
                }
                // A newer load is in flight or done and will settle the page.
                Err(e) if stale || seq < state.load_issued => {
                    tracing::debug!(page = target, seq, error = %e, "Dropping failure of stale page load");
                    return Ok(LoadOutcome::Stale { page: target });
                }
                Err(e) => {
                    // The view still shows the last committed page.
                    let committed_page = state.committed_page;
                    state.pagination.set_page(committed_page);
                    drop(state);
                    return Err(self.fail(e, LOAD_FAILED));
                }
            };

            if stale {
                tracing::debug!(
                    page = target,
                    current = state.pagination.page(),
                    seq,
                    "Dropping stale page response",
                );
                return Ok(LoadOutcome::Stale { page: target });
            }

            let count = served.items.len();
            state.paged_items = served.items;
            state.committed_page = target;
            state.load_committed = seq;
            state.has_loaded = true;
            let moved = state.pagination.reconcile(served.total_pages);
            let current = state.pagination.state();
            drop(state);

            tracing::info!(
                page = target,
                total = served.total,
                total_pages = current.total_pages,
                count,
                "Loaded catalog page",
            );
            self.events.publish(CatalogEvent::PageLoaded {
                page: target,
                total_pages: current.total_pages,
                count,
            });

            if !moved {
                return Ok(LoadOutcome::Committed {
                    page: current.page,
                    total_pages: current.total_pages,
                    count,
                });
            }

            tracing::info!(from = target, to = current.page, "Page out of range, loading last page");
            requested = current.page;
        }
    }

    /// Reload the current page.
    pub async fn reload(&self) -> Result<LoadOutcome, EngineError> {
        let page = self.state.read().await.pagination.page();
        self.load(page).await
    }

    /// Replace the full snapshot used for search. Not retried on failure.
    pub async fn refresh_snapshot(&self) -> Result<SnapshotOutcome, EngineError> {
        self.ensure_session().await?;

        let seq = {
            let mut state = self.state.write().await;
            state.snapshot_issued += 1;
            state.snapshot_issued
        };

        let items = match self.gateway.list_all().await {
            Ok(items) => items,
            Err(GatewayError::Unauthorized) => return Err(self.expire_session().await),
            Err(e) => {
                if seq < self.state.read().await.snapshot_committed {
                    tracing::debug!(seq, error = %e, "Dropping failure of superseded catalog snapshot");
                    return Ok(SnapshotOutcome::Superseded);
                }
                return Err(self.fail(e, LOAD_FAILED));
            }
        };

        let mut state = self.state.write().await;
        if seq < state.snapshot_committed {
            tracing::debug!(seq, "Dropping superseded catalog snapshot");
            return Ok(SnapshotOutcome::Superseded);
        }
        let count = items.len();
        state.all_items = items;
        state.snapshot_committed = seq;
        drop(state);

        tracing::info!(count, "Refreshed catalog snapshot");
        self.events.publish(CatalogEvent::SnapshotRefreshed { count });
        Ok(SnapshotOutcome::Refreshed { count })
    }

    // ---- navigation ----

    /// Jump to page `n`. Inert while searching.
    pub async fn go_to_page(&self, n: u32) -> Result<LoadOutcome, EngineError> {
        if self.state.read().await.searching() {
            return Ok(LoadOutcome::Inert);
        }
        self.load(n).await
    }

    pub async fn next_page(&self) -> Result<LoadOutcome, EngineError> {
        let target = {
            let state = self.state.read().await;
            let page = state.pagination.page();
            if state.searching() || page >= state.pagination.total_pages() {
                return Ok(LoadOutcome::Inert);
            }
            page + 1
        };
        self.load(target).await
    }

    pub async fn previous_page(&self) -> Result<LoadOutcome, EngineError> {
        let target = {
            let state = self.state.read().await;
            let page = state.pagination.page();
            if state.searching() || page <= 1 {
                return Ok(LoadOutcome::Inert);
            }
            page - 1
        };
        self.load(target).await
    }

    // ---- search & view ----

    /// Set the search query. A blank query returns to paged browsing at
    /// the last set page.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        tracing::debug!(query = %query, "Search query changed");
        self.state.write().await.query = query;
    }

    /// The current page for a blank `query`, otherwise the snapshot
    /// filtered by it.
    pub async fn effective_view(&self, query: &str) -> Vec<Project> {
        let state = self.state.read().await;
        Self::items_for(&state, query)
    }

    pub async fn view(&self) -> CatalogView {
        let state = self.state.read().await;
        let searching = state.searching();
        CatalogView {
            items: Self::items_for(&state, &state.query),
            pagination: (!searching).then(|| state.pagination.state()),
            loading: self.is_loading(),
            query: state.query.clone(),
        }
    }

    /// Look a project up in the snapshot, then in the current page.
    pub async fn project(&self, id: &ProjectId) -> Option<Project> {
        let state = self.state.read().await;
        state
            .all_items
            .iter()
            .chain(state.paged_items.iter())
            .find(|p| &p.id == id)
            .cloned()
    }

    fn items_for(state: &CatalogState, query: &str) -> Vec<Project> {
        if normalize_query(query).is_none() {
            state.paged_items.clone()
        } else {
            filter_projects(&state.all_items, query)
        }
    }

    // ---- mutations ----

    /// Validate and create a project, then reload the current page.
    pub async fn create(&self, form: ProjectForm) -> Result<MutationReport, EngineError> {
        self.save(form, None).await
    }

    /// Validate and update project `id`, then reload the current page.
    pub async fn update(&self, form: ProjectForm, id: ProjectId) -> Result<MutationReport, EngineError> {
        self.save(form, Some(id)).await
    }

    async fn save(&self, form: ProjectForm, id: Option<ProjectId>) -> Result<MutationReport, EngineError> {
        let submission = form.into_submission(id).inspect_err(|e| {
            tracing::debug!(error = %e, "Project form refused");
        })?;

        let submitting = InFlight::enter(&self.submitting);
        let receipt = match self.gateway.submit(&submission).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.reject(e, SAVE_FAILED).await),
        };
        drop(submitting);

        let id = submission
            .id
            .clone()
            .or_else(|| receipt.project.as_ref().map(|p| p.id.clone()));
        tracing::info!(id = ?id, update = submission.is_update(), "Project saved");
        self.events.publish(CatalogEvent::ProjectSaved {
            id,
            message: receipt.message.clone(),
        });

        let reload = self.reconcile_after_mutation().await?;
        Ok(MutationReport {
            message: receipt.message,
            reload,
        })
    }

    /// Delete project `id`, then reload the current page. If that page no
    /// longer exists the reload settles on the last one.
    pub async fn delete(&self, id: &ProjectId) -> Result<MutationReport, EngineError> {
        let submitting = InFlight::enter(&self.submitting);
        let ack = match self.gateway.remove(id).await {
            Ok(ack) => ack,
            Err(e) => return Err(self.reject(e, DELETE_FAILED).await),
        };
        drop(submitting);

        tracing::info!(%id, "Project deleted");
        self.events.publish(CatalogEvent::ProjectDeleted { id: id.clone() });

        let reload = self.reconcile_after_mutation().await?;
        Ok(MutationReport {
            message: ack.message,
            reload,
        })
    }

    /// Reload after a mutation. Only an expired session aborts the caller;
    /// any other failure is handed back inside the report.
    async fn reconcile_after_mutation(&self) -> Result<Result<LoadOutcome, EngineError>, EngineError> {
        match self.reload().await {
            Err(EngineError::SessionExpired) => Err(EngineError::SessionExpired),
            other => {
                if let Err(e) = &other {
                    tracing::warn!(error = %e, "Reload after mutation failed");
                }
                Ok(other)
            }
        }
    }

    // ---- failures ----

    async fn ensure_session(&self) -> Result<(), EngineError> {
        if self.session.is_active().await {
            Ok(())
        } else {
            Err(self.expire_session().await)
        }
    }

    async fn reject(&self, error: GatewayError, fallback: &str) -> EngineError {
        if error.is_unauthorized() {
            self.expire_session().await
        } else {
            self.fail(error, fallback)
        }
    }

    async fn expire_session(&self) -> EngineError {
        if self.session.invalidate().await {
            tracing::warn!("Authorization refused, session dropped");
        }
        self.events.publish(CatalogEvent::SessionExpired);
        EngineError::SessionExpired
    }

    fn fail(&self, error: GatewayError, fallback: &str) -> EngineError {
        let message = error.user_message(fallback);
        tracing::warn!(error = %error, "Catalog operation failed");
        self.events.publish(CatalogEvent::Failed {
            message: message.clone(),
        });
        EngineError::Remote(message)
    }
}
