//! Explicit session context.
//!
//! The bearer token lives in a [`SessionContext`] handed to the gateway at
//! construction and shared (via `Arc`) with whoever must be able to drop
//! it on an authorization failure. Nothing reads ambient storage.

use tokio::sync::RwLock;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Shared holder of the current session, if any.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// A context with no session; every authorized call will fail fast.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: RwLock::new(Some(session)),
        }
    }

    /// Replace the current session.
    pub async fn establish(&self, session: Session) {
        *self.current.write().await = Some(session);
    }

    /// Drop the session. Returns whether one was held.
    pub async fn invalidate(&self) -> bool {
        let previous = self.current.write().await.take();
        if previous.is_some() {
            tracing::info!("Admin session invalidated");
        }
        previous.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn email(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(|s| s.email.clone())
    }

    pub async fn is_active(&self) -> bool {
        self.current.read().await.is_some()
    }
}
