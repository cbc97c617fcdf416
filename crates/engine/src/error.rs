use catalog_core::ValidationError;

/// Errors surfaced to the presentation layer by [`CatalogEngine`](crate::CatalogEngine).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The form was refused locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No session is held or the server refused the token. The session has
    /// already been dropped; the operator must log in again.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Any other failure, carrying an operator-facing message. Engine state
    /// is left as it was before the call.
    #[error("{0}")]
    Remote(String),
}

impl EngineError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, EngineError::SessionExpired)
    }
}
