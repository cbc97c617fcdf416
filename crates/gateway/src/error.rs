/// Errors from the remote catalog API layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No bearer token is held, or the server answered 401/403. Callers
    /// must drop the session and send the operator back to login.
    #[error("Session expired. Please login again.")]
    Unauthorized,

    /// The server answered with `status: "error"` or left out data the
    /// operation needs.
    #[error("{message}")]
    Rejected { message: String },

    /// A non-2xx status without a usable JSON envelope.
    #[error("Catalog API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("Malformed response from catalog API: {0}")]
    Decode(#[from] serde_json::Error),

    /// Login input failed local checks; nothing was sent.
    #[error("{0}")]
    InvalidCredentials(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }

    /// Message suitable for showing to the operator.
    ///
    /// Transport and decoding details are collapsed into `fallback`; the
    /// server's own messages are passed through.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Unauthorized
            | GatewayError::Rejected { .. }
            | GatewayError::InvalidCredentials(_) => self.to_string(),
            GatewayError::Status { .. } | GatewayError::Request(_) | GatewayError::Decode(_) => {
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_passes_through() {
        let err = GatewayError::rejected("Project not found");
        assert_eq!(err.user_message("Delete failed"), "Project not found");
    }

    #[test]
    fn status_error_uses_fallback() {
        let err = GatewayError::Status {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(err.user_message("Failed to load projects"), "Failed to load projects");
    }

    #[test]
    fn unauthorized_is_flagged() {
        assert!(GatewayError::Unauthorized.is_unauthorized());
        assert!(!GatewayError::rejected("nope").is_unauthorized());
    }
}
