//! Admin login and logout.
//!
//! Login input is checked locally with [`validator`] before anything is
//! sent. A successful login establishes the session on the gateway's
//! [`SessionContext`](crate::SessionContext); logout always clears it, even
//! when the server cannot be reached.

use reqwest::header::ACCEPT;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::api::HttpCatalogGateway;
use crate::error::GatewayError;
use crate::session::Session;

/// Email/password pair submitted to the login endpoint.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Run the local checks, reporting the first failing field (email
    /// before password).
    pub fn check(&self) -> Result<(), GatewayError> {
        self.validate()
            .map_err(|errors| GatewayError::InvalidCredentials(first_violation(&errors)))
    }
}

fn first_violation(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["email", "password"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|violations| violations.iter())
        .find_map(|v| v.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid credentials".to_string())
}

impl HttpCatalogGateway {
    /// Log in and establish the session.
    ///
    /// Any refusal from the server, including a 401, is reported as
    /// [`GatewayError::Rejected`] carrying the server's message.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError> {
        credentials.check()?;

        let response = self
            .client()
            .post(self.config().url(&self.config().login_endpoint))
            .header(ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await?;

        let envelope = Self::read_envelope(response, "Invalid credentials")
            .await
            .map_err(|e| match e {
                GatewayError::Unauthorized => GatewayError::rejected("Invalid credentials"),
                other => other,
            })?;

        let token = envelope
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GatewayError::rejected("Login response did not include a session token"))?;

        let session = Session::new(token).with_email(credentials.email.clone());
        self.session().establish(session.clone()).await;

        tracing::info!(email = %credentials.email, "Admin logged in");
        Ok(session)
    }

    /// Log out. Server-side failures are logged and otherwise ignored; the
    /// local session is always dropped.
    pub async fn logout(&self) {
        if let Some(token) = self.session().token().await {
            let result = self
                .client()
                .get(self.config().url(&self.config().auth_endpoint))
                .query(&[("logout", "true")])
                .bearer_auth(token)
                .header(ACCEPT, "application/json")
                .send()
                .await;

            match result {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = response.status().as_u16(), "Logout request refused");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Logout request failed"),
            }
        }

        self.session().invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_credentials_pass() {
        assert!(Credentials::new("admin@example.com", "hunter2").check().is_ok());
    }

    #[test]
    fn bad_email_reported_first() {
        let err = Credentials::new("not-an-email", "").check().unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid email address");
    }

    #[test]
    fn empty_password_rejected() {
        let err = Credentials::new("admin@example.com", "").check().unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn email_is_trimmed() {
        let c = Credentials::new("  admin@example.com ", "x");
        assert_eq!(c.email, "admin@example.com");
    }
}
