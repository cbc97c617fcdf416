//! Remote catalog gateway.
//!
//! Typed access to the admin console's REST API: the [`CatalogGateway`]
//! seam the state engine is written against, a [`reqwest`]-backed
//! implementation of it, the explicit [`SessionContext`] holding the bearer
//! token, and the authentication and insight endpoints that sit next to
//! the catalog.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod insights;
pub mod session;
pub mod wire;

pub use api::HttpCatalogGateway;
pub use auth::Credentials;
pub use catalog::{Acknowledgement, CatalogGateway, ProjectPage, SubmitReceipt};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use session::{Session, SessionContext};
