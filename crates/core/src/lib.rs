//! Core domain logic for the project catalog admin console.
//!
//! Everything in this crate is pure: the project model and its wire-level
//! category encoding, the submission form and its validator, the
//! pagination controller, the client-side search filter, and the customer
//! order ledger. Network access lives in `catalog-gateway`; stateful
//! reconciliation lives in `catalog-engine`.

pub mod customers;
pub mod error;
pub mod form;
pub mod pagination;
pub mod project;
pub mod search;
pub mod types;
pub mod validation;

pub use error::{AttachmentError, ValidationError};
pub use form::{Attachment, AttachmentKind, ProjectForm, ProjectSubmission};
pub use pagination::{PaginationController, PaginationState, PAGE_SIZE};
pub use project::{Category, CategorySet, Project};
pub use types::ProjectId;
