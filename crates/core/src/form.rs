//! The project submission form and the typed submission it validates into.
//!
//! [`ProjectForm`] holds raw operator input exactly as typed (amounts are
//! still text). The only way to obtain a [`ProjectSubmission`], the value
//! the gateway knows how to put on the wire, is
//! [`ProjectForm::into_submission`], which runs the validator first.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AttachmentError, ValidationError};
use crate::project::{join_categories, Category, CategorySet, Project};
use crate::types::{format_amount, parse_amount, ProjectId};
use crate::validation::validate;

/// Upper bound for either attachment, in bytes (10 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

static DOCUMENTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(pdf|doc|docx|txt|md)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// Which upload slot an attachment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Documentation,
    CodeArchive,
}

impl AttachmentKind {
    /// Multipart field name used by the remote API.
    pub fn field_name(self) -> &'static str {
        match self {
            AttachmentKind::Documentation => "documentation",
            AttachmentKind::CodeArchive => "code_files",
        }
    }
}

/// A file picked for upload together with its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    kind: AttachmentKind,
    file_name: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Accept a file for the given slot, refusing wrong extensions and
    /// anything over [`MAX_ATTACHMENT_BYTES`].
    pub fn new(
        kind: AttachmentKind,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let attachment = Self {
            kind,
            file_name: file_name.into(),
            bytes,
        };
        attachment.check()?;
        Ok(attachment)
    }

    pub fn documentation(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        Self::new(AttachmentKind::Documentation, file_name, bytes)
    }

    pub fn code_archive(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        Self::new(AttachmentKind::CodeArchive, file_name, bytes)
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// Base name of the picked file (directories stripped).
    pub fn file_name(&self) -> &str {
        Path::new(&self.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file_name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Re-check extension and size constraints.
    pub fn check(&self) -> Result<(), AttachmentError> {
        let file_name = self.file_name().to_string();
        match self.kind {
            AttachmentKind::Documentation if !DOCUMENTATION_RE.is_match(&file_name) => {
                return Err(AttachmentError::UnsupportedDocumentation { file_name });
            }
            AttachmentKind::CodeArchive if !file_name.ends_with(".zip") => {
                return Err(AttachmentError::UnsupportedCodeArchive { file_name });
            }
            _ => {}
        }
        if self.size() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                file_name,
                size: self.size(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw operator input for creating or editing a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub categories: CategorySet,
    /// Sale amount as typed; empty means free.
    pub price: String,
    /// List amount as typed; required.
    pub actual_price: String,
    pub documentation: Option<Attachment>,
    pub code_files: Option<Attachment>,
}

impl ProjectForm {
    /// Prefill a form for editing an existing project.
    ///
    /// Attachments start empty: stored files are kept server-side unless a
    /// replacement is picked.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            categories: project.categories.clone(),
            price: format_amount(project.price),
            actual_price: format_amount(project.actual_price),
            documentation: None,
            code_files: None,
        }
    }

    /// Select the category if absent, deselect it if present. Returns
    /// whether it is selected afterwards.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        if self.categories.remove(&category) {
            false
        } else {
            self.categories.insert(category);
            true
        }
    }

    /// Place an attachment into the slot matching its kind.
    pub fn attach(&mut self, attachment: Attachment) {
        match attachment.kind() {
            AttachmentKind::Documentation => self.documentation = Some(attachment),
            AttachmentKind::CodeArchive => self.code_files = Some(attachment),
        }
    }

    /// Validate and convert into a typed submission.
    ///
    /// `id` is `None` for a create and the existing project's id for an
    /// update.
    pub fn into_submission(self, id: Option<ProjectId>) -> Result<ProjectSubmission, ValidationError> {
        validate(&self)?;

        let actual_price = parse_amount(&self.actual_price).ok_or(ValidationError::InvalidActualPrice)?;
        let price = parse_amount(&self.price).unwrap_or(0.0);

        Ok(ProjectSubmission {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            categories: self.categories,
            price,
            actual_price,
            documentation: self.documentation,
            code_files: self.code_files,
        })
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A validated project ready for the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSubmission {
    pub id: Option<ProjectId>,
    pub title: String,
    pub description: String,
    pub categories: CategorySet,
    pub price: f64,
    pub actual_price: f64,
    pub documentation: Option<Attachment>,
    pub code_files: Option<Attachment>,
}

impl ProjectSubmission {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    /// Plain-text form fields in wire order. `id` is present only for
    /// updates, which is how the remote API tells the two apart.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("categories", join_categories(&self.categories)),
            ("price", format_amount(self.price)),
            ("actual_price", format_amount(self.actual_price)),
        ];
        if let Some(id) = &self.id {
            fields.push(("id", id.to_string()));
        }
        fields
    }

    /// Attachments to upload, if any were picked.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.documentation.iter().chain(self.code_files.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProjectForm {
        let mut form = ProjectForm {
            title: "  ML Pipeline ".to_string(),
            description: "Feature store and training loop".to_string(),
            price: "499".to_string(),
            actual_price: "999.5".to_string(),
            ..Default::default()
        };
        form.toggle_category(Category::Python);
        form.toggle_category(Category::Go);
        form
    }

    // -- attachments --------------------------------------------------------

    #[test]
    fn documentation_accepts_listed_extensions_any_case() {
        for name in ["spec.pdf", "notes.DOCX", "readme.md", "a.txt", "b.Doc"] {
            assert!(Attachment::documentation(name, vec![1]).is_ok(), "{name}");
        }
    }

    #[test]
    fn documentation_rejects_other_extensions() {
        let err = Attachment::documentation("slides.pptx", vec![1]).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedDocumentation { .. }));
    }

    #[test]
    fn code_archive_requires_zip() {
        assert!(Attachment::code_archive("src.zip", vec![1]).is_ok());
        let err = Attachment::code_archive("src.tar.gz", vec![1]).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedCodeArchive { .. }));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = vec![0u8; MAX_ATTACHMENT_BYTES as usize];
        assert!(Attachment::code_archive("src.zip", at_limit).is_ok());

        let over = vec![0u8; MAX_ATTACHMENT_BYTES as usize + 1];
        let err = Attachment::code_archive("src.zip", over).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
    }

    #[test]
    fn file_name_strips_directories() {
        let a = Attachment::documentation("/tmp/uploads/guide.pdf", vec![]).unwrap();
        assert_eq!(a.file_name(), "guide.pdf");
    }

    // -- form ---------------------------------------------------------------

    #[test]
    fn toggle_category_adds_then_removes() {
        let mut form = ProjectForm::default();
        assert!(form.toggle_category(Category::DevOps));
        assert!(!form.toggle_category(Category::DevOps));
        assert!(form.categories.is_empty());
    }

    #[test]
    fn attach_routes_by_kind() {
        let mut form = ProjectForm::default();
        form.attach(Attachment::code_archive("src.zip", vec![1]).unwrap());
        form.attach(Attachment::documentation("guide.md", vec![2]).unwrap());
        assert_eq!(form.code_files.as_ref().map(|a| a.file_name()), Some("src.zip"));
        assert_eq!(form.documentation.as_ref().map(|a| a.file_name()), Some("guide.md"));
    }

    #[test]
    fn from_project_prefills_amounts_as_text() {
        let project = Project {
            id: ProjectId::new("7"),
            title: "Chat App".to_string(),
            description: String::new(),
            categories: [Category::React].into_iter().collect(),
            price: 250.0,
            actual_price: 400.5,
            documentation: Some("chat.pdf".to_string()),
            code_files: None,
            created_at: None,
        };
        let form = ProjectForm::from_project(&project);
        assert_eq!(form.price, "250");
        assert_eq!(form.actual_price, "400.5");
        assert!(form.documentation.is_none());
        assert_eq!(form.categories, project.categories);
    }

    // -- submission ---------------------------------------------------------

    #[test]
    fn create_submission_has_no_id_field() {
        let submission = valid_form().into_submission(None).unwrap();
        assert!(!submission.is_update());
        let fields = submission.text_fields();
        assert!(fields.iter().all(|(name, _)| *name != "id"));
        assert!(fields.contains(&("title", "ML Pipeline".to_string())));
        assert!(fields.contains(&("categories", "Python, Go".to_string())));
        assert!(fields.contains(&("price", "499".to_string())));
        assert!(fields.contains(&("actual_price", "999.5".to_string())));
    }

    #[test]
    fn update_submission_carries_id() {
        let submission = valid_form()
            .into_submission(Some(ProjectId::new("12")))
            .unwrap();
        assert!(submission.is_update());
        assert!(submission.text_fields().contains(&("id", "12".to_string())));
    }

    #[test]
    fn empty_price_submits_as_zero() {
        let mut form = valid_form();
        form.price = String::new();
        let submission = form.into_submission(None).unwrap();
        assert_eq!(submission.price, 0.0);
    }

    #[test]
    fn invalid_form_never_becomes_submission() {
        let mut form = valid_form();
        form.actual_price = "100".to_string();
        form.price = "200".to_string();
        assert!(form.into_submission(None).is_err());
    }
}
