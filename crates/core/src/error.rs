/// Reasons a project form is refused before anything is sent.
///
/// Display strings are user-facing and shown verbatim by the console.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Please select at least one category")]
    CategoryRequired,

    #[error("Actual price is required")]
    ActualPriceRequired,

    #[error("Actual price must be a non-negative number")]
    InvalidActualPrice,

    #[error("Actual price must be greater than or equal to price")]
    ActualPriceBelowPrice { price: f64, actual_price: f64 },

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Reasons an attachment is refused at selection time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("Please upload a PDF, DOC, DOCX, TXT, or MD file for documentation")]
    UnsupportedDocumentation { file_name: String },

    #[error("Please upload a ZIP file for code files")]
    UnsupportedCodeArchive { file_name: String },

    #[error("File size should be less than 10MB")]
    TooLarge { file_name: String, size: u64 },
}
