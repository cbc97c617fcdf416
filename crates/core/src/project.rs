//! The catalog's project record and its category enumeration.
//!
//! Categories travel over the wire as a single comma-joined string
//! (`"Python, Go"`). Locally they are a set ordered by the enumeration's
//! display order, so serialization is deterministic regardless of the
//! order in which they were selected.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, Timestamp};

/// Separator used when joining categories for the wire.
pub const CATEGORY_SEPARATOR: &str = ", ";

/// Selected categories of a project, in enumeration order.
pub type CategorySet = BTreeSet<Category>;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A language, framework, or topic a project can be filed under.
///
/// Variant order is the display order and therefore the serialization
/// order of a [`CategorySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Python,
    JavaScript,
    Java,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Go,
    Swift,
    Kotlin,
    TypeScript,
    React,
    VueJs,
    Angular,
    NodeJs,
    Django,
    Flask,
    Laravel,
    SpringBoot,
    AspNet,
    MachineLearning,
    DataScience,
    WebDevelopment,
    MobileDevelopment,
    GameDevelopment,
    DevOps,
    Cybersecurity,
    Blockchain,
    IoT,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 30] = [
        Category::Python,
        Category::JavaScript,
        Category::Java,
        Category::Cpp,
        Category::CSharp,
        Category::Php,
        Category::Ruby,
        Category::Go,
        Category::Swift,
        Category::Kotlin,
        Category::TypeScript,
        Category::React,
        Category::VueJs,
        Category::Angular,
        Category::NodeJs,
        Category::Django,
        Category::Flask,
        Category::Laravel,
        Category::SpringBoot,
        Category::AspNet,
        Category::MachineLearning,
        Category::DataScience,
        Category::WebDevelopment,
        Category::MobileDevelopment,
        Category::GameDevelopment,
        Category::DevOps,
        Category::Cybersecurity,
        Category::Blockchain,
        Category::IoT,
        Category::Other,
    ];

    /// The label stored by the remote API.
    pub fn label(self) -> &'static str {
        match self {
            Category::Python => "Python",
            Category::JavaScript => "JavaScript",
            Category::Java => "Java",
            Category::Cpp => "C++",
            Category::CSharp => "C#",
            Category::Php => "PHP",
            Category::Ruby => "Ruby",
            Category::Go => "Go",
            Category::Swift => "Swift",
            Category::Kotlin => "Kotlin",
            Category::TypeScript => "TypeScript",
            Category::React => "React",
            Category::VueJs => "Vue.js",
            Category::Angular => "Angular",
            Category::NodeJs => "Node.js",
            Category::Django => "Django",
            Category::Flask => "Flask",
            Category::Laravel => "Laravel",
            Category::SpringBoot => "Spring Boot",
            Category::AspNet => "ASP.NET",
            Category::MachineLearning => "Machine Learning",
            Category::DataScience => "Data Science",
            Category::WebDevelopment => "Web Development",
            Category::MobileDevelopment => "Mobile Development",
            Category::GameDevelopment => "Game Development",
            Category::DevOps => "DevOps",
            Category::Cybersecurity => "Cybersecurity",
            Category::Blockchain => "Blockchain",
            Category::IoT => "IoT",
            Category::Other => "Other",
        }
    }

    /// Look up a category by its label. Matching ignores surrounding
    /// whitespace and ASCII case.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Split a comma-joined category string into a set.
///
/// Segments are trimmed and empty segments dropped. Labels outside the
/// enumeration are skipped with a warning.
///
/// # Examples
///
/// ```
/// use catalog_core::project::{parse_categories, Category};
///
/// let set = parse_categories("Python, Go,,");
/// assert!(set.contains(&Category::Python));
/// assert!(set.contains(&Category::Go));
/// assert_eq!(set.len(), 2);
/// ```
pub fn parse_categories(raw: &str) -> CategorySet {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let parsed = Category::from_label(segment);
            if parsed.is_none() {
                tracing::warn!(label = %segment, "Dropping unknown category label");
            }
            parsed
        })
        .collect()
}

/// Join a category set into the wire representation (`"Python, Go"`).
pub fn join_categories(categories: &CategorySet) -> String {
    categories
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR)
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A sellable project as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub categories: CategorySet,
    /// Sale amount.
    pub price: f64,
    /// List amount; never below `price` for anything this client submitted.
    pub actual_price: f64,
    /// Server-stored documentation filename.
    pub documentation: Option<String>,
    /// Server-stored code archive filename.
    pub code_files: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl Project {
    /// Categories rendered the way they are stored remotely.
    pub fn category_label(&self) -> String {
        join_categories(&self.categories)
    }
}
