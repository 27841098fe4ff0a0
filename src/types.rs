use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many leading scalar columns precede the details column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout { scalar_fields: usize }

#[derive(Debug, Error)]
#[error("unsupported layout: {0} scalar fields (expected 4 or 5)")]
pub struct LayoutError(pub usize);

impl Layout {
    pub const FOUR: Layout = Layout { scalar_fields: 4 };
    pub const FIVE: Layout = Layout { scalar_fields: 5 };

    pub fn new(scalar_fields: usize) -> Result<Self, LayoutError> {
        match scalar_fields {
            4 => Ok(Self::FOUR),
            5 => Ok(Self::FIVE),
            n => Err(LayoutError(n)),
        }
    }

    pub fn scalar_fields(&self) -> usize { self.scalar_fields }
}

impl Default for Layout {
    fn default() -> Self { Self::FOUR }
}

/// The configuration column of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Details {
    Parsed(serde_json::Value),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Scalar columns in header order; `None` when the cell was absent or empty.
    pub fields: Vec<(String, Option<String>)>,
    pub details: Details,
    /// 1-based line number in the source text.
    pub line: usize,
}

pub const UNKNOWN_KEY: &str = "unknown";

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).and_then(|(_, v)| v.as_deref())
    }

    fn nth(&self, idx: usize) -> &str {
        self.fields.get(idx).and_then(|(_, v)| v.as_deref()).unwrap_or(UNKNOWN_KEY)
    }

    /// First scalar column.
    pub fn website(&self) -> &str { self.nth(0) }

    /// Second scalar column.
    pub fn record_id(&self) -> &str { self.nth(1) }
}

/// Non-fatal problem found while parsing a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic { pub line: usize, pub message: String }

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecords {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    CurrentUrlReference,
    UnsupportedElifTag,
    UnsupportedSetTag,
    FilterSyntaxError,
    Other,
}

impl FailureCategory {
    pub const ALL: [FailureCategory; 5] = [
        FailureCategory::CurrentUrlReference,
        FailureCategory::UnsupportedElifTag,
        FailureCategory::UnsupportedSetTag,
        FailureCategory::FilterSyntaxError,
        FailureCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::CurrentUrlReference => "$currentUrl reference",
            FailureCategory::UnsupportedElifTag => "unsupported elif tag",
            FailureCategory::UnsupportedSetTag => "unsupported set tag",
            FailureCategory::FilterSyntaxError => "filter syntax error",
            FailureCategory::Other => "other",
        }
    }
}

/// Result of one render attempt. Engine B failures carry no category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { category: Option<FailureCategory>, message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool { matches!(self, Outcome::Success) }
}
