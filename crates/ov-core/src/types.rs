use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::MetaValue;

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    /// Zero-width span at a single position.
    pub fn point(line: usize, column: usize) -> Self {
        Self {
            start: SourceLocation { line, column },
            end: SourceLocation { line, column },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Warning,
    Error,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Outcome of a single structural check, meant for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub message: String,
}

impl ValidationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub properties: BTreeMap<String, MetaValue>,
    pub resources: BTreeMap<String, String>,
}

impl Metadata {
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(MetaValue::as_string)
    }
}

/// Flat page entry produced by the dialect-specific extractors, before the
/// hierarchy is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: String,
    pub title: String,
    pub html_content: String,
    /// Empty means the record is a root.
    pub parent_id: String,
    pub order: i64,
    /// Source position, used as the ordering tie-break.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNode {
    pub id: String,
    pub title: String,
    pub html_content: String,
    pub order: i64,
    pub level: usize,
    pub children: Vec<PageNode>,
}

impl PageNode {
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(PageNode::count).sum::<usize>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestDialect {
    Modern,
    Legacy,
}

impl ManifestDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Legacy => "legacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
    pub dialect: ManifestDialect,
    pub checks: Vec<ValidationResult>,
    pub metadata: Metadata,
    pub pages: Vec<PageNode>,
    pub resource_paths: Vec<String>,
}

impl ManifestReport {
    pub fn page_count(&self) -> usize {
        self.pages.iter().map(PageNode::count).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.checks.iter().any(ValidationResult::is_error)
    }
}
