use crate::types::SourceSpan;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct OdeError {
    pub code: String,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl OdeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(
        code: impl Into<String>,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn too_deep(max_depth: usize) -> Self {
        Self::new(
            "MANIFEST_TOO_DEEP",
            format!("manifest too deeply nested (limit is {} levels).", max_depth),
        )
    }
}
