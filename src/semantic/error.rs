use thiserror::Error;

use crate::source::SourceSpan;

/// Fatal lowering errors.
///
/// Only an inconsistent tree shape aborts a run; unsupported grammar is
/// reported through the diagnostic engine instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    /// A step required one descriptor variant and found another.
    #[error("inconsistent declarator shape at {location}: expected {expected} descriptor, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
        location: SourceSpan,
    },
}

impl LowerError {
    pub fn location(&self) -> SourceSpan {
        match self {
            LowerError::ShapeMismatch { location, .. } => *location,
        }
    }
}
