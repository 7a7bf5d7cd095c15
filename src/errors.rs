// src/errors.rs
//! Engine errors.
//!
//! There is exactly one fatal kind: a non-absent source whose shape the
//! classifier does not recognize. Everything else that can go wrong inside a
//! traversal originates from caller-supplied closures and propagates as-is.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum IterationError {
    /// The source value is not a recognized container kind. Any partial
    /// mutation already made to a caller-supplied accumulator is kept.
    #[error("unsupported source type: {type_name}")]
    #[diagnostic(
        code(comprehend::unsupported_source_type),
        help("sources must be a list, record, map, set, sequence, or absent")
    )]
    UnsupportedSourceType { type_name: &'static str },
}

impl IterationError {
    pub fn unsupported(type_name: &'static str) -> Self {
        tracing::trace!(type_name, "IterationError::unsupported");
        Self::UnsupportedSourceType { type_name }
    }
}
