use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InfoError>;

/// Failures surfaced while resolving a single class.
///
/// A missing class resource is deliberately *not* an error: many referenced
/// types (optional framework classes, for instance) are absent in a given
/// deployment, and the cache answers for them with an artificial descriptor
/// instead. Every error here is scoped to the one name being resolved; the
/// cache stays usable for other names afterwards.
#[derive(Debug, Error)]
pub enum InfoError {
    #[error("failed to open class resource `{resource}` for `{class}`")]
    StreamOpen {
        class: String,
        resource: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to close class resource `{resource}` for `{class}`")]
    StreamClose {
        class: String,
        resource: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed class data for `{class}`: {message}")]
    MalformedClass { class: String, message: String },

    #[error("scanned resource for `{expected}` defines `{found}`")]
    ClassNameMismatch { expected: String, found: String },

    #[error("failed to open class source")]
    SourceOpen {
        #[source]
        source: io::Error,
    },

    #[error("failed to close class source")]
    SourceClose {
        #[source]
        source: io::Error,
    },

    #[error("info store is not open")]
    StoreClosed,
}
