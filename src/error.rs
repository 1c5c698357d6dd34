use thiserror::Error;

/// Failures while compiling a schema into a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The prepared schema nests deeper than the builder allows.
    #[error("schema nesting exceeds {limit} levels at `{path}`")]
    DepthExceeded { path: String, limit: usize },

    /// An array leaf has no stringification method, neither on the prepared
    /// node nor at index 0 of the matching array in the original schema.
    #[error("no array stringification method for `{path}`")]
    MissingArrayMethod { path: String },
}

/// Failures while writing through a [`crate::accessor::PathAccessor`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("cannot descend into non-object value at `{path}`")]
    NotAnObject { path: String },

    #[error("plan has {expected} descriptors but {actual} values were given")]
    ArityMismatch { expected: usize, actual: usize },
}

/// Failures while loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },

    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Render a property path the way error messages show it (`a.b.c`, `<root>`).
pub(crate) fn display_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "<root>".to_string()
    } else {
        segments.join(".")
    }
}
