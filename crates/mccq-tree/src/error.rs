use thiserror::Error;

/// Why a raw grammar could not be turned into a [`crate::CommandNode`] tree.
///
/// `path` is the slash-joined chain of keys from the root to the offending
/// node (`<root>` for the root itself).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("node `{path}` is missing required field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("node `{path}` has invalid field `{field}`: expected {expected}")]
    InvalidField {
        path: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("node `{path}` declares parser `{parser}` without a `namespace:type` separator")]
    MalformedParser { path: String, parser: String },
}
