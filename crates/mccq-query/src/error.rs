use mccq_storage::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("argument parser failed to process command `{command}`: {message}")]
    ArgumentParserFailed { command: String, message: String },

    #[error("no versions requested")]
    NoVersionRequested,

    #[error("none of the requested versions are available: {}", requested.join(", "))]
    NoVersionsAvailable { requested: Vec<String> },

    #[error("version {version} is not available")]
    NoSuchVersion {
        version: String,
        #[source]
        source: RegistryError,
    },

    #[error("no command was provided")]
    MissingCommand,

    #[error("command does not exist: {0}")]
    NoSuchCommand(String),

    #[error("invalid pattern `{token}`")]
    InvalidPattern {
        token: String,
        #[source]
        source: regex::Error,
    },
}
