use mccq_tree::BuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{location} is not valid JSON: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("loader not recognized: {0}")]
    InvalidLoader(String),

    #[error("parser not recognized: {0}")]
    InvalidParser(String),

    #[error("failed to initialize the {kind} loader")]
    LoaderInit {
        kind: &'static str,
        #[source]
        source: LoaderError,
    },

    #[error("failed to load data for version {version}")]
    LoaderFailure {
        version: String,
        #[source]
        source: LoaderError,
    },

    #[error("failed to parse commands for version {version}")]
    ParserFailure {
        version: String,
        #[source]
        source: BuildError,
    },

    #[error("version {0} is not whitelisted")]
    VersionNotWhitelisted(String),
}
