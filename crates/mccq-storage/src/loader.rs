//! Raw grammar loaders.
//!
//! A loader turns a list of location components (`[uri, version, "generated",
//! "reports", "commands.json"]`) into decoded JSON. Which loader a registry
//! uses is decided once, from the database URI scheme or an explicit key.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::{LoaderError, RegistryError};

/// Default per-request timeout for [`HttpLoader`].
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub trait DataLoader: Send + Sync {
    fn load(&self, components: &[&str]) -> Result<Value, LoaderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Filesystem,
    Http,
}

impl LoaderKind {
    /// Resolve an explicit loader key (`file`, `http`, `https`).
    pub fn from_key(key: &str) -> Result<Self, RegistryError> {
        match key {
            "file" => Ok(Self::Filesystem),
            "http" | "https" => Ok(Self::Http),
            other => Err(RegistryError::InvalidLoader(other.to_string())),
        }
    }

    /// Pick a loader from the URI scheme; anything unrecognized (including
    /// plain paths and Windows drive letters) falls back to the filesystem.
    pub fn for_uri(uri: &str) -> Self {
        Url::parse(uri)
            .ok()
            .and_then(|url| Self::from_key(url.scheme()).ok())
            .unwrap_or(Self::Filesystem)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Filesystem => "file",
            Self::Http => "http",
        }
    }

    pub fn build(self) -> Result<Box<dyn DataLoader>, RegistryError> {
        let loader: Box<dyn DataLoader> = match self {
            Self::Filesystem => Box::new(FilesystemLoader),
            Self::Http => Box::new(
                HttpLoader::new(HTTP_TIMEOUT)
                    .map_err(|source| RegistryError::LoaderInit { kind: self.key(), source })?,
            ),
        };
        Ok(loader)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemLoader;

impl FilesystemLoader {
    fn path_of(components: &[&str]) -> PathBuf {
        let mut path = PathBuf::new();
        for (i, component) in components.iter().enumerate() {
            if i == 0 && component.starts_with("file:") {
                if let Some(local) = Url::parse(component)
                    .ok()
                    .and_then(|url| url.to_file_path().ok())
                {
                    path.push(local);
                    continue;
                }
            }
            path.push(component);
        }
        path
    }
}

impl DataLoader for FilesystemLoader {
    fn load(&self, components: &[&str]) -> Result<Value, LoaderError> {
        let path = Self::path_of(components);
        let location = path.display().to_string();
        tracing::info!(path = %location, "loading commands from filesystem");

        let text = std::fs::read_to_string(&path).map_err(|source| LoaderError::Io {
            location: location.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoaderError::Json { location, source })
    }
}

pub struct HttpLoader {
    client: reqwest::blocking::Client,
}

impl HttpLoader {
    pub fn new(timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoaderError::Http {
                location: "<client>".to_string(),
                source,
            })?;
        Ok(Self { client })
    }

    fn url_of(components: &[&str]) -> String {
        let mut url = String::new();
        for (i, component) in components.iter().enumerate() {
            if i == 0 {
                url.push_str(component.trim_end_matches('/'));
            } else {
                url.push('/');
                url.push_str(component.trim_matches('/'));
            }
        }
        url
    }
}

impl DataLoader for HttpLoader {
    fn load(&self, components: &[&str]) -> Result<Value, LoaderError> {
        let location = Self::url_of(components);
        tracing::info!(url = %location, "loading commands from network");

        let http_err = |source: reqwest::Error| LoaderError::Http {
            location: location.clone(),
            source,
        };
        let text = self
            .client
            .get(&location)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(http_err)?;
        serde_json::from_str(&text).map_err(|source| LoaderError::Json { location, source })
    }
}
