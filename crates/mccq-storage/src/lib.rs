//! mccq version registry
//!
//! Supplies built command trees per game version:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      VERSION REGISTRY                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  get("1.13") ──► cache hit? ──yes──► Arc<CommandNode>        │
//! │                      │                                       │
//! │                      no                                      │
//! │                      ▼                                       │
//! │   whitelist ──► loader (file/http) ──► parser (v1) ──► put   │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Lazy**: a version is loaded and built on first access only
//! - **All-or-nothing**: failed loads/builds never leave a cache entry
//! - **Whitelisted**: an optional whitelist gates which versions may be cached
//! - **Reloadable**: `reload` drops every cached tree at once

pub mod error;
pub mod loader;


use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use mccq_tree::{BuildError, CommandNode};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::{LoaderError, RegistryError};
pub use loader::{DataLoader, FilesystemLoader, HttpLoader, LoaderKind};

/// Location of the grammar report inside a version directory.
pub const DATA_FILE_TAIL: [&str; 3] = ["generated", "reports", "commands.json"];

// ============================================================================
// Parsers
// ============================================================================

/// Grammar dialects this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserKind {
    /// Every report format since the 1.13 snapshots.
    #[default]
    V1,
}

impl ParserKind {
    pub fn key(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }

    pub fn build(self, raw: &Value) -> Result<CommandNode, BuildError> {
        match self {
            Self::V1 => mccq_tree::build_v1(raw),
        }
    }
}

impl FromStr for ParserKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            other => Err(RegistryError::InvalidParser(other.to_string())),
        }
    }
}

// ============================================================================
// Registry Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Where version directories live (`/path/to/versions`, `https://...`).
    pub uri: String,
    /// Force a loader key instead of choosing one by URI scheme.
    pub loader: Option<String>,
    /// Grammar dialect key.
    pub parser: String,
    /// If non-empty, only these versions may be cached.
    pub whitelist: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            uri: ".".to_string(),
            loader: None,
            parser: ParserKind::default().key().to_string(),
            whitelist: Vec::new(),
        }
    }
}

// ============================================================================
// Version Registry
// ============================================================================

pub struct VersionRegistry {
    uri: String,
    loader: Box<dyn DataLoader>,
    parser: ParserKind,
    whitelist: Vec<String>,
    /// The only shared mutable state; readers clone out an `Arc`.
    cache: RwLock<Cache>,
}

/// Cached roots plus the number of reloads seen so far.
///
/// A load started under one generation is only cached if no reload
/// happened before it finished.
#[derive(Default)]
struct Cache {
    generation: u64,
    roots: HashMap<String, Arc<CommandNode>>,
}

impl std::fmt::Debug for VersionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionRegistry")
            .field("uri", &self.uri)
            .field("parser", &self.parser)
            .field("whitelist", &self.whitelist)
            .field("cached", &self.cached_versions())
            .finish()
    }
}

impl VersionRegistry {
    /// Resolve loader and parser keys and create an empty registry.
    ///
    /// Unknown keys fail here rather than on first access.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let kind = match config.loader.as_deref() {
            Some(key) => LoaderKind::from_key(key)?,
            None => LoaderKind::for_uri(&config.uri),
        };
        let parser = config.parser.parse::<ParserKind>()?;
        tracing::debug!(
            uri = %config.uri,
            loader = kind.key(),
            parser = parser.key(),
            "creating version registry"
        );
        Ok(Self::with_loader(
            config.uri,
            kind.build()?,
            parser,
            config.whitelist,
        ))
    }

    /// Create a registry around a caller-supplied loader.
    pub fn with_loader(
        uri: impl Into<String>,
        loader: Box<dyn DataLoader>,
        parser: ParserKind,
        whitelist: Vec<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            loader,
            parser,
            whitelist,
            cache: RwLock::new(Cache::default()),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn is_whitelisted(&self, version: &str) -> bool {
        self.whitelist.is_empty() || self.whitelist.iter().any(|v| v == version)
    }

    /// Root of `version`'s tree, loading and building it on first access.
    pub fn get(&self, version: &str) -> Result<Arc<CommandNode>, RegistryError> {
        tracing::debug!(version, "getting root node");
        let generation = {
            let cache = self.cache.read();
            if let Some(root) = cache.roots.get(version) {
                return Ok(Arc::clone(root));
            }
            cache.generation
        };

        if !self.is_whitelisted(version) {
            return Err(RegistryError::VersionNotWhitelisted(version.to_string()));
        }

        tracing::info!(version, "loading version into cache");
        let root = Arc::new(self.load(version)?);

        let mut cache = self.cache.write();
        if cache.generation != generation {
            tracing::debug!(version, "cache reloaded during load, not caching");
            return Ok(root);
        }
        // Another caller may have filled the slot meanwhile; keep theirs.
        let cached = cache.roots.entry(version.to_string()).or_insert(root);
        Ok(Arc::clone(cached))
    }

    /// Insert a built tree for `version`, replacing any cached one.
    pub fn put(&self, version: &str, root: CommandNode) -> Result<(), RegistryError> {
        if !self.is_whitelisted(version) {
            return Err(RegistryError::VersionNotWhitelisted(version.to_string()));
        }
        self.cache
            .write()
            .roots
            .insert(version.to_string(), Arc::new(root));
        Ok(())
    }

    /// Drop every cached tree; the next `get` rebuilds from source.
    pub fn reload(&self) {
        let mut cache = self.cache.write();
        cache.generation += 1;
        let dropped = std::mem::take(&mut cache.roots);
        tracing::info!(
            versions = dropped.len(),
            generation = cache.generation,
            "cleared version cache"
        );
    }

    /// `requested` restricted to whitelisted versions, in requested order.
    pub fn filter_versions(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|v| self.is_whitelisted(v))
            .cloned()
            .collect()
    }

    /// Currently cached versions, sorted.
    pub fn cached_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.cache.read().roots.keys().cloned().collect();
        versions.sort();
        versions
    }

    fn load(&self, version: &str) -> Result<CommandNode, RegistryError> {
        let mut components: Vec<&str> = vec![self.uri.as_str(), version];
        components.extend(DATA_FILE_TAIL);

        tracing::info!(version, ?components, "loading commands");

        let raw = self
            .loader
            .load(&components)
            .map_err(|source| RegistryError::LoaderFailure {
                version: version.to_string(),
                source,
            })?;

        self.parser
            .build(&raw)
            .map_err(|source| RegistryError::ParserFailure {
                version: version.to_string(),
                source,
            })
    }
}
