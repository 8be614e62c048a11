//! Query evaluation against a version registry.

use mccq_storage::VersionRegistry;
use mccq_tree::{CommandNode, TreeShape};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::args::QueryArguments;
use crate::error::QueryError;
use crate::render::render_into;
use crate::search::{compile_tokens, match_tree, ResultNode, TokenMatcher};

/// Rendered lines for one version. Never empty when returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResults {
    pub version: String,
    pub lines: Vec<String>,
}

#[derive(Debug)]
pub struct QueryEngine {
    registry: VersionRegistry,
    /// Versions used when a query names none.
    show_versions: RwLock<Vec<String>>,
}

impl QueryEngine {
    pub fn new(registry: VersionRegistry, show_versions: Vec<String>) -> Self {
        Self {
            registry,
            show_versions: RwLock::new(show_versions),
        }
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    pub fn show_versions(&self) -> Vec<String> {
        self.show_versions.read().clone()
    }

    pub fn set_show_versions(&self, versions: Vec<String>) {
        tracing::debug!(?versions, "setting default versions");
        *self.show_versions.write() = versions;
    }

    pub fn parse_query_arguments(line: &str) -> Result<QueryArguments, QueryError> {
        QueryArguments::parse_line(line)
    }

    /// Requested versions that the registry will serve, in requested order.
    ///
    /// A version named twice counts once, at its first position.
    pub fn filter_versions(&self, args: &QueryArguments) -> Result<Vec<String>, QueryError> {
        let mut requested = if args.versions.is_empty() {
            self.show_versions()
        } else {
            args.versions.clone()
        };
        let mut seen = HashSet::new();
        requested.retain(|version| seen.insert(version.clone()));

        if requested.is_empty() {
            return Err(QueryError::NoVersionRequested);
        }

        let filtered = self.registry.filter_versions(&requested);
        if filtered.is_empty() {
            return Err(QueryError::NoVersionsAvailable { requested });
        }
        Ok(filtered)
    }

    fn root(&self, version: &str) -> Result<Arc<CommandNode>, QueryError> {
        self.registry
            .get(version)
            .map_err(|source| QueryError::NoSuchVersion {
                version: version.to_string(),
                source,
            })
    }

    /// Run the search phase for `version` and hand the result tree to `visit`.
    ///
    /// `visit` receives `None` when nothing matched.
    pub fn query_tree_for_version<R>(
        &self,
        version: &str,
        args: &QueryArguments,
        visit: impl FnOnce(Option<&ResultNode<'_>>) -> R,
    ) -> Result<R, QueryError> {
        let root = self.root(version)?;
        let matchers = compile_tokens(&args.tokens)?;
        let tree = match_tree(&root, &matchers, 0);
        Ok(visit(tree.as_ref()))
    }

    /// Every line `args` produces for a single version.
    pub fn commands_for_version(
        &self,
        version: &str,
        args: &QueryArguments,
    ) -> Result<Vec<String>, QueryError> {
        let matchers = compile_tokens(&args.tokens)?;
        self.commands_with(version, args, &matchers)
    }

    fn commands_with(
        &self,
        version: &str,
        args: &QueryArguments,
        matchers: &[TokenMatcher],
    ) -> Result<Vec<String>, QueryError> {
        let root = self.root(version)?;

        let (Some(base), Some(base_matcher)) = (args.tokens.first(), matchers.first()) else {
            return Err(QueryError::MissingCommand);
        };
        if !root.children.iter().any(|c| base_matcher.matches(c.key())) {
            return Err(QueryError::NoSuchCommand(base.clone()));
        }

        let mut lines = Vec::new();
        if let Some(tree) = match_tree(&root, matchers, 0) {
            for leaf in tree.leaves() {
                render_into(leaf.node(), args, &mut lines);
            }
        }
        tracing::debug!(version, lines = lines.len(), "rendered query");
        Ok(lines)
    }

    /// Evaluate `args` across every selected version.
    ///
    /// With one selected version its errors propagate. With several, a
    /// failing version is skipped so the others still report. Versions
    /// without lines are left out either way.
    pub fn results_from_arguments(
        &self,
        args: &QueryArguments,
    ) -> Result<Vec<VersionResults>, QueryError> {
        let versions = self.filter_versions(args)?;
        if args.tokens.is_empty() {
            return Err(QueryError::MissingCommand);
        }
        let matchers = compile_tokens(&args.tokens)?;

        let mut results = Vec::with_capacity(versions.len());
        let single = versions.len() == 1;
        for version in versions {
            let lines = match self.commands_with(&version, args, &matchers) {
                Ok(lines) => lines,
                Err(err) if single => return Err(err),
                Err(err) => {
                    tracing::warn!(version = %version, error = %err, "skipping version");
                    continue;
                }
            };
            if !lines.is_empty() {
                results.push(VersionResults { version, lines });
            }
        }
        Ok(results)
    }

    /// Parse and evaluate a raw query line.
    pub fn results(&self, line: &str) -> Result<Vec<VersionResults>, QueryError> {
        tracing::debug!(query = line, "running query");
        self.results_from_arguments(&Self::parse_query_arguments(line)?)
    }

    /// Candidate keys for the word being typed at the end of `line`.
    ///
    /// The line is queried with `.*` appended, so a partial last word
    /// completes itself and a trailing space completes the next position.
    /// Any failure yields no candidates.
    pub fn completions(&self, line: &str) -> Vec<String> {
        let Ok(args) = Self::parse_query_arguments(&format!("{line}.*")) else {
            return Vec::new();
        };
        let Ok(versions) = self.filter_versions(&args) else {
            return Vec::new();
        };

        let mut keys: Vec<String> = versions
            .iter()
            .filter_map(|version| {
                self.query_tree_for_version(version, &args, |tree| {
                    tree.map(|tree| {
                        tree.leaves()
                            .map(|leaf| leaf.node().key().to_string())
                            .collect::<Vec<_>>()
                    })
                })
                .ok()
                .flatten()
            })
            .flatten()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}
