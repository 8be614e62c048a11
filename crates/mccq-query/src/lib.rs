//! Command signature queries for mccq.
//!
//! A query is a sequence of tokens, one per position in the command path.
//! Each token is a case-insensitive regex that must match a child key in
//! full; the single token `.` matches any key without being compiled.
//!
//! Evaluation runs in two phases:
//!
//! 1. **search** ([`search::match_tree`]) narrows a built tree to the paths
//!    whose keys match the tokens, producing a [`ResultNode`] tree that only
//!    borrows the underlying [`mccq_tree::CommandNode`]s;
//! 2. **render** ([`render::render_from`]) walks each search leaf and decides,
//!    per node, whether to expand its subtree or collapse it into a summary.
//!
//! [`QueryEngine`] wires both phases to a [`mccq_storage::VersionRegistry`]
//! and aggregates results across versions.
//!
//! ```text
//! "tag . add -t -v 1.13"
//!         │ parse_query_arguments
//!         ▼
//!   QueryArguments ──► filter_versions ──► for each version:
//!                                            registry.get ─► match_tree ─► render_from
//!                                                                                │
//!                                         Vec<VersionResults> ◄──────────────────┘
//! ```

pub mod args;
pub mod engine;
pub mod error;
pub mod render;
pub mod search;

pub use args::{split_command_line, QueryArguments, DEFAULT_CAPACITY};
pub use engine::{QueryEngine, VersionResults};
pub use error::QueryError;
pub use render::render_from;
pub use search::{compile_tokens, match_tree, ResultNode, TokenMatcher, WILDCARD};
