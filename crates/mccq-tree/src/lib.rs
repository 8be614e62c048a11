//! Command grammar trees for mccq.
//!
//! The server exports its command grammar as a nested description of literal
//! tokens, typed arguments, executability flags and redirects. This crate
//! decodes that description ([`raw`]) and annotates it into an immutable
//! [`CommandNode`] tree ([`builder_v1`]) carrying everything a query needs to
//! render signatures: relevance, population, and both literal and collapsed
//! renderings in typed and untyped form.

pub mod builder_v1;
pub mod error;
pub mod node;
pub mod raw;

pub use builder_v1::build_v1;
pub use error::BuildError;
pub use node::{CommandNode, Leaves, TreeShape};
pub use raw::{NodeKind, RawNode};
