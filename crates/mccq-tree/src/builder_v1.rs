//! Grammar dialect `v1`: the command report format written by the server's
//! data generator (`generated/reports/commands.json`) since 1.13.
//!
//! The build is a single bottom-up pass. Each node gets its own fragment from
//! its kind, appends redirect markers, extends the parent's signature, then
//! builds its children and derives population and summaries from them.
//!
//! Fragments per kind:
//!
//! | kind       | untyped    | typed          |
//! |------------|------------|----------------|
//! | `root`     | (none)     | (none)         |
//! | `literal`  | `key`      | `key`          |
//! | `argument` | `<key>`    | `<key: TYPE>`  |
//! | other      | `key*`     | `key*`         |
//!
//! `TYPE` is whatever follows the first `:` of the declared parser id, so
//! `brigadier:string` renders as `<key: string>`.

use serde_json::Value;

use crate::error::BuildError;
use crate::node::CommandNode;
use crate::raw::{NodeKind, RawNode, ROOT_PATH};

/// Marker between a node's fragment and its redirect targets.
pub const REDIRECT_MARKER: &str = "->";
/// Redirect target shown for nodes that continue into an arbitrary command.
pub const CHAIN_ANY: &str = "*";
/// Appended to a summary when some alternative has further children.
pub const CONTINUATION: &str = "...";

/// Build an annotated tree from a raw `v1` grammar.
pub fn build_v1(value: &Value) -> Result<CommandNode, BuildError> {
    let raw = RawNode::from_value(value)?;
    build_raw_v1(&raw)
}

/// Build an annotated tree from an already-decoded grammar.
pub fn build_raw_v1(raw: &RawNode) -> Result<CommandNode, BuildError> {
    build_node(None, raw, "", "", ROOT_PATH)
}

/// The node's own (untyped, typed) fragment, before redirect markers.
fn fragment(key: &str, kind: &NodeKind, path: &str) -> Result<Option<(String, String)>, BuildError> {
    Ok(match kind {
        NodeKind::Root => None,
        NodeKind::Literal => Some((key.to_string(), key.to_string())),
        NodeKind::Argument { parser } => {
            let (_namespace, ty) =
                parser
                    .split_once(':')
                    .ok_or_else(|| BuildError::MalformedParser {
                        path: path.to_string(),
                        parser: parser.clone(),
                    })?;
            Some((format!("<{key}>"), format!("<{key}: {ty}>")))
        }
        NodeKind::Other(_) => {
            let starred = format!("{key}*");
            Some((starred.clone(), starred))
        }
    })
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .copied()
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_node(
    key: Option<&str>,
    raw: &RawNode,
    parent_command: &str,
    parent_command_t: &str,
    path: &str,
) -> Result<CommandNode, BuildError> {
    let own = fragment(key.unwrap_or(""), &raw.kind, path)?;
    let (argument, argument_t) = match &own {
        Some((a, a_t)) => (Some(a.clone()), Some(a_t.clone())),
        None => (None, None),
    };

    let mut relevant = raw.executable;
    let mut suffix: Option<String> = None;

    if raw.has_redirect() {
        suffix = Some(format!("{REDIRECT_MARKER} {}", raw.redirect.join("|")));
        relevant = true;
    }

    // A terminal that is neither executable nor redirected continues into an
    // arbitrary command at runtime (`execute run`).
    if !raw.executable && !raw.has_redirect() && raw.children.is_empty() {
        suffix = Some(format!("{REDIRECT_MARKER} {CHAIN_ANY}"));
        relevant = true;
    }

    let suffix = suffix.as_deref().unwrap_or("");
    let command = join_words(&[
        parent_command,
        argument.as_deref().unwrap_or(""),
        suffix,
    ]);
    // The typed signature carries the suffix too, so `-t` still shows where
    // a command redirects (`execute run -> *` rather than `execute run`).
    let command_t = join_words(&[
        parent_command_t,
        argument_t.as_deref().unwrap_or(""),
        suffix,
    ]);

    let mut children = Vec::with_capacity(raw.children.len());
    for (child_key, child) in &raw.children {
        let child_path = if path == ROOT_PATH {
            child_key.clone()
        } else {
            format!("{path}/{child_key}")
        };
        children.push(build_node(
            Some(child_key),
            child,
            &command,
            &command_t,
            &child_path,
        )?);
    }

    let population =
        usize::from(relevant) + children.iter().map(|c| c.population).sum::<usize>();

    let (collapsed, collapsed_t) = if children.is_empty() {
        (None, None)
    } else {
        let alternation = children
            .iter()
            .filter_map(|c| c.argument.as_deref())
            .collect::<Vec<_>>()
            .join("|");
        let alternation_t = children
            .iter()
            .filter_map(|c| c.argument_t.as_deref())
            .collect::<Vec<_>>()
            .join("|");
        let more = if children.iter().any(|c| !c.children.is_empty()) {
            CONTINUATION
        } else {
            ""
        };
        (
            Some(join_words(&[&command, &alternation, more])),
            Some(join_words(&[&command_t, &alternation_t, more])),
        )
    };

    Ok(CommandNode {
        key: key.map(str::to_string),
        relevant,
        population,
        command,
        command_t,
        argument,
        argument_t,
        collapsed,
        collapsed_t,
        children,
    })
}
