//! Phase 2: turn a matched node into signature lines.
//!
//! Per node:
//! - a relevant node with a non-empty signature emits that signature;
//! - children are expanded when forced (`--explode`), when the subtree fits
//!   (`population <= capacity`), or when there is only one child;
//! - otherwise a non-relevant node emits its collapsed summary instead.
//!
//! A relevant node that is over capacity with several children therefore
//! emits only its own line, with no summary of what lies beneath it.

use mccq_tree::CommandNode;

use crate::args::QueryArguments;

/// Lines for `node` and whatever part of its subtree gets expanded.
pub fn render_from(node: &CommandNode, args: &QueryArguments) -> Vec<String> {
    let mut out = Vec::new();
    render_into(node, args, &mut out);
    out
}

pub(crate) fn render_into(node: &CommandNode, args: &QueryArguments, out: &mut Vec<String>) {
    let line = node.line(args.show_types);

    if !line.is_empty() && node.relevant {
        out.push(line.to_string());
    }

    let expand = !node.children.is_empty()
        && (args.explode || node.population <= args.capacity || node.children.len() == 1);

    if expand {
        for child in &node.children {
            render_into(child, args, out);
        }
    } else if !node.relevant {
        let summary = node.summary(args.show_types).unwrap_or(line);
        if !summary.is_empty() {
            out.push(summary.to_string());
        }
    }
}
