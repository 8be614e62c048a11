//! Built command tree.
//!
//! A [`CommandNode`] is one position in a command grammar after annotation:
//! it knows the full signature leading up to it (with and without argument
//! types), whether that signature is worth displaying on its own, how many
//! displayable signatures live beneath it, and a one-line summary of its
//! immediate alternatives.
//!
//! Trees are built once per version (see [`crate::builder_v1`]) and are never
//! mutated afterwards.

/// Anything with ordered children of its own kind.
///
/// Both the built grammar tree and the query result tree implement this so
/// they can share [`Leaves`].
pub trait TreeShape: Sized {
    fn branches(&self) -> &[Self];

    /// Depth-first iterator over every node without children.
    ///
    /// The iterator is recomputed from the tree on every call; no iteration
    /// state is shared between calls.
    fn leaves(&self) -> Leaves<'_, Self> {
        Leaves { stack: vec![self] }
    }
}

/// Lazy depth-first leaf iterator. See [`TreeShape::leaves`].
#[derive(Debug, Clone)]
pub struct Leaves<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: TreeShape> Iterator for Leaves<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            let branches = node.branches();
            if branches.is_empty() {
                return Some(node);
            }
            // Reversed so the first child is visited first.
            self.stack.extend(branches.iter().rev());
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    /// Token this node was registered under in its parent (`None` for the root).
    pub key: Option<String>,
    /// Whether `command` is itself a complete, displayable command.
    pub relevant: bool,
    /// Number of relevant nodes in this subtree, this node included.
    pub population: usize,
    pub command: String,
    /// `command` with argument type annotations.
    pub command_t: String,
    /// Fragment this node alone contributes; used by the parent's summary.
    pub argument: Option<String>,
    pub argument_t: Option<String>,
    /// `command` followed by the alternation of all children's arguments.
    /// Present iff the node has children.
    pub collapsed: Option<String>,
    pub collapsed_t: Option<String>,
    /// Children in grammar order. Keys are unique.
    pub children: Vec<CommandNode>,
}

impl CommandNode {
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    pub fn child(&self, key: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.key.as_deref() == Some(key))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Signature in the requested form.
    pub fn line(&self, typed: bool) -> &str {
        if typed {
            &self.command_t
        } else {
            &self.command
        }
    }

    /// Summary in the requested form, if the node has children.
    pub fn summary(&self, typed: bool) -> Option<&str> {
        if typed {
            self.collapsed_t.as_deref()
        } else {
            self.collapsed.as_deref()
        }
    }

    /// Longest path from this node down to a leaf, in edges.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl TreeShape for CommandNode {
    fn branches(&self) -> &[Self] {
        &self.children
    }
}
