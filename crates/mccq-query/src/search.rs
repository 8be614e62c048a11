//! Phase 1: narrow a command tree to the paths matching a token sequence.

use mccq_tree::{CommandNode, TreeShape};
use regex::{Regex, RegexBuilder};

use crate::error::QueryError;

/// Token that matches every key without being compiled.
pub const WILDCARD: &str = ".";

/// One compiled query token.
#[derive(Debug, Clone)]
pub enum TokenMatcher {
    Wildcard,
    /// Anchored on both ends and case-insensitive.
    Pattern(Regex),
}

impl TokenMatcher {
    pub fn compile(token: &str) -> Result<Self, QueryError> {
        if token == WILDCARD {
            return Ok(Self::Wildcard);
        }
        RegexBuilder::new(&format!("^(?:{token})$"))
            .case_insensitive(true)
            .build()
            .map(Self::Pattern)
            .map_err(|source| QueryError::InvalidPattern {
                token: token.to_string(),
                source,
            })
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Pattern(re) => re.is_match(key),
        }
    }
}

/// Compile every token once, up front.
pub fn compile_tokens(tokens: &[String]) -> Result<Vec<TokenMatcher>, QueryError> {
    tokens.iter().map(|t| TokenMatcher::compile(t)).collect()
}

/// A matched position in a command tree.
///
/// Borrows the [`CommandNode`] it stands for; `children` holds only the
/// deeper matches, not the node's full grammar children.
#[derive(Debug, Clone)]
pub struct ResultNode<'a> {
    node: &'a CommandNode,
    children: Vec<ResultNode<'a>>,
}

impl<'a> ResultNode<'a> {
    pub fn node(&self) -> &'a CommandNode {
        self.node
    }

    pub fn children(&self) -> &[ResultNode<'a>] {
        &self.children
    }
}

impl TreeShape for ResultNode<'_> {
    fn branches(&self) -> &[Self] {
        &self.children
    }
}

/// Search `node`'s children against `matchers[depth..]`.
///
/// Returns `None` when the remaining tokens lead nowhere below `node`. When
/// the tokens are exhausted at `node`, it becomes a result leaf even if it
/// has grammar children of its own.
pub fn match_tree<'a>(
    node: &'a CommandNode,
    matchers: &[TokenMatcher],
    depth: usize,
) -> Option<ResultNode<'a>> {
    let Some(matcher) = matchers.get(depth) else {
        return Some(ResultNode {
            node,
            children: Vec::new(),
        });
    };

    let children: Vec<ResultNode<'a>> = node
        .children
        .iter()
        .filter(|child| matcher.matches(child.key()))
        .filter_map(|child| match_tree(child, matchers, depth + 1))
        .collect();

    if children.is_empty() {
        None
    } else {
        Some(ResultNode { node, children })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mccq_tree::build_v1;
    use serde_json::json;

    fn tree() -> CommandNode {
        build_v1(&json!({
            "type": "root",
            "children": {
                "tag": {
                    "type": "literal",
                    "children": {
                        "targets": {
                            "type": "argument",
                            "parser": "minecraft:entity",
                            "children": {
                                "add": { "type": "literal", "executable": true },
                                "list": { "type": "literal", "executable": true }
                            }
                        }
                    }
                },
                "team": { "type": "literal", "executable": true },
                "Teleport": { "type": "literal", "executable": true }
            }
        }))
        .expect("build")
    }

    fn keys<'a>(result: &ResultNode<'a>) -> Vec<&'a str> {
        result.leaves().map(|leaf| leaf.node().key()).collect()
    }

    fn search<'a>(root: &'a CommandNode, tokens: &[&str]) -> Option<ResultNode<'a>> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        match_tree(root, &compile_tokens(&tokens).expect("compile"), 0)
    }

    #[test]
    fn patterns_are_anchored_and_case_insensitive() {
        let root = tree();
        let result = search(&root, &["te.*"]).expect("match");
        assert_eq!(keys(&result), vec!["team", "Teleport"]);

        assert!(search(&root, &["ta"]).is_none());
        assert!(search(&root, &["TAG"]).is_some());
        // Alternation stays inside the anchors.
        let result = search(&root, &["tag|team"]).expect("match");
        assert_eq!(keys(&result), vec!["tag", "team"]);
    }

    #[test]
    fn wildcard_descends_into_any_child() {
        let root = tree();
        let result = search(&root, &["tag", ".", "add"]).expect("match");
        assert_eq!(keys(&result), vec!["add"]);
        assert_eq!(
            result.leaves().next().map(|l| l.node().command.as_str()),
            Some("tag <targets> add")
        );
    }

    #[test]
    fn exhausted_tokens_stop_search_above_grammar_leaves() {
        let root = tree();
        let result = search(&root, &["tag"]).expect("match");
        let leaf = result.leaves().next().expect("leaf");
        assert_eq!(leaf.node().key(), "tag");
        assert!(leaf.children().is_empty());
        assert!(!leaf.node().children.is_empty());
    }

    #[test]
    fn paths_deeper_than_the_grammar_are_dropped() {
        let root = tree();
        assert!(search(&root, &["team", "extra"]).is_none());

        // One branch dead-ends, the other survives.
        let result = search(&root, &["t.*", ".", "list"]).expect("match");
        assert_eq!(keys(&result), vec!["list"]);
        assert_eq!(result.children().len(), 1);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = TokenMatcher::compile("[(").unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern { token, .. } if token == "[("));
    }
}
