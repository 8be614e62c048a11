use mccq_tree::{build_v1, CommandNode, TreeShape};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const MAX_DEPTH: u32 = 4;
const MAX_NODES: u32 = 48;
const MAX_FANOUT: usize = 4;

fn key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,6}").unwrap()
}

fn kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => Just("literal"),
        3 => Just("argument"),
        1 => Just("future_kind"),
    ]
}

fn redirect() -> impl Strategy<Value = Vec<String>> {
    prop_oneof![
        4 => Just(Vec::new()),
        1 => proptest::collection::vec(key(), 1..3),
    ]
}

fn node_json(
    kind: &str,
    executable: bool,
    redirect: Vec<String>,
    children: Option<Vec<(String, Value)>>,
) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(kind));
    if kind == "argument" {
        obj.insert("parser".to_string(), json!("brigadier:string"));
    }
    if executable {
        obj.insert("executable".to_string(), json!(true));
    }
    if !redirect.is_empty() {
        obj.insert("redirect".to_string(), json!(redirect));
    }
    if let Some(children) = children {
        let mut map = Map::new();
        for (k, v) in children {
            map.insert(k, v);
        }
        obj.insert("children".to_string(), Value::Object(map));
    }
    Value::Object(obj)
}

fn grammar_node() -> impl Strategy<Value = Value> {
    let leaf = (kind(), any::<bool>(), redirect())
        .prop_map(|(kind, executable, redirect)| node_json(kind, executable, redirect, None));
    leaf.prop_recursive(MAX_DEPTH, MAX_NODES, MAX_FANOUT as u32, |inner| {
        (
            kind(),
            any::<bool>(),
            redirect(),
            proptest::collection::vec((key(), inner), 1..=MAX_FANOUT),
        )
            .prop_map(|(kind, executable, redirect, children)| {
                node_json(kind, executable, redirect, Some(children))
            })
    })
}

fn grammar() -> impl Strategy<Value = Value> {
    proptest::collection::vec((key(), grammar_node()), 0..=MAX_FANOUT)
        .prop_map(|children| node_json("root", false, Vec::new(), Some(children)))
}

fn walk<'a>(node: &'a CommandNode, out: &mut Vec<&'a CommandNode>) {
    out.push(node);
    for child in &node.children {
        walk(child, out);
    }
}

fn all_nodes(root: &CommandNode) -> Vec<&CommandNode> {
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn population_counts_relevant_nodes(raw in grammar()) {
        let root = build_v1(&raw).expect("build");
        for node in all_nodes(&root) {
            let expected = usize::from(node.relevant)
                + node.children.iter().map(|c| c.population).sum::<usize>();
            prop_assert_eq!(node.population, expected);
        }
    }

    #[test]
    fn collapsed_present_iff_children(raw in grammar()) {
        let root = build_v1(&raw).expect("build");
        for node in all_nodes(&root) {
            if node.children.is_empty() {
                prop_assert!(node.collapsed.is_none());
                prop_assert!(node.collapsed_t.is_none());
            } else {
                prop_assert!(node.collapsed.as_deref().is_some_and(|s| !s.is_empty()));
                prop_assert!(node.collapsed_t.as_deref().is_some_and(|s| !s.is_empty()));
            }
        }
    }

    #[test]
    fn every_leaf_is_relevant(raw in grammar()) {
        let root = build_v1(&raw).expect("build");
        for leaf in root.children.iter().flat_map(|c| c.leaves()) {
            prop_assert!(leaf.relevant, "leaf `{}` should be relevant", leaf.command);
        }
    }

    #[test]
    fn child_signatures_extend_parent_signature(raw in grammar()) {
        let root = build_v1(&raw).expect("build");
        for node in all_nodes(&root) {
            for child in &node.children {
                prop_assert!(child.command.starts_with(&node.command));
                prop_assert!(child.command_t.starts_with(&node.command_t));
            }
        }
    }
}
