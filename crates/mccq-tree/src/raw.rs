//! Raw grammar decoding.
//!
//! The server exports its command grammar as nested JSON:
//!
//! ```json
//! {
//!   "type": "root",
//!   "children": {
//!     "tag": {
//!       "type": "literal",
//!       "children": {
//!         "targets": {
//!           "type": "argument",
//!           "parser": "minecraft:entity",
//!           "children": { "list": { "type": "literal", "executable": true } }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! [`RawNode::from_value`] checks the structure and turns the loosely typed
//! JSON into a closed set of node kinds. Child order is taken from the JSON
//! object as-is.

use serde_json::{Map, Value};

use crate::error::BuildError;

pub const ROOT_PATH: &str = "<root>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Literal,
    /// A typed argument slot; `parser` is the declared `namespace:type` id.
    Argument {
        parser: String,
    },
    /// Any tag this decoder does not recognize. Kept so the build can render
    /// it as `key*` instead of failing.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub kind: NodeKind,
    pub executable: bool,
    pub redirect: Vec<String>,
    pub children: Vec<(String, RawNode)>,
}

impl RawNode {
    /// Decode the grammar root.
    pub fn from_value(value: &Value) -> Result<Self, BuildError> {
        decode(value, ROOT_PATH)
    }

    pub fn has_redirect(&self) -> bool {
        !self.redirect.is_empty()
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent == ROOT_PATH {
        key.to_string()
    } else {
        format!("{parent}/{key}")
    }
}

fn decode(value: &Value, path: &str) -> Result<RawNode, BuildError> {
    let obj: &Map<String, Value> = value.as_object().ok_or_else(|| BuildError::InvalidField {
        path: path.to_string(),
        field: "node",
        expected: "an object",
    })?;

    let tag = match obj.get("type") {
        None => {
            return Err(BuildError::MissingField {
                path: path.to_string(),
                field: "type",
            })
        }
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(BuildError::InvalidField {
                path: path.to_string(),
                field: "type",
                expected: "a string",
            })
        }
    };

    let kind = match tag {
        "root" => NodeKind::Root,
        "literal" => NodeKind::Literal,
        "argument" => match obj.get("parser") {
            Some(Value::String(parser)) => NodeKind::Argument {
                parser: parser.clone(),
            },
            Some(_) => {
                return Err(BuildError::InvalidField {
                    path: path.to_string(),
                    field: "parser",
                    expected: "a string",
                })
            }
            None => {
                return Err(BuildError::MissingField {
                    path: path.to_string(),
                    field: "parser",
                })
            }
        },
        other => NodeKind::Other(other.to_string()),
    };

    let executable = match obj.get("executable") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(BuildError::InvalidField {
                path: path.to_string(),
                field: "executable",
                expected: "a boolean",
            })
        }
    };

    let redirect = match obj.get("redirect") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| BuildError::InvalidField {
                        path: path.to_string(),
                        field: "redirect",
                        expected: "a list of strings",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(BuildError::InvalidField {
                path: path.to_string(),
                field: "redirect",
                expected: "a list of strings",
            })
        }
    };

    let children = match obj.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => {
            let mut children = Vec::with_capacity(map.len());
            for (key, child) in map {
                let child = decode(child, &child_path(path, key))?;
                children.push((key.clone(), child));
            }
            children
        }
        Some(_) => {
            return Err(BuildError::InvalidField {
                path: path.to_string(),
                field: "children",
                expected: "an object",
            })
        }
    };

    Ok(RawNode {
        kind,
        executable,
        redirect,
        children,
    })
}
