//! The JSON-serializable document tree produced by the editor.
//!
//! Two element encodings are accepted: the object form
//! `{"name": "p", "attributes": {...}, "children": [...]}` and the compact
//! hyperjson triple `["P", {...}, [...]]`. In either form the name may be a
//! selector such as `P#intro.lead`, carrying the element's id and classes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PadExportError, Result};
use crate::node::{Element, Node};

/// One node of a serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentTree {
    /// A text leaf.
    Text(String),
    /// `[name, attributes, children]`.
    Hyperjson(String, Map<String, Value>, Vec<DocumentTree>),
    /// `{name, attributes, children}`.
    Tag {
        name: String,
        #[serde(default)]
        attributes: Map<String, Value>,
        #[serde(default)]
        children: Vec<DocumentTree>,
    },
}

impl DocumentTree {
    /// Whether `value` has the shape of a hyperjson element triple.
    pub fn is_hyperjson(value: &Value) -> bool {
        matches!(
            value.as_array().map(Vec::as_slice),
            Some([Value::String(_), Value::Object(_), Value::Array(_)])
        )
    }

    /// Parse a single node from JSON.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| PadExportError::Conversion(format!("invalid document node: {e}")))
    }

    /// Convert into the renderable node graph.
    pub fn into_node(self) -> Result<Node> {
        match self {
            Self::Text(text) => Ok(Node::Text(text)),
            Self::Hyperjson(name, attributes, children)
            | Self::Tag {
                name,
                attributes,
                children,
            } => build_element(name, attributes, children).map(Node::Element),
        }
    }
}

/// Tag used when a selector names only an id or classes.
const DEFAULT_TAG: &str = "div";

/// Split a `TAG#id.class1.class2` selector into its parts.
fn parse_selector(selector: &str) -> (&str, Option<&str>, Vec<&str>) {
    let tag_end = selector.find(['#', '.']).unwrap_or(selector.len());
    let (tag, mut rest) = selector.split_at(tag_end);

    let mut id = None;
    let mut classes = Vec::new();
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['#', '.']).unwrap_or(body.len());
        let (token, tail) = body.split_at(end);
        if !token.is_empty() {
            match marker {
                '#' => id = Some(token),
                _ => classes.push(token),
            }
        }
        rest = tail;
    }

    let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };
    (tag, id, classes)
}

fn build_element(
    name: String,
    attributes: Map<String, Value>,
    children: Vec<DocumentTree>,
) -> Result<Element> {
    if name.is_empty() {
        return Err(PadExportError::Conversion("element with empty tag name".into()));
    }

    let (tag, id, classes) = parse_selector(&name);
    let mut el = Element::new(tag);
    if let Some(id) = id {
        el.set_attr("id", id);
    }
    if !classes.is_empty() {
        el.set_attr("class", classes.join(" "));
    }

    for (key, value) in attributes {
        let value = match value {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(PadExportError::Conversion(format!(
                    "attribute `{key}` on <{}> has non-scalar value {other}",
                    el.name
                )));
            }
        };
        if key.eq_ignore_ascii_case("class") && !classes.is_empty() {
            let merged = format!("{} {value}", classes.join(" "));
            el.set_attr("class", merged.trim_end());
        } else {
            el.set_attr(key, value);
        }
    }

    el.children = children
        .into_iter()
        .map(DocumentTree::into_node)
        .collect::<Result<_>>()?;

    Ok(el)
}

impl From<&Element> for DocumentTree {
    fn from(el: &Element) -> Self {
        Self::Tag {
            name: el.name.clone(),
            attributes: el
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            children: el.children.iter().map(DocumentTree::from).collect(),
        }
    }
}

impl From<&Node> for DocumentTree {
    fn from(node: &Node) -> Self {
        match node {
            Node::Text(text) => Self::Text(text.clone()),
            Node::Element(el) => Self::from(el),
        }
    }
}
