//! Tree materialization: serialized document tree → renderable node graph.

use serde_json::Value;
use tracing::{debug, instrument};

use padexport_shared::{DocumentTree, Element, Node, PadExportError, Result};

/// Tag of the synthetic root that holds a top-level sequence of siblings.
const ROOT_TAG: &str = "body";

/// What a caller hands to the pipeline, decided once at the boundary.
#[derive(Debug, Clone)]
pub enum ExportInput {
    /// Serialized document tree, not yet materialized.
    Tree(Value),
    /// An already materialized root, used as-is.
    Materialized(Element),
}

impl From<Value> for ExportInput {
    fn from(value: Value) -> Self {
        Self::Tree(value)
    }
}

impl From<Element> for ExportInput {
    fn from(el: Element) -> Self {
        Self::Materialized(el)
    }
}

/// Materialize `input` into a root element.
///
/// Only ordered sequences are accepted as trees; any other JSON shape is
/// [`PadExportError::MalformedInput`]. A sequence with the hyperjson triple
/// shape becomes that single element, otherwise its items become the
/// children of a `body` root.
#[instrument(skip_all)]
pub fn materialize(input: ExportInput) -> Result<Element> {
    let value = match input {
        ExportInput::Materialized(el) => return Ok(el),
        ExportInput::Tree(value) => value,
    };

    if DocumentTree::is_hyperjson(&value) {
        debug!("materializing hyperjson root");
        return match DocumentTree::from_value(value)?.into_node()? {
            Node::Element(el) => Ok(el),
            Node::Text(_) => Err(PadExportError::Conversion("root is a text node".into())),
        };
    }

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(PadExportError::malformed(format!(
                "document root is not an array (got {})",
                json_kind(&other)
            )));
        }
    };

    debug!(count = items.len(), "materializing top-level sequence");

    let mut root = Element::new(ROOT_TAG);
    root.children = items
        .into_iter()
        .map(|item| DocumentTree::from_value(item)?.into_node())
        .collect::<Result<_>>()?;

    Ok(root)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_becomes_body_children() {
        let root = materialize(json!([{"name": "p", "attributes": {}, "children": ["hello"]}]).into())
            .unwrap();
        assert_eq!(root.name, "body");
        assert_eq!(root.inner_html(), "<p>hello</p>");
    }

    #[test]
    fn hyperjson_root_is_kept_as_single_element() {
        let root = materialize(json!(["BODY", {}, [["H1", {}, ["Title"]], "tail"]]).into()).unwrap();
        assert_eq!(root.name, "body");
        assert_eq!(root.inner_html(), "<h1>Title</h1>tail");
    }

    #[test]
    fn materialized_input_passes_through_unchanged() {
        let el = Element::new("div").with_attr("id", "x").with_text("keep");
        let root = materialize(ExportInput::Materialized(el.clone())).unwrap();
        assert_eq!(root, el);
    }

    #[test]
    fn string_root_is_malformed() {
        let err = materialize(json!("not-an-array").into()).unwrap_err();
        assert!(matches!(err, PadExportError::MalformedInput { .. }));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn object_root_is_malformed() {
        let err = materialize(json!({"name": "p"}).into()).unwrap_err();
        assert!(matches!(err, PadExportError::MalformedInput { .. }));
    }

    #[test]
    fn bad_child_is_conversion_error() {
        let err = materialize(json!([{"attributes": {}}]).into()).unwrap_err();
        assert!(matches!(err, PadExportError::Conversion(_)));
    }

    #[test]
    fn empty_sequence_is_empty_body() {
        let root = materialize(json!([]).into()).unwrap();
        assert!(root.children.is_empty());
    }
}
