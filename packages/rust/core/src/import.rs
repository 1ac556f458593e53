//! Import: Markdown or HTML → materialized `body` element.
//!
//! Markdown is rendered to HTML with `comrak`; HTML is parsed with
//! `scraper`. Whitespace-only text at the edges of the body is dropped so
//! that an exported document re-imports to the same node.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use padexport_shared::{Element, Node};

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

/// Render Markdown and import the result as a `body` element.
#[instrument(skip_all, fields(len = md.len()))]
pub fn import_markdown(md: &str) -> Element {
    let html = comrak::markdown_to_html(md, &comrak::Options::default());
    debug!(html_len = html.len(), "markdown rendered");

    let fragment = Html::parse_fragment(&html);
    let mut body = Element::new("body");
    body.children = convert_children(fragment.root_element());
    trim_edge_whitespace(&mut body);
    body
}

/// Import an HTML document (or fragment) and return its `body`.
#[instrument(skip_all, fields(len = html.len()))]
pub fn import_html(html: &str) -> Element {
    let doc = Html::parse_document(html);
    let mut body = Element::new("body");

    if let Some(el) = doc.select(&BODY_SELECTOR).next() {
        body.children = convert_children(el);
    }

    trim_edge_whitespace(&mut body);
    body
}

fn convert_element(el: ElementRef<'_>) -> Element {
    let mut out = Element::new(el.value().name());
    for (name, value) in el.value().attrs() {
        out.set_attr(name, value);
    }
    out.children = convert_children(el);
    out
}

fn convert_children(el: ElementRef<'_>) -> Vec<Node> {
    el.children()
        .filter_map(|child| {
            if let Some(child_el) = ElementRef::wrap(child) {
                return Some(Node::Element(convert_element(child_el)));
            }
            match child.value() {
                scraper::Node::Text(text) => Some(Node::Text(String::from(&**text))),
                _ => None,
            }
        })
        .collect()
}

fn trim_edge_whitespace(el: &mut Element) {
    fn is_blank(node: Option<&Node>) -> bool {
        matches!(node, Some(Node::Text(t)) if t.trim_matches(|c: char| c.is_ascii_whitespace()).is_empty())
    }

    while is_blank(el.children.last()) {
        el.children.pop();
    }
    while is_blank(el.children.first()) {
        el.children.remove(0);
    }
}
