//! Renderable node graph and its HTML serialization.
//!
//! A materialized document is an [`Element`] root. Children are owned by
//! their parent; media attached to `media-tag` references is shared through
//! an [`Arc`] and never serialized.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::types::MediaObject;

/// Tag name of media references.
pub const MEDIA_TAG: &str = "media-tag";

/// Class of the editor's widget drag handle, which must not be exported.
pub const DRAG_HANDLE_CLASS: &str = "cke_widget_drag_handler_container";

/// Elements serialized without an end tag (and without children).
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are serialized verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

// ---------------------------------------------------------------------------
// Node / Element
// ---------------------------------------------------------------------------

/// A node in the renderable graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    fn write_html(&self, parent: &str, out: &mut String) {
        match self {
            Self::Element(el) => el.write_outer_html(out),
            Self::Text(text) if RAW_TEXT_ELEMENTS.contains(&parent) => out.push_str(text),
            Self::Text(text) => escape_text(text, out),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// An element with ordered attributes and owned children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Media attached by the host application (media references only).
    pub media: Option<Arc<MediaObject>>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style text child append.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Whether this element is a media reference.
    pub fn is_media_ref(&self) -> bool {
        self.name == MEDIA_TAG
    }

    /// Iterate over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements (excluding `self`) in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(&mut |_: &Element| true, &mut found);
        found
    }

    /// All descendant media references in document order.
    pub fn media_refs(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(&mut Element::is_media_ref, &mut found);
        found
    }

    fn collect_descendants<'a>(
        &'a self,
        pred: &mut dyn FnMut(&Element) -> bool,
        found: &mut Vec<&'a Element>,
    ) {
        for child in self.child_elements() {
            if pred(child) {
                found.push(child);
            }
            child.collect_descendants(pred, found);
        }
    }

    /// Visit every descendant element mutably, parents before children.
    pub fn for_each_descendant_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                f(el);
                el.for_each_descendant_mut(f);
            }
        }
    }

    /// Remove every descendant element carrying `class`. Returns how many were removed.
    pub fn remove_descendants_with_class(&mut self, class: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|child| !matches!(child, Node::Element(el) if el.has_class(class)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            if let Node::Element(el) = child {
                removed += el.remove_descendants_with_class(class);
            }
        }
        removed
    }

    /// Attach `media` to every media reference whose `src` equals `src`.
    /// Returns how many references received it.
    pub fn attach_media(&mut self, src: &str, media: Arc<MediaObject>) -> usize {
        let mut attached = 0;
        self.for_each_descendant_mut(&mut |el: &mut Element| {
            if el.is_media_ref() && el.attr("src") == Some(src) {
                el.media = Some(Arc::clone(&media));
                attached += 1;
            }
        });
        attached
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Serialize the children of this element (`innerHTML`).
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_inner_html(&mut out);
        out
    }

    /// Serialize this element including its own tag (`outerHTML`).
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_outer_html(&mut out);
        out
    }

    fn write_inner_html(&self, out: &mut String) {
        for child in &self.children {
            child.write_html(&self.name, out);
        }
    }

    fn write_outer_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"");
            escape_attr(value, out);
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            return;
        }

        self.write_inner_html(out);
        let _ = write!(out, "</{}>", self.name);
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_widget(src: &str) -> Element {
        Element::new("div")
            .with_attr("class", "cke_widget_wrapper")
            .with_child(
                Element::new(MEDIA_TAG)
                    .with_attr("src", src)
                    .with_child(Element::new("img").with_attr("src", "placeholder.png")),
            )
            .with_child(Element::new("span").with_attr("class", DRAG_HANDLE_CLASS))
    }

    #[test]
    fn serializes_like_inner_html() {
        let root = Element::new("body")
            .with_child(Element::new("P").with_text("a < b & c"))
            .with_child(Element::new("img").with_attr("alt", "say \"hi\""))
            .with_child(Element::new("br"));

        assert_eq!(
            root.inner_html(),
            "<p>a &lt; b &amp; c</p><img alt=\"say &quot;hi&quot;\"><br>"
        );
    }

    #[test]
    fn raw_text_elements_are_not_escaped() {
        let root = Element::new("body").with_child(Element::new("style").with_text("a > b {}"));
        assert_eq!(root.inner_html(), "<style>a > b {}</style>");
    }

    #[test]
    fn nbsp_is_escaped() {
        let root = Element::new("p").with_text("a\u{a0}b");
        assert_eq!(root.inner_html(), "a&nbsp;b");
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = Element::new("img").with_attr("src", "a").with_attr("alt", "x");
        el.set_attr("src", "b");
        assert_eq!(el.outer_html(), "<img src=\"b\" alt=\"x\">");
    }

    #[test]
    fn media_refs_in_document_order() {
        let root = Element::new("body")
            .with_child(media_widget("one"))
            .with_child(Element::new("p").with_child(media_widget("two")));

        let srcs: Vec<_> = root.media_refs().iter().filter_map(|m| m.attr("src")).collect();
        assert_eq!(srcs, vec!["one", "two"]);
    }

    #[test]
    fn remove_descendants_with_class_counts() {
        let mut root = Element::new("body")
            .with_child(media_widget("one"))
            .with_child(media_widget("two"));

        assert_eq!(root.remove_descendants_with_class(DRAG_HANDLE_CLASS), 2);
        assert!(!root.inner_html().contains(DRAG_HANDLE_CLASS));
    }

    #[test]
    fn attach_media_matches_src() {
        let mut root = Element::new("body")
            .with_child(media_widget("one"))
            .with_child(media_widget("two"))
            .with_child(media_widget("one"));

        let media = Arc::new(MediaObject::new("image/png", vec![1, 2, 3]));
        assert_eq!(root.attach_media("one", media), 2);
        let attached = root.media_refs().iter().filter(|m| m.media.is_some()).count();
        assert_eq!(attached, 2);
    }

    #[test]
    fn media_handle_is_not_serialized() {
        let mut root = Element::new("body").with_child(media_widget("one"));
        let plain = root.inner_html();
        root.attach_media("one", Arc::new(MediaObject::new("image/png", vec![9])));
        assert_eq!(root.inner_html(), plain);
    }
}
