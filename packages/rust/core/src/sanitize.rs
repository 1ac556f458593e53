//! Markup sanitization: undo editor-internal placeholder encoding.
//!
//! The rich-text editor stores some elements (anchors, mostly) as an
//! `<img class="cke_anchor">` placeholder whose `data-cke-realelement`
//! attribute holds the percent-encoded original markup. Sanitizing swaps
//! each placeholder for its decoded original. This is a text rewrite over
//! serialized markup and always runs after serialization.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use tracing::warn;

use padexport_shared::Element;

static REAL_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]*class="cke_anchor"[^>]*data-cke-realelement="([^"]*)"[^>]*>"#)
        .expect("valid regex")
});

/// Serialize the children of `root` to markup.
pub fn serialize(root: &Element) -> String {
    root.inner_html()
}

/// Replace every placeholder with its decoded original, left to right.
///
/// A placeholder whose payload does not decode to UTF-8 is kept verbatim.
pub fn clean(markup: &str) -> String {
    REAL_ELEMENT_RE
        .replace_all(markup, |caps: &Captures| {
            match percent_decode_str(&caps[1]).decode_utf8() {
                Ok(decoded) => decoded.into_owned(),
                Err(e) => {
                    warn!(error = %e, "placeholder payload is not valid UTF-8, keeping it");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Serialize then clean.
pub fn clean_html(root: &Element) -> String {
    clean(&serialize(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_placeholder(real: &str) -> Element {
        Element::new("img")
            .with_attr("class", "cke_anchor")
            .with_attr("data-cke-realelement", real)
            .with_attr("data-cke-real-node-type", "1")
    }

    #[test]
    fn placeholder_is_replaced_by_decoded_element() {
        let root = Element::new("body")
            .with_child(Element::new("p").with_text("before"))
            .with_child(anchor_placeholder("%3Ca%20id%3D%22intro%22%3E%3C%2Fa%3E"));

        assert_eq!(clean_html(&root), "<p>before</p><a id=\"intro\"></a>");
    }

    #[test]
    fn every_placeholder_is_replaced_once() {
        let markup = concat!(
            r#"<img class="cke_anchor" data-cke-realelement="%3Ca%20name%3D%22a%22%3E%3C%2Fa%3E">"#,
            "text",
            r#"<img src="x.png" class="cke_anchor" data-cke-realelement="%3Ca%20name%3D%22b%22%3E%3C%2Fa%3E" alt="">"#,
        );
        assert_eq!(clean(markup), r#"<a name="a"></a>text<a name="b"></a>"#);
    }

    #[test]
    fn ampersands_survive_decoding() {
        let markup = r#"<img class="cke_anchor" data-cke-realelement="%3Ca%20href%3D%22%3Fa%3D1%26b%3D2%22%3E%3C%2Fa%3E">"#;
        assert_eq!(clean(markup), r#"<a href="?a=1&b=2"></a>"#);
    }

    #[test]
    fn ordinary_images_are_untouched() {
        let markup = r#"<p><img src="cat.png" class="photo"></p>"#;
        assert_eq!(clean(markup), markup);
    }

    #[test]
    fn invalid_utf8_payload_is_kept() {
        let markup = r#"<img class="cke_anchor" data-cke-realelement="%FF%FE">"#;
        assert_eq!(clean(markup), markup);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let root = Element::new("body")
            .with_child(anchor_placeholder("%3Ca%20id%3D%22x%22%3E%3C%2Fa%3E"))
            .with_child(Element::new("p").with_text("a & b"));

        let once = clean_html(&root);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn serialize_matches_inner_html() {
        let root = Element::new("body").with_child(Element::new("p").with_text("x"));
        assert_eq!(serialize(&root), "<p>x</p>");
    }
}
