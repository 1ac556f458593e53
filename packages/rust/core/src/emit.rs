//! Format emitters: one function per export format.
//!
//! `.html` and `.doc` wrap sanitized markup in a document shell; `.md`
//! converts the resolved node directly and skips sanitization.

use tracing::debug;

use padexport_shared::{Element, ExportArtifact, ExportFormat, Result};

use crate::sanitize;

/// Byte-order mark prepended to `.doc` output so word processors detect UTF-8.
pub const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

const DOC_PREFIX: &str = concat!(
    "<html xmlns:o='urn:schemas-microsoft-com:office:office' ",
    "xmlns:w='urn:schemas-microsoft-com:office:word' ",
    "xmlns='http://www.w3.org/TR/REC-html40'>",
    "<head><meta charset='utf-8'><title>Export HTML To Doc</title></head><body>",
);

const DOC_SUFFIX: &str = "</body></html>";

/// Wrap sanitized inner markup in a minimal HTML document.
pub fn html_document(inner: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head><meta charset=\"utf-8\"></head>\n  <body>{inner}  </body>\n</html>"
    )
}

/// Wrap sanitized inner markup in the word-processor document shell.
pub fn doc_document(inner: &str) -> String {
    format!("{DOC_PREFIX}{inner}{DOC_SUFFIX}")
}

/// `.html`: sanitized markup in a standalone document.
pub fn emit_html(root: &Element) -> ExportArtifact {
    let html = html_document(&sanitize::clean_html(root));
    debug!(len = html.len(), "emitted html");
    ExportArtifact::new(ExportFormat::Html, html.into_bytes())
}

/// `.doc`: BOM followed by sanitized markup in the word-processor shell.
pub fn emit_doc(root: &Element) -> ExportArtifact {
    let doc = doc_document(&sanitize::clean_html(root));
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + doc.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(doc.as_bytes());
    debug!(len = bytes.len(), "emitted doc");
    ExportArtifact::new(ExportFormat::Doc, bytes)
}

/// `.md`: Markdown converted from the unsanitized node.
pub fn emit_markdown(root: &Element) -> Result<ExportArtifact> {
    let md = padexport_markdown::node_to_markdown(root)?;
    debug!(len = md.len(), "emitted markdown");
    Ok(ExportArtifact::new(ExportFormat::Markdown, md.into_bytes()))
}

/// Dispatch to the emitter for `format`.
pub fn emit(format: ExportFormat, root: &Element) -> Result<ExportArtifact> {
    match format {
        ExportFormat::Html => Ok(emit_html(root)),
        ExportFormat::Doc => Ok(emit_doc(root)),
        ExportFormat::Markdown => emit_markdown(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> Element {
        Element::new("body").with_child(Element::new("p").with_text("hello"))
    }

    #[test]
    fn html_shell_layout() {
        assert_eq!(
            html_document("<p>x</p>"),
            "<!DOCTYPE html>\n<html>\n  <head><meta charset=\"utf-8\"></head>\n  <body><p>x</p>  </body>\n</html>"
        );
    }

    #[test]
    fn html_artifact() {
        let artifact = emit_html(&hello());
        assert_eq!(artifact.mime_type, "text/html;charset=utf-8");
        assert!(artifact.text().contains("<body><p>hello</p>"));
    }

    #[test]
    fn doc_artifact_starts_with_bom() {
        let artifact = emit_doc(&hello());
        assert_eq!(artifact.mime_type, "application/msword");
        assert!(artifact.bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

        let body = std::str::from_utf8(&artifact.bytes[3..]).unwrap();
        assert!(body.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(body.contains("<title>Export HTML To Doc</title>"));
        assert!(body.contains("<p>hello</p>"));
        assert!(body.ends_with("</body></html>"));
    }

    #[test]
    fn markdown_artifact() {
        let artifact = emit_markdown(&hello()).unwrap();
        assert_eq!(artifact.mime_type, "text/markdown;charset=utf-8");
        assert!(artifact.text().contains("hello"));
    }

    #[test]
    fn html_and_doc_are_sanitized_markdown_is_not() {
        let root = Element::new("body").with_child(
            Element::new("img")
                .with_attr("class", "cke_anchor")
                .with_attr("data-cke-realelement", "%3Ca%20id%3D%22top%22%3E%3C%2Fa%3E"),
        );

        assert!(emit_html(&root).text().contains("<a id=\"top\"></a>"));
        assert!(emit_doc(&root).text().contains("<a id=\"top\"></a>"));
        assert!(!emit_html(&root).text().contains("cke_anchor"));
    }

    #[test]
    fn dispatch_selects_matching_emitter() {
        for format in ExportFormat::ALL {
            let artifact = emit(format, &hello()).unwrap();
            assert_eq!(artifact.format, format);
            assert_eq!(artifact.mime_type, format.mime_type());
            assert!(!artifact.bytes.is_empty());
        }
    }
}
