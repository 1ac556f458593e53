//! Node-to-Markdown conversion for the `.md` export.
//!
//! Serializes a materialized node and converts it to Markdown with ATX
//! headings using the `htmd` crate, then applies a short cleanup pipeline.
//! The input node is taken as-is: it is expected to be media-resolved but
//! not sanitized, since `htmd` does its own escaping.

mod cleanup;

use htmd::options::{HeadingStyle, Options};
use tracing::{debug, instrument};

use padexport_shared::{Element, PadExportError, Result};

/// Tags whose content never belongs in a Markdown export.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript"];

/// Build the converter used by every export (ATX headings).
fn converter() -> htmd::HtmlToMarkdown {
    htmd::HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .skip_tags(SKIP_TAGS.to_vec())
        .build()
}

/// Convert the children of `root` to Markdown.
#[instrument(skip_all, fields(root = %root.name))]
pub fn node_to_markdown(root: &Element) -> Result<String> {
    html_to_markdown(&root.inner_html())
}

/// Convert an HTML fragment to Markdown.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let raw_markdown = converter()
        .convert(html)
        .map_err(|e| PadExportError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(raw_len = raw_markdown.len(), "htmd conversion complete");

    Ok(cleanup::run_pipeline(&raw_markdown))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
