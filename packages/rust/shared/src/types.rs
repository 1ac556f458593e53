//! Core domain types for the export pipeline.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExportFormat
// ---------------------------------------------------------------------------

/// Output formats, keyed by the extension-style token callers pass in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Standalone HTML document.
    #[default]
    #[serde(rename = ".html")]
    Html,
    /// Markdown with ATX headings.
    #[serde(rename = ".md")]
    Markdown,
    /// HTML wrapped for legacy word processors.
    #[serde(rename = ".doc")]
    Doc,
}

impl ExportFormat {
    /// Every supported format, in token order.
    pub const ALL: [ExportFormat; 3] = [Self::Html, Self::Markdown, Self::Doc];

    /// Look up a format by its extension token (`.html`, `.md`, `.doc`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Look up a format, defaulting to HTML for missing or unknown tokens.
    pub fn from_extension_or_default(ext: Option<&str>) -> Self {
        ext.and_then(Self::from_extension).unwrap_or_default()
    }

    /// The extension token for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => ".html",
            Self::Markdown => ".md",
            Self::Doc => ".doc",
        }
    }

    /// The MIME type attached to artifacts of this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Html => "text/html;charset=utf-8",
            Self::Markdown => "text/markdown;charset=utf-8",
            Self::Doc => "application/msword",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// ExportArtifact / ExportOutput
// ---------------------------------------------------------------------------

/// The bytes of an exported document, tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Format the artifact was produced for.
    pub format: ExportFormat,
    /// Encoded document.
    pub bytes: Vec<u8>,
    /// MIME type for download/hand-off.
    pub mime_type: String,
}

impl ExportArtifact {
    /// Wrap `bytes` with the MIME type of `format`.
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            mime_type: format.mime_type().to_string(),
        }
    }

    /// Lossy UTF-8 view of the bytes.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// What an export call delivers: an artifact, or the empty sentinel on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    Artifact(ExportArtifact),
    Empty,
}

impl ExportOutput {
    /// `true` for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Take the artifact, if any.
    pub fn into_artifact(self) -> Option<ExportArtifact> {
        match self {
            Self::Artifact(artifact) => Some(artifact),
            Self::Empty => None,
        }
    }

    /// Byte view; the empty sentinel is the empty slice.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Artifact(artifact) => &artifact.bytes,
            Self::Empty => &[],
        }
    }
}

impl From<ExportArtifact> for ExportOutput {
    fn from(artifact: ExportArtifact) -> Self {
        Self::Artifact(artifact)
    }
}

// ---------------------------------------------------------------------------
// MediaObject
// ---------------------------------------------------------------------------

/// Media content attached to a `media-tag` reference by the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    /// MIME type of `bytes` (e.g., `image/png`).
    pub mime_type: String,
    /// Raw media content.
    pub bytes: Vec<u8>,
}

impl MediaObject {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Inline `data:` URI for the content.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lookup_by_extension() {
        assert_eq!(ExportFormat::from_extension(".md"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_extension(".doc"), Some(ExportFormat::Doc));
        assert_eq!(ExportFormat::from_extension("md"), None);
    }

    #[test]
    fn unknown_or_missing_format_defaults_to_html() {
        assert_eq!(ExportFormat::from_extension_or_default(None), ExportFormat::Html);
        assert_eq!(
            ExportFormat::from_extension_or_default(Some(".pdf")),
            ExportFormat::Html
        );
    }

    #[test]
    fn format_serde_uses_extension_tokens() {
        let json = serde_json::to_string(&ExportFormat::Doc).expect("serialize");
        assert_eq!(json, "\".doc\"");
        let parsed: ExportFormat = serde_json::from_str("\".md\"").expect("deserialize");
        assert_eq!(parsed, ExportFormat::Markdown);
    }

    #[test]
    fn artifact_carries_format_mime() {
        let artifact = ExportArtifact::new(ExportFormat::Markdown, b"# hi".to_vec());
        assert_eq!(artifact.mime_type, "text/markdown;charset=utf-8");
        assert_eq!(artifact.text(), "# hi");
    }

    #[test]
    fn empty_output_has_no_bytes() {
        let out = ExportOutput::Empty;
        assert!(out.is_empty());
        assert!(out.as_bytes().is_empty());
        assert!(out.into_artifact().is_none());
    }

    #[test]
    fn media_data_uri() {
        let media = MediaObject::new("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(media.to_data_uri(), "data:image/png;base64,iVBORw==");
    }
}
