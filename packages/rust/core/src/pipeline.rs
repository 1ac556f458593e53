//! End-to-end export: materialize → resolve media → sanitize/emit.
//!
//! The public entry points never fail. Every error is logged here and turned
//! into [`ExportOutput::Empty`], which callers treat as "nothing exported".

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument};

use padexport_shared::{
    ExportArtifact, ExportFormat, ExportOptions, ExportOutput, PadExportError, Result,
};

use crate::emit;
use crate::materialize::{ExportInput, materialize};
use crate::media::{DataUriResolver, MediaResolver, resolve_media};

/// Export with the default resolver and no media timeout.
///
/// `format` is an extension token (`.html`, `.md`, `.doc`); anything else,
/// including `None`, selects `.html`.
pub async fn export(input: impl Into<ExportInput>, format: Option<&str>) -> ExportOutput {
    let options = ExportOptions::new(ExportFormat::from_extension_or_default(format));
    export_with(input, &options, Arc::new(DataUriResolver)).await
}

/// Export, handing the result to `deliver` exactly once.
pub async fn export_then<F>(input: impl Into<ExportInput>, format: Option<&str>, deliver: F)
where
    F: FnOnce(ExportOutput),
{
    deliver(export(input, format).await);
}

/// Export with explicit options and media resolver.
#[instrument(skip_all, fields(format = %options.format))]
pub async fn export_with<R: MediaResolver>(
    input: impl Into<ExportInput>,
    options: &ExportOptions,
    resolver: Arc<R>,
) -> ExportOutput {
    let start = Instant::now();

    match run(input.into(), options, resolver).await {
        Ok(artifact) => {
            info!(
                bytes = artifact.bytes.len(),
                mime = %artifact.mime_type,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "export complete"
            );
            ExportOutput::Artifact(artifact)
        }
        Err(e) => {
            error!(error = %e, "export failed, delivering empty result");
            ExportOutput::Empty
        }
    }
}

async fn run<R: MediaResolver>(
    input: ExportInput,
    options: &ExportOptions,
    resolver: Arc<R>,
) -> Result<ExportArtifact> {
    let root = materialize(input)?;

    let resolved = match options.media_timeout {
        None => resolve_media(&root, resolver).await,
        Some(limit) => tokio::time::timeout(limit, resolve_media(&root, resolver))
            .await
            .map_err(|_| PadExportError::Timeout {
                millis: limit.as_millis() as u64,
            })?,
    };

    emit::emit(options.format, &resolved)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
