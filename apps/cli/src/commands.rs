//! CLI command definitions, routing, and tracing setup.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use padexport_core::import::{import_html, import_markdown};
use padexport_core::{DataUriResolver, ExportInput, export_with, materialize};
use padexport_shared::{
    AppConfig, DocumentTree, ExportFormat, ExportOptions, MediaObject, init_config,
    load_config, load_config_from,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// padexport: export pad documents to portable formats.
#[derive(Parser)]
#[command(
    name = "padexport",
    version,
    about = "Export pad document trees to HTML, Markdown, or Word documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.padexport/padexport.toml.
    #[arg(long, env = "PADEXPORT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Export a JSON document tree.
    Export {
        /// Path to the document tree JSON (`-` for stdin).
        input: String,

        /// Output format: .html, .md, or .doc (defaults to the configured format).
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Attach a media file to the media-tag with this src (SRC=PATH, repeatable).
        #[arg(long = "media", value_parser = parse_media_arg)]
        media: Vec<(String, PathBuf)>,

        /// Give up on media resolution after this many milliseconds.
        #[arg(long)]
        media_timeout_ms: Option<u64>,
    },

    /// Import a Markdown or HTML file and print its document tree as JSON.
    Import {
        /// Path to a .md/.markdown or .html file.
        input: PathBuf,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Parse a `SRC=PATH` media argument.
fn parse_media_arg(arg: &str) -> std::result::Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((src, path)) if !src.is_empty() && !path.is_empty() => {
            Ok((src.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected SRC=PATH, got '{arg}'")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "padexport=info",
        1 => "padexport=debug",
        _ => "padexport=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Export {
            input,
            format,
            out,
            media,
            media_timeout_ms,
        } => {
            let config = resolve_config(config_path)?;
            cmd_export(
                &config,
                &input,
                format.as_deref(),
                out.as_deref(),
                &media,
                media_timeout_ms,
            )
            .await
        }
        Command::Import { input, out } => cmd_import(&input, out.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_export(
    config: &AppConfig,
    input: &str,
    format: Option<&str>,
    out: Option<&Path>,
    media: &[(String, PathBuf)],
    media_timeout_ms: Option<u64>,
) -> Result<()> {
    let mut options = ExportOptions::from(config);
    if let Some(ext) = format {
        options.format = ExportFormat::from_extension(ext).unwrap_or_else(|| {
            warn!(format = ext, "unknown format, falling back to .html");
            ExportFormat::Html
        });
    }
    if let Some(ms) = media_timeout_ms {
        options.media_timeout = Some(std::time::Duration::from_millis(ms));
    }

    let raw = read_input(input)?;
    let tree: serde_json::Value =
        serde_json::from_str(&raw).wrap_err_with(|| format!("'{input}' is not valid JSON"))?;

    // Media must be attached to the materialized tree before export.
    let export_input = if media.is_empty() {
        ExportInput::Tree(tree)
    } else {
        let mut root = materialize(ExportInput::Tree(tree))?;
        for (src, path) in media {
            let bytes = std::fs::read(path)
                .wrap_err_with(|| format!("cannot read media file '{}'", path.display()))?;
            let object = Arc::new(MediaObject::new(guess_mime(path), bytes));
            let attached = root.attach_media(src, object);
            if attached == 0 {
                warn!(src, "no media-tag references this src");
            }
        }
        ExportInput::Materialized(root)
    };

    info!(input, format = %options.format, media = media.len(), "exporting document");

    let output = export_with(export_input, &options, Arc::new(DataUriResolver)).await;
    let Some(artifact) = output.into_artifact() else {
        return Err(eyre!("export of '{input}' produced no output (see log for details)"));
    };

    write_output(out, &artifact.bytes)?;
    info!(bytes = artifact.bytes.len(), mime = %artifact.mime_type, "artifact written");

    Ok(())
}

async fn cmd_import(input: &Path, out: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .wrap_err_with(|| format!("cannot read '{}'", input.display()))?;

    let is_markdown = matches!(
        input.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    );
    let body = if is_markdown {
        import_markdown(&content)
    } else {
        import_html(&content)
    };

    info!(input = %input.display(), markdown = is_markdown, "imported document");

    let tree = DocumentTree::from(&body);
    let mut json = serde_json::to_string_pretty(&tree)?;
    json.push('\n');
    write_output(out, json.as_bytes())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        return std::io::read_to_string(std::io::stdin()).wrap_err("cannot read stdin");
    }
    std::fs::read_to_string(input).wrap_err_with(|| format!("cannot read '{input}'"))
}

fn write_output(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes)
            .wrap_err_with(|| format!("cannot write '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// MIME type from a media file's extension.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
