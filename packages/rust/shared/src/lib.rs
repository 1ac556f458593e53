//! Shared types, error model, and configuration for the pad export pipeline.
//!
//! This crate is the foundation depended on by all other padexport crates.
//! It provides:
//! - [`PadExportError`]: the unified error type
//! - Domain types ([`ExportFormat`], [`ExportArtifact`], [`ExportOutput`], [`MediaObject`])
//! - The renderable node graph ([`Node`], [`Element`]) and its serialized
//!   source form ([`DocumentTree`])
//! - Configuration ([`AppConfig`], [`ExportOptions`], config loading)

pub mod config;
pub mod error;
pub mod node;
pub mod tree;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExportDefaultsConfig, ExportOptions, MediaConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{PadExportError, Result};
pub use node::{DRAG_HANDLE_CLASS, Element, MEDIA_TAG, Node};
pub use tree::DocumentTree;
pub use types::{ExportArtifact, ExportFormat, ExportOutput, MediaObject};
