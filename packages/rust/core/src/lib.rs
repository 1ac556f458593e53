//! Document export pipeline for padexport.
//!
//! This crate ties together tree materialization, media resolution, markup
//! sanitization, and the per-format emitters into a single `export` call.
//! It also provides the reverse direction (`import`) for Markdown and HTML.

pub mod emit;
pub mod import;
pub mod materialize;
pub mod media;
pub mod pipeline;
pub mod sanitize;

pub use materialize::{ExportInput, materialize};
pub use media::{DataUriResolver, MediaResolver, resolve_media};
pub use pipeline::{export, export_then, export_with};
