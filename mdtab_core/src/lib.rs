//! `mdtab_core` is the core library for [mdtab](https://github.com/ifiokjr/mdtab). It rewrites the tables found in generated documentation into one canonical markdown form: html `<table>` fragments become markdown tables and broken markdown tables are repaired.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document text
//!   -> Html conversion (regex locates <table> fragments, logos tokenizes rows and cells)
//!   -> Separator repair (malformed `|---|--|` lines become `| ----- | ----- |`)
//!   -> Row stitching (wrapped continuation lines are merged into their row)
//!   -> Structure validation (missing separators inserted, rows padded or truncated)
//! ```
//!
//! Every pass reports whether it changed the text. The document is dirty when
//! any pass changed it, and only dirty files are written back.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `mdtab.toml`.
//! - [`project`]: File collection, backups and atomic write-back.
//!
//! ## Key Types
//!
//! - [`NormalizeOptions`]: Options shared by every pass.
//! - [`Normalized`]: The normalized text, the dirty flag and the passes that
//!   changed the document.
//! - [`TableFragment`]: One html table located in a document.
//! - [`MdtabConfig`]: Configuration loaded from `mdtab.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdtab_core::NormalizeOptions;
//! use mdtab_core::normalize;
//!
//! let html = "<table><tr><th>Field</th><th>Description</th></tr><tr><td>a</td><td>b</td></tr></table>";
//! let normalized = normalize(html, &NormalizeOptions::default());
//!
//! assert!(normalized.changed);
//! assert_eq!(
//! 	normalized.content,
//! 	"| Field | Description |\n| ----- | ----- |\n| a | b |\n"
//! );
//! ```

pub use config::*;
pub use error::*;
pub use extractor::*;
pub use pipeline::*;
pub use project::*;
pub use render::*;
pub use separator::*;
pub use stitcher::*;
pub use table::*;
pub use validator::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod extractor;
pub(crate) mod lexer;
pub mod lines;
mod pipeline;
pub mod project;
mod render;
mod separator;
mod stitcher;
mod table;
mod validator;

#[cfg(test)]
mod __fixtures;
