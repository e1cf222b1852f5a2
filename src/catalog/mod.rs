//! Gettext catalog codec.
//!
//! This module reads PO/POT files into an ordered, in-memory `Catalog` and
//! writes them back. Parsing is strict about encoding (UTF-8 only, no
//! detection) and tolerant about layout; serialization applies the catalog's
//! wrap width the way gettext tools do, so a re-saved file diffs cleanly
//! against one produced by `msgmerge`.

pub mod model;
pub mod parse;
mod wrap;
pub mod write;

pub use model::{Catalog, Entry, Metadata, Occurrence};
pub use parse::parse_catalog;

pub use model::load_catalog_from_path;
