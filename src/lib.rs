pub mod catalog;
pub mod error;
pub mod merge;

pub use catalog::{Catalog, Entry, Metadata, Occurrence, load_catalog_from_path, parse_catalog};
pub use error::{CatalogError, MergeError, ParseError};
pub use merge::{
    Admission, HTML_META_MARKER, MergeOptions, MergeReport, TARGET_WRAP_WIDTH, UTF8_CONTENT_TYPE,
    admission, append_entries, merge_files,
};

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
