//! Error types shared by the catalog codec and the merger.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Syntax error raised while parsing catalog text, before a path is known.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number of the offending line.
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog {} is not valid UTF-8", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
    #[error("malformed catalog {}:{}: {}", path.display(), source.line, source.message)]
    Syntax {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to write catalog {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A source entry has no occurrence whose path could be inspected.
    #[error("source entry #{index} (msgid {msgid:?}) has no occurrences")]
    MalformedEntry { index: usize, msgid: String },
}
