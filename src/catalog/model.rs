//! In-memory catalog types.
//!
//! A `Catalog` mirrors a PO/POT file: an optional header entry (split into the
//! file-level comment, the metadata fields and the fuzzy flag) followed by the
//! message entries in file order. Entries keep every field the codec
//! understands so a load/save cycle only changes line wrapping and metadata
//! ordering.

use crate::catalog::parse::parse_catalog;
use crate::error::{CatalogError, ParseError};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Where a message was found in source material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub path: String,
    pub line: Option<u32>,
}

impl Occurrence {
    pub fn new(path: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Split a `#:` reference token. A suffix after the last `:` that is not
    /// a line number stays part of the path.
    pub fn from_reference(token: &str) -> Self {
        if let Some((path, line)) = token.rsplit_once(':') {
            if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(line) = line.parse() {
                    return Self::new(path, Some(line));
                }
            }
        }
        Self::new(token, None)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.path, line),
            None => f.write_str(&self.path),
        }
    }
}

/// One message record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    /// `msgstr[N]` values keyed by plural index.
    pub msgstr_plural: BTreeMap<usize, String>,
    pub occurrences: Vec<Occurrence>,
    /// `# ` lines, joined with `\n`.
    pub translator_comment: String,
    /// `#.` lines, joined with `\n`.
    pub extracted_comment: String,
    pub flags: Vec<String>,
    pub previous_msgctxt: Option<String>,
    pub previous_msgid: Option<String>,
    pub previous_msgid_plural: Option<String>,
    pub obsolete: bool,
    /// 1-based line of the entry's first line in the file it was parsed from.
    pub source_line: Option<usize>,
}

impl Entry {
    pub fn new(msgid: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            ..Self::default()
        }
    }

    pub fn with_msgstr(mut self, msgstr: impl Into<String>) -> Self {
        self.msgstr = msgstr.into();
        self
    }

    pub fn with_occurrence(mut self, path: impl Into<String>, line: Option<u32>) -> Self {
        self.occurrences.push(Occurrence::new(path, line));
        self
    }

    pub fn first_occurrence(&self) -> Option<&Occurrence> {
        self.occurrences.first()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }
}

/// Header fields in insertion order. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: Vec<(String, String)>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite `key`, keeping the position of an existing field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build metadata from a header `msgstr` made of `Key: Value` lines.
    /// Lines without a colon continue the previous value.
    pub(crate) fn from_header(msgstr: &str) -> Self {
        let mut metadata = Self::default();
        for line in msgstr.lines() {
            if let Some((key, value)) = line.split_once(':') {
                metadata.set(key.trim(), value.trim());
            } else if !line.trim().is_empty() {
                if let Some((_, value)) = metadata.fields.last_mut() {
                    value.push('\n');
                    value.push_str(line.trim());
                }
            }
        }
        metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// File-level comment carried by the header entry, lines joined with `\n`.
    pub header: String,
    pub metadata: Metadata,
    pub metadata_is_fuzzy: bool,
    pub entries: Vec<Entry>,
    /// Column limit used by `save`; `None` disables wrapping.
    pub wrap_width: Option<usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse catalog text. The returned catalog does not wrap on output.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_catalog(input)
    }

    /// Read and parse a catalog file as strict UTF-8.
    pub fn load(path: &Path, wrap_width: Option<usize>) -> Result<Self, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| CatalogError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog = parse_catalog(&text).map_err(|source| CatalogError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.wrap_width = wrap_width;
        tracing::debug!(
            path = %path.display(),
            entries = catalog.entries.len(),
            metadata = catalog.metadata.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Load a catalog with wrapping disabled.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog, CatalogError> {
    Catalog::load(path, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_with_line_number_splits() {
        let occ = Occurrence::from_reference("src/welcome.html:12");
        assert_eq!(occ, Occurrence::new("src/welcome.html", Some(12)));
        assert_eq!(occ.to_string(), "src/welcome.html:12");
    }

    #[test]
    fn reference_with_non_numeric_suffix_stays_whole() {
        let occ = Occurrence::from_reference("welcome.html+html.body.p:33-5");
        assert_eq!(occ.path, "welcome.html+html.body.p:33-5");
        assert_eq!(occ.line, None);

        let bare = Occurrence::from_reference("welcome.html");
        assert_eq!(bare, Occurrence::new("welcome.html", None));
    }

    #[test]
    fn metadata_set_overwrites_in_place() {
        let mut metadata = Metadata::from_header(
            "Project-Id-Version: ui\nContent-Type: text/plain; charset=ISO-8859-1\nLanguage: de\n",
        );
        metadata.set("Content-Type", "text/plain; charset=UTF-8");
        let keys: Vec<_> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Project-Id-Version", "Content-Type", "Language"]);
        assert_eq!(
            metadata.get("Content-Type"),
            Some("text/plain; charset=UTF-8")
        );
    }

    #[test]
    fn metadata_header_continuation_lines_extend_previous_value() {
        let metadata = Metadata::from_header("Plural-Forms: nplurals=2;\n plural=(n != 1);\n");
        assert_eq!(
            metadata.get("Plural-Forms"),
            Some("nplurals=2;\nplural=(n != 1);")
        );
    }
}
