//! PO serialization and save.

use crate::catalog::model::{Catalog, Entry, Metadata};
use crate::catalog::wrap::{WrapOptions, char_len, wrap};
use crate::error::CatalogError;
use std::fs;
use std::path::Path;

// gettext's canonical header order; anything else follows sorted by key.
const STANDARD_METADATA_KEYS: [&str; 11] = [
    "Project-Id-Version",
    "Report-Msgid-Bugs-To",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Last-Translator",
    "Language-Team",
    "Language",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Plural-Forms",
];

impl Catalog {
    /// Render the catalog as PO text using `self.wrap_width`.
    pub fn to_po_string(&self) -> String {
        let width = self.wrap_width.filter(|w| *w > 0);
        let mut out = String::new();

        if !self.header.is_empty() {
            for line in self.header.split('\n') {
                if line.is_empty() {
                    out.push_str("#\n");
                } else {
                    out.push_str("# ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        write_block(&mut out, &self.header_entry(), width);

        let live = self.entries.iter().filter(|e| !e.obsolete);
        let obsolete = self.entries.iter().filter(|e| e.obsolete);
        for entry in live.chain(obsolete) {
            out.push('\n');
            write_block(&mut out, entry, width);
        }
        out
    }

    /// Overwrite `path` with the serialized catalog.
    ///
    /// The file is opened for writing through its existing path, so a
    /// read-only target is an error and a symlinked target updates the file
    /// it points to. The text is rendered before the file is touched.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let text = self.to_po_string();
        fs::write(path, text).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            entries = self.entries.len(),
            wrap_width = ?self.wrap_width,
            "saved catalog"
        );
        Ok(())
    }

    /// Header pseudo-entry; a single metadata field stays on the msgstr line.
    fn header_entry(&self) -> Entry {
        let mut entry = Entry::new("");
        if self.metadata_is_fuzzy {
            entry.flags.push("fuzzy".to_string());
        }
        entry.msgstr = ordered_metadata(&self.metadata)
            .into_iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect();
        entry
    }
}

fn ordered_metadata(metadata: &Metadata) -> Vec<(&str, &str)> {
    let mut ordered: Vec<(&str, &str)> = STANDARD_METADATA_KEYS
        .iter()
        .filter_map(|key| metadata.get(key).map(|value| (*key, value)))
        .collect();
    let mut rest: Vec<(&str, &str)> = metadata
        .iter()
        .filter(|(key, _)| !STANDARD_METADATA_KEYS.contains(key))
        .collect();
    rest.sort_by(|a, b| a.0.cmp(b.0));
    ordered.extend(rest);
    ordered
}

fn write_block(out: &mut String, entry: &Entry, width: Option<usize>) {
    let mut lines: Vec<String> = Vec::new();

    write_comment(&mut lines, &entry.translator_comment, "# ", width);
    if !entry.obsolete {
        write_comment(&mut lines, &entry.extracted_comment, "#. ", width);
        write_references(&mut lines, entry, width);
    }
    if !entry.flags.is_empty() {
        lines.push(format!("#, {}", entry.flags.join(", ")));
    }

    let delflag = if entry.obsolete { "#~ " } else { "" };
    let previous_flag = if entry.obsolete { "#~| " } else { "#| " };
    let previous = [
        ("msgctxt", &entry.previous_msgctxt),
        ("msgid", &entry.previous_msgid),
        ("msgid_plural", &entry.previous_msgid_plural),
    ];
    for (keyword, value) in previous {
        if let Some(value) = value {
            write_field(&mut lines, previous_flag, keyword, "", value, width);
        }
    }

    if let Some(msgctxt) = &entry.msgctxt {
        write_field(&mut lines, delflag, "msgctxt", "", msgctxt, width);
    }
    write_field(&mut lines, delflag, "msgid", "", &entry.msgid, width);
    if let Some(plural) = &entry.msgid_plural {
        write_field(&mut lines, delflag, "msgid_plural", "", plural, width);
    }
    if entry.msgstr_plural.is_empty() {
        if entry.msgid_plural.is_some() {
            write_field(&mut lines, delflag, "msgstr", "[0]", "", width);
        } else {
            write_field(&mut lines, delflag, "msgstr", "", &entry.msgstr, width);
        }
    } else {
        for (index, value) in &entry.msgstr_plural {
            let index = format!("[{index}]");
            write_field(&mut lines, delflag, "msgstr", &index, value, width);
        }
    }

    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
}

fn write_comment(lines: &mut Vec<String>, comment: &str, prefix: &str, width: Option<usize>) {
    if comment.is_empty() {
        return;
    }
    for line in comment.split('\n') {
        match width {
            Some(width) if char_len(line) + char_len(prefix) > width => {
                lines.extend(wrap(line, &WrapOptions::new(width).indent(prefix)));
            }
            _ if line.is_empty() => lines.push(prefix.trim_end().to_string()),
            _ => lines.push(format!("{prefix}{line}")),
        }
    }
}

fn write_references(lines: &mut Vec<String>, entry: &Entry, width: Option<usize>) {
    if entry.occurrences.is_empty() {
        return;
    }
    let joined = entry
        .occurrences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    match width {
        Some(width) if char_len(&joined) + 3 > width => {
            lines.extend(wrap(
                &joined,
                &WrapOptions::new(width).indent("#: ").no_hyphen_breaks(),
            ));
        }
        _ => lines.push(format!("#: {joined}")),
    }
}

fn write_field(
    lines: &mut Vec<String>,
    delflag: &str,
    keyword: &str,
    plural_index: &str,
    value: &str,
    width: Option<usize>,
) {
    let parts: Vec<&str> = value.split_inclusive('\n').collect();
    let segments = if parts.len() > 1 {
        std::iter::once(String::new())
            .chain(parts.into_iter().map(escape))
            .collect()
    } else {
        wrap_single(keyword, plural_index, value, width)
    };

    let mut segments = segments.into_iter();
    let first = segments.next().unwrap_or_default();
    lines.push(format!("{delflag}{keyword}{plural_index} \"{first}\""));
    for segment in segments {
        lines.push(format!("{delflag}\"{segment}\""));
    }
}

/// Split a single-line value into escaped, quoted segments. The first
/// segment is empty when the value had to be wrapped.
///
/// The overflow test counts the unescaped value minus its escapable
/// characters, so values with quotes or backslashes wrap at the same point
/// gettext-style tooling wraps them.
fn wrap_single(
    keyword: &str,
    plural_index: &str,
    value: &str,
    width: Option<usize>,
) -> Vec<String> {
    let field_len = keyword.len() + plural_index.len() + 3;
    let specials = value
        .chars()
        .filter(|c| matches!(c, '\\' | '\n' | '\r' | '\t' | '"'))
        .count();
    let escaped = escape(value);
    match width {
        Some(width) if char_len(value) + field_len > width + specials => {
            let mut segments = vec![String::new()];
            segments.extend(wrap(
                &escaped,
                &WrapOptions::new(width.saturating_sub(2).max(1)).keep_whitespace(),
            ));
            segments
        }
        _ => vec![escaped],
    }
}

pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
