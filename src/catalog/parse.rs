//! Line-oriented PO/POT parser.

use crate::catalog::model::{Catalog, Entry, Metadata, Occurrence};
use crate::error::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
    PreviousMsgctxt,
    PreviousMsgid,
    PreviousMsgidPlural,
}

#[derive(Default)]
struct Pending {
    entry: Entry,
    has_msgid: bool,
    has_msgstr: bool,
}

struct Parser {
    catalog: Catalog,
    pending: Pending,
    last_field: Option<Field>,
}

/// Parse PO/POT text into a catalog.
///
/// The first live entry with an empty msgid and no context, wherever it sits
/// in the file, becomes the catalog header. Any other empty-msgid entry stays
/// an ordinary entry.
pub fn parse_catalog(input: &str) -> Result<Catalog, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut parser = Parser {
        catalog: Catalog::new(),
        pending: Pending::default(),
        last_field: None,
    };
    for (idx, line) in input.lines().enumerate() {
        parser.line(idx + 1, line)?;
    }
    parser.finish_entry();
    let mut catalog = parser.catalog;
    promote_header(&mut catalog);
    Ok(catalog)
}

fn promote_header(catalog: &mut Catalog) {
    let Some(pos) = catalog
        .entries
        .iter()
        .position(|e| e.msgid.is_empty() && e.msgctxt.is_none() && !e.obsolete)
    else {
        return;
    };
    let header = catalog.entries.remove(pos);
    catalog.metadata_is_fuzzy = header.is_fuzzy();
    catalog.metadata = Metadata::from_header(&header.msgstr);
    catalog.header = header.translator_comment;
}

impl Parser {
    fn line(&mut self, lineno: usize, raw: &str) -> Result<(), ParseError> {
        let line = raw.trim();
        if line.is_empty() {
            if self.pending.has_msgid {
                self.finish_entry();
            }
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let body = rest.trim_start();
            if body.is_empty() {
                return Ok(());
            }
            if let Some(previous) = body.strip_prefix('|') {
                self.start_entry_if_complete(lineno);
                self.pending.entry.obsolete = true;
                return self.previous(lineno, previous.trim_start());
            }
            if opens_entry(body) {
                self.start_entry_if_complete(lineno);
            }
            self.pending.entry.obsolete = true;
            return self.keyword(lineno, body);
        }

        if let Some(rest) = line.strip_prefix('#') {
            self.start_entry_if_complete(lineno);
            let entry = &mut self.pending.entry;
            match rest.chars().next() {
                Some(':') => entry
                    .occurrences
                    .extend(rest[1..].split_whitespace().map(Occurrence::from_reference)),
                Some(',') => entry.flags.extend(
                    rest[1..]
                        .split(',')
                        .map(str::trim)
                        .filter(|flag| !flag.is_empty())
                        .map(str::to_string),
                ),
                Some('.') => push_comment(&mut entry.extracted_comment, rest[1..].trim()),
                Some('|') => return self.previous(lineno, rest[1..].trim_start()),
                Some(' ') => push_comment(&mut entry.translator_comment, &rest[1..]),
                _ => push_comment(&mut entry.translator_comment, rest),
            }
            return Ok(());
        }

        if opens_entry(line) {
            self.start_entry_if_complete(lineno);
        }
        self.keyword(lineno, line)
    }

    fn keyword(&mut self, lineno: usize, body: &str) -> Result<(), ParseError> {
        if body.starts_with('"') {
            let value = unquote(lineno, body)?;
            return self.continue_field(lineno, &value);
        }

        let (keyword, rest) = split_keyword(body);
        let value = unquote(lineno, rest)?;
        if self.pending.entry.source_line.is_none() {
            self.pending.entry.source_line = Some(lineno);
        }
        let entry = &mut self.pending.entry;
        let field = match keyword {
            "msgctxt" => {
                entry.msgctxt = Some(value);
                Field::Msgctxt
            }
            "msgid" => {
                if self.pending.has_msgid {
                    return Err(ParseError::new(lineno, "msgid without a preceding msgstr"));
                }
                entry.msgid = value;
                self.pending.has_msgid = true;
                Field::Msgid
            }
            "msgid_plural" => {
                entry.msgid_plural = Some(value);
                Field::MsgidPlural
            }
            "msgstr" => {
                entry.msgstr = value;
                self.pending.has_msgstr = true;
                Field::Msgstr
            }
            other => {
                let index = plural_index(lineno, other)?;
                entry.msgstr_plural.insert(index, value);
                self.pending.has_msgstr = true;
                Field::MsgstrPlural(index)
            }
        };
        self.last_field = Some(field);
        Ok(())
    }

    fn previous(&mut self, lineno: usize, body: &str) -> Result<(), ParseError> {
        if body.starts_with('"') {
            let value = unquote(lineno, body)?;
            return match self.last_field {
                Some(
                    Field::PreviousMsgctxt | Field::PreviousMsgid | Field::PreviousMsgidPlural,
                ) => self.continue_field(lineno, &value),
                _ => Err(ParseError::new(
                    lineno,
                    "continuation of a previous field without a keyword",
                )),
            };
        }

        let (keyword, rest) = split_keyword(body);
        let value = Some(unquote(lineno, rest)?);
        let entry = &mut self.pending.entry;
        let field = match keyword {
            "msgctxt" => {
                entry.previous_msgctxt = value;
                Field::PreviousMsgctxt
            }
            "msgid" => {
                entry.previous_msgid = value;
                Field::PreviousMsgid
            }
            "msgid_plural" => {
                entry.previous_msgid_plural = value;
                Field::PreviousMsgidPlural
            }
            other => {
                return Err(ParseError::new(
                    lineno,
                    format!("unknown previous-field keyword '{other}'"),
                ));
            }
        };
        self.last_field = Some(field);
        Ok(())
    }

    fn continue_field(&mut self, lineno: usize, value: &str) -> Result<(), ParseError> {
        let entry = &mut self.pending.entry;
        let target = match self.last_field {
            Some(Field::Msgctxt) => entry.msgctxt.get_or_insert_with(String::new),
            Some(Field::Msgid) => &mut entry.msgid,
            Some(Field::MsgidPlural) => entry.msgid_plural.get_or_insert_with(String::new),
            Some(Field::Msgstr) => &mut entry.msgstr,
            Some(Field::MsgstrPlural(index)) => entry.msgstr_plural.entry(index).or_default(),
            Some(Field::PreviousMsgctxt) => {
                entry.previous_msgctxt.get_or_insert_with(String::new)
            }
            Some(Field::PreviousMsgid) => entry.previous_msgid.get_or_insert_with(String::new),
            Some(Field::PreviousMsgidPlural) => {
                entry.previous_msgid_plural.get_or_insert_with(String::new)
            }
            None => {
                return Err(ParseError::new(
                    lineno,
                    "continuation line without a preceding keyword",
                ));
            }
        };
        target.push_str(value);
        Ok(())
    }

    /// Comments and `msgctxt`/`msgid` after a `msgstr` open the next entry.
    fn start_entry_if_complete(&mut self, lineno: usize) {
        if self.pending.has_msgstr {
            self.finish_entry();
        }
        if self.pending.entry.source_line.is_none() {
            self.pending.entry.source_line = Some(lineno);
        }
    }

    fn finish_entry(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.last_field = None;
        if !pending.has_msgid {
            return;
        }
        self.catalog.entries.push(pending.entry);
    }
}

fn push_comment(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}

fn opens_entry(body: &str) -> bool {
    matches!(split_keyword(body).0, "msgctxt" | "msgid")
}

fn split_keyword(body: &str) -> (&str, &str) {
    match body.find(|c: char| c.is_whitespace() || c == '"') {
        Some(pos) => (&body[..pos], body[pos..].trim_start()),
        None => (body, ""),
    }
}

fn plural_index(lineno: usize, keyword: &str) -> Result<usize, ParseError> {
    let index = keyword
        .strip_prefix("msgstr[")
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ParseError::new(lineno, format!("unknown keyword '{keyword}'")))?;
    index
        .parse()
        .map_err(|_| ParseError::new(lineno, format!("invalid plural index '{index}'")))
}

fn unquote(lineno: usize, raw: &str) -> Result<String, ParseError> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .filter(|_| raw.len() >= 2)
        .ok_or_else(|| ParseError::new(lineno, format!("expected a quoted string, got {raw}")))?;
    Ok(unescape(inner))
}

pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0c}'),
            Some('v') => out.push('\u{0b}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
