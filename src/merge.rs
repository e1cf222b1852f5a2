//! Appends welcome-dialog strings to the UI catalog.
//!
//! The welcome dialog is extracted from HTML with html2po, which also emits
//! entries for `<head><meta>` content nobody translates. Those entries and
//! empty msgids are dropped; everything else is appended to the UI catalog
//! in source order. The merge is append-only: running it twice against the
//! same target duplicates the admitted entries.

use crate::catalog::{Catalog, Entry};
use crate::error::MergeError;
use std::path::Path;

/// Reference-path fragment html2po gives strings pulled from `<head><meta>`.
pub const HTML_META_MARKER: &str = "html.head.meta";
pub const UTF8_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";
pub const TARGET_WRAP_WIDTH: usize = 78;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub meta_marker: String,
    pub content_type: String,
    /// Wrap width the target is written with; `None` disables wrapping.
    pub target_wrap_width: Option<usize>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            meta_marker: HTML_META_MARKER.to_string(),
            content_type: UTF8_CONTENT_TYPE.to_string(),
            target_wrap_width: Some(TARGET_WRAP_WIDTH),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Admit,
    SkipHtmlMeta,
    SkipEmptyMsgid,
}

/// Counts of what happened to each source entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub admitted: usize,
    pub skipped_html_meta: usize,
    pub skipped_empty_msgid: usize,
}

impl MergeReport {
    fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Admit => self.admitted += 1,
            Admission::SkipHtmlMeta => self.skipped_html_meta += 1,
            Admission::SkipEmptyMsgid => self.skipped_empty_msgid += 1,
        }
    }
}

/// Decide whether a source entry belongs in the target.
///
/// The meta check runs first and needs the entry's first occurrence, so an
/// entry without occurrences is an error even when its msgid is empty.
pub fn admission(
    entry: &Entry,
    index: usize,
    options: &MergeOptions,
) -> Result<Admission, MergeError> {
    let first = entry
        .first_occurrence()
        .ok_or_else(|| MergeError::MalformedEntry {
            index,
            msgid: entry.msgid.clone(),
        })?;
    if first.path.contains(options.meta_marker.as_str()) {
        return Ok(Admission::SkipHtmlMeta);
    }
    if entry.msgid.is_empty() {
        return Ok(Admission::SkipEmptyMsgid);
    }
    Ok(Admission::Admit)
}

/// Append the admitted `source` entries to `target`.
///
/// Nothing is appended unless every source entry can be classified.
pub fn append_entries<I>(
    target: &mut Catalog,
    source: I,
    options: &MergeOptions,
) -> Result<MergeReport, MergeError>
where
    I: IntoIterator<Item = Entry>,
{
    let mut report = MergeReport::default();
    let mut admitted = Vec::new();
    for (index, entry) in source.into_iter().enumerate() {
        let decision = admission(&entry, index, options)?;
        report.record(decision);
        if decision == Admission::Admit {
            admitted.push(entry);
        } else {
            tracing::debug!(index, msgid = %entry.msgid, ?decision, "skipping source entry");
        }
    }
    target.entries.extend(admitted);
    Ok(report)
}

/// Load both catalogs, append the admitted source entries to the target,
/// force the target's `Content-Type` and overwrite the target file.
///
/// The source file is only read. Any failure before the final save leaves
/// the target file untouched.
pub fn merge_files(
    source_path: &Path,
    target_path: &Path,
    options: &MergeOptions,
) -> Result<MergeReport, MergeError> {
    let source = Catalog::load(source_path, None)?;
    let mut target = Catalog::load(target_path, options.target_wrap_width)?;
    let existing = target.len();

    let report = append_entries(&mut target, source.entries, options)?;
    target
        .metadata
        .set("Content-Type", options.content_type.as_str());
    target.save(target_path)?;

    tracing::info!(
        source = %source_path.display(),
        target = %target_path.display(),
        existing,
        admitted = report.admitted,
        skipped_html_meta = report.skipped_html_meta,
        skipped_empty_msgid = report.skipped_empty_msgid,
        "merged catalogs"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(msgid: &str, path: &str) -> Entry {
        Entry::new(msgid).with_occurrence(path, Some(1))
    }

    #[test]
    fn admits_only_non_meta_entries_with_msgid() {
        let options = MergeOptions::default();
        let cases = [
            (entry("Hello", "welcome.html"), Admission::Admit),
            (
                entry("Hello", "welcome.html+html.head.meta"),
                Admission::SkipHtmlMeta,
            ),
            (entry("", "welcome.html"), Admission::SkipEmptyMsgid),
            (entry("", "x.html.head.meta"), Admission::SkipHtmlMeta),
            (
                entry("Hello", "html.head.metadata/page.html"),
                Admission::SkipHtmlMeta,
            ),
        ];
        for (idx, (entry, expected)) in cases.iter().enumerate() {
            assert_eq!(
                admission(entry, idx, &options).unwrap(),
                *expected,
                "case {idx}"
            );
        }
    }

    #[test]
    fn only_first_occurrence_is_inspected() {
        let entry = Entry::new("Hello")
            .with_occurrence("welcome.html", Some(3))
            .with_occurrence("welcome.html+html.head.meta", Some(1));
        assert_eq!(
            admission(&entry, 0, &MergeOptions::default()).unwrap(),
            Admission::Admit
        );
    }

    #[test]
    fn missing_occurrence_is_malformed_even_for_empty_msgid() {
        let err = admission(&Entry::new(""), 4, &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, MergeError::MalformedEntry { index: 4, .. }));
    }

    #[test]
    fn scenario_drops_meta_and_empty_entries() {
        let source = vec![
            entry("", "x.html.head.meta"),
            Entry::new("Hello").with_occurrence("welcome.html", Some(3)),
            entry("", "y"),
        ];
        let mut target = Catalog::new();
        let report = append_entries(&mut target, source, &MergeOptions::default()).unwrap();

        assert_eq!(target.len(), 1);
        assert_eq!(target.entries[0].msgid, "Hello");
        assert_eq!(
            report,
            MergeReport {
                admitted: 1,
                skipped_html_meta: 1,
                skipped_empty_msgid: 1,
            }
        );
    }

    #[test]
    fn appends_after_existing_entries_in_source_order() {
        let mut target = Catalog::new();
        target.append(entry("Existing", "src/ui.js"));
        let source = vec![entry("First", "welcome.html"), entry("Second", "welcome.html")];
        append_entries(&mut target, source, &MergeOptions::default()).unwrap();

        let ids: Vec<_> = target.iter().map(|e| e.msgid.as_str()).collect();
        assert_eq!(ids, ["Existing", "First", "Second"]);
    }

    #[test]
    fn malformed_entry_leaves_target_untouched() {
        let mut target = Catalog::new();
        target.append(entry("Existing", "src/ui.js"));
        let before = target.clone();
        let source = vec![entry("First", "welcome.html"), Entry::new("Broken")];

        let err = append_entries(&mut target, source, &MergeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MergeError::MalformedEntry { index: 1, ref msgid } if msgid == "Broken"
        ));
        assert_eq!(target, before);
    }

    #[test]
    fn custom_marker_is_honoured() {
        let options = MergeOptions {
            meta_marker: "html.head.title".to_string(),
            ..MergeOptions::default()
        };
        assert_eq!(
            admission(&entry("Hi", "w.html+html.head.meta"), 0, &options).unwrap(),
            Admission::Admit
        );
        assert_eq!(
            admission(&entry("Hi", "w.html+html.head.title"), 0, &options).unwrap(),
            Admission::SkipHtmlMeta
        );
    }
}
