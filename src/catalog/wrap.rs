//! Greedy line wrapping for serialized catalogs.
//!
//! Text is split into alternating whitespace and word chunks (words may also
//! split after an inner hyphen) and packed into lines no wider than the
//! requested column count. Words longer than a line are never broken; they
//! get a line of their own. Widths count characters, not bytes.

use std::collections::VecDeque;

pub(crate) struct WrapOptions<'a> {
    pub width: usize,
    pub initial_indent: &'a str,
    pub subsequent_indent: &'a str,
    /// Drop whitespace chunks at line boundaries.
    pub drop_whitespace: bool,
    pub break_on_hyphens: bool,
}

impl<'a> WrapOptions<'a> {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            initial_indent: "",
            subsequent_indent: "",
            drop_whitespace: true,
            break_on_hyphens: true,
        }
    }

    pub fn indent(mut self, indent: &'a str) -> Self {
        self.initial_indent = indent;
        self.subsequent_indent = indent;
        self
    }

    pub fn keep_whitespace(mut self) -> Self {
        self.drop_whitespace = false;
        self
    }

    pub fn no_hyphen_breaks(mut self) -> Self {
        self.break_on_hyphens = false;
        self
    }
}

pub(crate) fn wrap(text: &str, opts: &WrapOptions<'_>) -> Vec<String> {
    let mut chunks: VecDeque<&str> = split_chunks(text, opts.break_on_hyphens).into();
    let mut lines = Vec::new();

    while !chunks.is_empty() {
        let indent = if lines.is_empty() {
            opts.initial_indent
        } else {
            opts.subsequent_indent
        };
        let width = opts.width.saturating_sub(char_len(indent));

        let leading_blank = chunks.front().is_some_and(|c| is_blank(c));
        if opts.drop_whitespace && !lines.is_empty() && leading_blank {
            chunks.pop_front();
        }

        let mut line: Vec<&str> = Vec::new();
        let mut len = 0;
        while let Some(&chunk) = chunks.front() {
            let chunk_len = char_len(chunk);
            if len + chunk_len > width {
                break;
            }
            line.push(chunk);
            len += chunk_len;
            chunks.pop_front();
        }

        if line.is_empty() {
            if let Some(chunk) = chunks.pop_front() {
                line.push(chunk);
            }
        }

        if opts.drop_whitespace && line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }

        if !line.is_empty() {
            lines.push(format!("{indent}{}", line.concat()));
        }
    }

    lines
}

fn split_chunks(text: &str, break_on_hyphens: bool) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, c)) = iter.next() {
        if let Some(p) = prev {
            if p.is_whitespace() != c.is_whitespace() {
                chunks.push(&text[start..idx]);
                start = idx;
            }
        }
        prev = Some(c);

        if break_on_hyphens && c == '-' {
            let after_word = text[start..idx]
                .chars()
                .last()
                .is_some_and(char::is_alphanumeric);
            let before_word = iter.peek().is_some_and(|(_, next)| next.is_alphabetic());
            if after_word && before_word {
                let end = idx + c.len_utf8();
                chunks.push(&text[start..end]);
                start = end;
            }
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(char::is_whitespace)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
