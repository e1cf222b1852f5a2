#![allow(dead_code)]

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const UI_TEMPLATE: &str = r#"# Collabora Online UI strings.
#
msgid ""
msgstr ""
"Project-Id-Version: loolui\n"
"Content-Type: text/plain; charset=ISO-8859-1\n"
"Content-Transfer-Encoding: 8bit\n"

#: src/control/Control.Menubar.js:101
msgid "Save"
msgstr ""

#: src/control/Control.Menubar.js:102
msgid "Print"
msgstr ""
"#;

pub const WELCOME_TEMPLATE: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: welcome\n"
"Content-Type: text/plain; charset=UTF-8\n"
"X-Generator: Translate Toolkit\n"

#: welcome-en-US.html+html.head.meta[name=description]:5-2
msgid "Welcome to the new release"
msgstr ""

#: welcome-en-US.html+html.body.div.h1:12-5
msgid "What's new"
msgstr ""

#: welcome-en-US.html+html.body.div.p:14-7
msgid ""
msgstr ""

#: welcome-en-US.html+html.body.div.p:16-7
#, fuzzy
msgid "Collaborative editing of spreadsheets is now faster, with improved rendering of charts."
msgstr ""
"#;

/// Source and target catalogs inside a private temp directory.
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Workspace {
    pub fn new(source: &str, target: &str) -> Result<Self> {
        Self::from_bytes(source.as_bytes(), target.as_bytes())
    }

    pub fn from_bytes(source: &[u8], target: &[u8]) -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate temp dir")?;
        let source_path = dir.path().join("welcome.pot");
        let target_path = dir.path().join("loolui.pot");
        fs::write(&source_path, source).context("writing source fixture")?;
        fs::write(&target_path, target).context("writing target fixture")?;
        Ok(Self {
            dir,
            source: source_path,
            target: target_path,
        })
    }

    pub fn target_text(&self) -> Result<String> {
        read_text(&self.target)
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn msgids(text: &str) -> Result<Vec<String>> {
    let catalog = welcome_catalog::parse_catalog(text)?;
    Ok(catalog.entries.into_iter().map(|entry| entry.msgid).collect())
}

pub fn run_append_welcome<P: AsRef<OsStr>>(args: &[P]) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_append-welcome"));
    cmd.args(args).env_remove("RUST_LOG");
    cmd.output().context("failed to execute append-welcome")
}
