// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;
use tracing::debug;

const FALLBACK_EDITOR: &str = "vi";
const TITLE_FALLBACK_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    argv: Vec<String>,
}

impl Editor {
    pub fn new(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() {
            bail!("editor command is empty");
        }
        Ok(Self { argv })
    }

    pub fn from_config(configured: Option<&str>) -> Result<Self> {
        Self::resolve(
            configured,
            env::var("VISUAL").ok(),
            env::var("EDITOR").ok(),
        )
    }

    fn resolve(
        configured: Option<&str>,
        visual: Option<String>,
        editor: Option<String>,
    ) -> Result<Self> {
        let command = configured
            .map(str::to_owned)
            .into_iter()
            .chain(visual)
            .chain(editor)
            .find(|command| !command.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_owned());
        Self::new(command.split_whitespace().map(str::to_owned).collect())
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn edit_text(&self, initial: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("notepad-")
            .suffix(".txt")
            .tempfile()
            .context("create temp file for editor")?;
        file.write_all(initial.as_bytes())
            .context("write note to temp file")?;
        file.flush().context("flush temp file")?;

        debug!(editor = %self.program(), path = %file.path().display(), "launching editor");
        let status = Command::new(self.program())
            .args(&self.argv[1..])
            .arg(file.path())
            .status()
            .with_context(|| {
                format!(
                    "launch editor {:?}; set [editor] command or $EDITOR",
                    self.program()
                )
            })?;
        if !status.success() {
            return Err(anyhow!(
                "editor {:?} exited with {status}; note left unchanged",
                self.program()
            ));
        }

        fs::read_to_string(file.path()).context("read edited note")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteText {
    pub title: String,
    pub note: String,
}

impl NoteText {
    pub fn render(title: &str, note: &str) -> String {
        format!("{title}\n{note}")
    }

    pub fn parse(raw: &str) -> Self {
        let (first, rest) = raw.split_once('\n').unwrap_or((raw, ""));
        let note = rest.trim_end_matches('\n').to_owned();
        let mut title = first.trim().to_owned();
        if title.is_empty() {
            title = note
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .chars()
                .take(TITLE_FALLBACK_CHARS)
                .collect::<String>()
                .trim_end()
                .to_owned();
        }
        Self { title, note }
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.note.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Editor, NoteText};
    use anyhow::Result;

    #[test]
    fn configured_command_wins_over_environment() -> Result<()> {
        let editor = Editor::resolve(
            Some("code --wait"),
            Some("nvim".to_owned()),
            Some("nano".to_owned()),
        )?;
        assert_eq!(editor, Editor::new(vec!["code".into(), "--wait".into()])?);
        Ok(())
    }

    #[test]
    fn falls_back_through_visual_editor_then_vi() -> Result<()> {
        assert_eq!(
            Editor::resolve(None, Some("nvim".to_owned()), Some("nano".to_owned()))?.program(),
            "nvim"
        );
        assert_eq!(
            Editor::resolve(None, Some(" ".to_owned()), Some("nano".to_owned()))?.program(),
            "nano"
        );
        assert_eq!(Editor::resolve(None, None, None)?.program(), "vi");
        Ok(())
    }

    #[test]
    fn empty_argv_is_rejected() {
        assert!(Editor::new(Vec::new()).is_err());
    }

    #[test]
    fn note_text_splits_title_from_body() {
        let text = NoteText::parse("Groceries\nmilk\neggs\n");
        assert_eq!(text.title, "Groceries");
        assert_eq!(text.note, "milk\neggs");
        assert_eq!(
            NoteText::parse(&NoteText::render("Groceries", "milk\neggs")),
            text
        );
    }

    #[test]
    fn blank_title_falls_back_to_body_prefix() {
        let text = NoteText::parse("\ncall the plumber about the kitchen sink tomorrow");
        assert_eq!(text.title, "call the plumber about the kit");
        assert_eq!(text.title.chars().count(), 30);
    }

    #[test]
    fn empty_text_is_blank() {
        assert!(NoteText::parse("").is_blank());
        assert!(NoteText::parse("  \n\n  \n").is_blank());
        assert!(!NoteText::parse("x").is_blank());
    }

    #[cfg(unix)]
    #[test]
    fn edit_text_returns_file_contents_after_editor_exits() -> Result<()> {
        let untouched = Editor::new(vec!["true".to_owned()])?;
        assert_eq!(untouched.edit_text("Todo\nship it")?, "Todo\nship it");

        let rewriting = Editor::new(vec![
            "sh".to_owned(),
            "-c".to_owned(),
            "printf 'Todo today\\nship it' > \"$1\"".to_owned(),
            "sh".to_owned(),
        ])?;
        assert_eq!(rewriting.edit_text("Todo\n")?, "Todo today\nship it");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_is_an_error() -> Result<()> {
        let editor = Editor::new(vec!["false".to_owned()])?;
        let error = editor.edit_text("x").expect_err("false exits 1");
        assert!(error.to_string().contains("note left unchanged"));
        Ok(())
    }
}
