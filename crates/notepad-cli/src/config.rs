// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use notepad_app::{AlternativeAction, CaseSensitivity, Locator, SortOrder};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_QUERY_TIMEOUT: &str = "2s";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub editor: Editor,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub menu: Menu,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            editor: Editor::default(),
            log: Log::default(),
            menu: Menu::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub case_sensitive_search: Option<bool>,
    pub sort_order: Option<String>,
    pub query_timeout: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            case_sensitive_search: Some(false),
            sort_order: Some(SortOrder::default().as_str().to_owned()),
            query_timeout: Some(DEFAULT_QUERY_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Editor {
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub actions: Vec<MenuAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuAction {
    pub label: String,
    pub command: String,
    pub scope: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("NOTEPAD_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set NOTEPAD_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(notepad_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            notepad_db::validate_db_path(db_path)?;
        }

        if let Some(sort_order) = &self.ui.sort_order
            && SortOrder::parse(sort_order).is_none()
        {
            bail!(
                "ui.sort_order in {} is {sort_order:?}; use one of: {}",
                path.display(),
                SortOrder::ALL
                    .iter()
                    .map(|order| order.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if let Some(timeout) = &self.ui.query_timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "ui.query_timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(command) = &self.editor.command
            && command.trim().is_empty()
        {
            bail!(
                "editor.command in {} is empty; remove it to fall back to $VISUAL/$EDITOR",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} is {level:?}; use one of: {}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        for (index, action) in self.menu.actions.iter().enumerate() {
            if action.label.trim().is_empty() || action.command.trim().is_empty() {
                bail!(
                    "menu.actions[{index}] in {} needs a non-empty label and command",
                    path.display()
                );
            }
            if let Some(scope) = &action.scope {
                Locator::parse(scope).with_context(|| {
                    format!("menu.actions[{index}].scope in {}", path.display())
                })?;
            }
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => notepad_db::default_db_path(),
        }
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        if self.ui.case_sensitive_search.unwrap_or(false) {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        self.ui
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default()
    }

    pub fn query_timeout(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .query_timeout
                .as_deref()
                .unwrap_or(DEFAULT_QUERY_TIMEOUT),
        )
    }

    pub fn editor_command(&self) -> Option<&str> {
        self.editor.command.as_deref()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log.dir {
            return Ok(PathBuf::from(dir));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log] dir to a writable directory")
        })?;
        Ok(data_root.join(notepad_db::APP_NAME).join("logs"))
    }

    pub fn alternative_actions(&self) -> Result<Vec<AlternativeAction>> {
        self.menu
            .actions
            .iter()
            .map(|action| {
                let scope = match &action.scope {
                    Some(scope) => Locator::parse(scope)
                        .with_context(|| format!("menu action {:?} scope", action.label))?,
                    None => Locator::notes(),
                };
                Ok(AlternativeAction {
                    label: action.label.clone(),
                    command: action.command.clone(),
                    scope,
                })
            })
            .collect()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# notepad config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/notepad/notepad.db)\n# db_path = \"/absolute/path/to/notepad.db\"\n\n[ui]\ncase_sensitive_search = false\n# modified_desc, modified_asc, created_desc, created_asc, title_asc, title_desc\nsort_order = \"{}\"\nquery_timeout = \"{}\"\n\n[editor]\n# Optional. Falls back to $VISUAL, then $EDITOR, then vi\n# command = \"nvim\"\n\n[log]\nlevel = \"{}\"\n# dir = \"/absolute/path/to/logs\"\n\n# Extra entries for the list menu. The locator is passed as the last argument.\n# [[menu.actions]]\n# label = \"export all\"\n# command = \"notepad-export\"\n# scope = \"content://com.example.notepad/notes\"\n",
            path.display(),
            SortOrder::default().as_str(),
            DEFAULT_QUERY_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 2s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use crate::env_lock;
    use anyhow::Result;
    use notepad_app::{CaseSensitivity, Locator, NoteId, SortOrder};
    use std::path::PathBuf;
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.case_sensitivity(), CaseSensitivity::Insensitive);
        assert_eq!(config.sort_order(), SortOrder::default());
        assert_eq!(config.query_timeout()?, Duration::from_secs(2));
        assert_eq!(config.log_level(), "info");
        assert!(config.editor_command().is_none());
        assert!(config.alternative_actions()?.is_empty());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\ncase_sensitive_search = true\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\ncase_sensitive_search = true\nsort_order = \"title_asc\"\nquery_timeout = \"750ms\"\n[editor]\ncommand = \"nvim -n\"\n[log]\nlevel = \"debug\"\ndir = \"/tmp/notepad-logs\"\n[[menu.actions]]\nlabel = \"export all\"\ncommand = \"notepad-export\"\n[[menu.actions]]\nlabel = \"print first\"\ncommand = \"lp\"\nscope = \"content://com.example.notepad/notes/1\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.case_sensitivity(), CaseSensitivity::Sensitive);
        assert_eq!(config.sort_order().as_str(), "title_asc");
        assert_eq!(config.query_timeout()?, Duration::from_millis(750));
        assert_eq!(config.editor_command(), Some("nvim -n"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_dir()?, PathBuf::from("/tmp/notepad-logs"));

        let actions = config.alternative_actions()?;
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].scope, Locator::notes());
        assert_eq!(actions[1].scope, Locator::note(NoteId::new(1)));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_sort_order_lists_choices() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nsort_order = \"newest\"\n")?;
        let error = Config::load(&path).expect_err("bad sort order should fail");
        let message = error.to_string();
        assert!(message.contains("ui.sort_order"));
        assert!(message.contains("modified_desc"));
        Ok(())
    }

    #[test]
    fn non_positive_query_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nquery_timeout = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn bad_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("bad level should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn menu_action_scope_must_be_a_locator() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[[menu.actions]]\nlabel = \"x\"\ncommand = \"y\"\nscope = \"https://example.com\"\n",
        )?;
        let error = Config::load(&path).expect_err("bad scope should fail");
        assert!(format!("{error:#}").contains("menu.actions[0].scope"));
        Ok(())
    }

    #[test]
    fn empty_editor_command_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[editor]\ncommand = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank editor should fail");
        assert!(error.to_string().contains("editor.command"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("NOTEPAD_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("NOTEPAD_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn db_path_prefers_storage_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"/explicit/from-config.db\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("NOTEPAD_DB_PATH", "/from/env.db");
        }
        let config = Config::load(&path)?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("NOTEPAD_DB_PATH");
        }
        assert_eq!(config.db_path()?, PathBuf::from("/explicit/from-config.db"));
        Ok(())
    }

    #[test]
    fn db_path_uses_env_override_when_storage_db_path_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("NOTEPAD_DB_PATH", "/from/env-only.db");
        }
        let config = Config::load(&path)?;
        let resolved = config.db_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("NOTEPAD_DB_PATH");
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.db"));
        Ok(())
    }

    #[test]
    fn db_path_rejects_uri_style_storage_value() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"https://evil.example/notes.db\"\n")?;
        let error = Config::load(&path).expect_err("URI db_path should fail validation");
        assert!(error.to_string().contains("looks like a URI"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("2s")?, Duration::from_secs(2));
        assert_eq!(parse_duration("1m")?, Duration::from_secs(60));
        assert!(parse_duration("soon").is_err());
        Ok(())
    }

    #[test]
    fn oversized_minute_timeout_is_an_error() -> Result<()> {
        let error = parse_duration("307445734561825861m").expect_err("minutes overflow seconds");
        assert!(error.to_string().contains("too large"));

        let (_temp, path) =
            write_config("version = 1\n[ui]\nquery_timeout = \"307445734561825861m\"\n")?;
        assert!(Config::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.sort_order(), SortOrder::default());
        assert_eq!(config.query_timeout()?, Duration::from_secs(2));
        Ok(())
    }
}
