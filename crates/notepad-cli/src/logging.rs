// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const FILTER_ENV_VARS: [&str; 2] = ["NOTEPAD_LOG", "RUST_LOG"];
const MAX_LOG_FILES: usize = 7;

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init(level: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(notepad_db::APP_NAME)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .with_context(|| format!("open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    for var in FILTER_ENV_VARS {
        if let Ok(directives) = env::var(var)
            && !directives.trim().is_empty()
        {
            return EnvFilter::try_new(&directives)
                .with_context(|| format!("invalid {var} filter {directives:?}"));
        }
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))
}

#[cfg(test)]
mod tests {
    use super::env_filter;
    use crate::env_lock;
    use anyhow::Result;

    #[test]
    fn config_level_applies_without_env() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("NOTEPAD_LOG");
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(env_filter("debug")?.to_string(), "debug");
        Ok(())
    }

    #[test]
    fn notepad_log_overrides_config_level() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("NOTEPAD_LOG", "notepad_db=trace");
        }
        let filter = env_filter("info");
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("NOTEPAD_LOG");
        }
        assert_eq!(filter?.to_string(), "notepad_db=trace");
        Ok(())
    }
}
