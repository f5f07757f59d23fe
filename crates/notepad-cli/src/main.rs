// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod editor;
mod logging;
mod runtime;
mod worker;

use anyhow::{Context, Result, bail};
use config::Config;
use editor::Editor;
use notepad_app::{AppState, Intent, IntentAction, Locator};
use notepad_db::Store;
use notepad_testkit::{NoteFaker, fixture_notes};
use notepad_tui::{ScreenExit, ScreenOptions};
use runtime::CliRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;
use worker::StoreWorker;

const DEMO_SEED: u64 = 42;
const DEMO_EXTRA_NOTES: usize = 20;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `notepad --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    logging::init(config.log_level(), &config.log_dir()?)?;

    let intent = options.intent()?;
    intent
        .base_locator()
        .context("--locator must name a note collection")?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or NOTEPAD_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        seed_demo_notes(&store)?;
    }
    if options.check_only {
        return Ok(());
    }

    let screen = ScreenOptions {
        intent,
        case: config.case_sensitivity(),
        sort: config.sort_order(),
        query_timeout: config.query_timeout()?,
    };
    let editor = Editor::from_config(config.editor_command())?;
    let mut runtime = CliRuntime::new(
        StoreWorker::spawn(store)?,
        editor,
        config.alternative_actions()?,
    );
    info!(
        action = intent.action.label(),
        db = %db_path.display(),
        "starting list screen"
    );

    let mut state = AppState::default();
    match notepad_tui::run_app(&mut state, &mut runtime, screen)? {
        ScreenExit::Picked(locator) => println!("{locator}"),
        ScreenExit::Quit => {}
    }
    Ok(())
}

fn seed_demo_notes(store: &Store) -> Result<()> {
    let mut faker = NoteFaker::new(DEMO_SEED);
    let notes = fixture_notes()
        .into_iter()
        .chain(faker.notes(DEMO_EXTRA_NOTES));
    for note in notes {
        store.insert(&Locator::notes(), &note)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    locator: Option<String>,
    pick: bool,
    get_content: bool,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

impl CliOptions {
    fn intent(&self) -> Result<Intent> {
        let action = match (self.pick, self.get_content) {
            (true, true) => bail!("--pick and --get-content are mutually exclusive"),
            (true, false) => IntentAction::Pick,
            (false, true) => IntentAction::GetContent,
            (false, false) => IntentAction::Main,
        };
        let data = self
            .locator
            .as_deref()
            .map(Locator::parse)
            .transpose()
            .context("parse --locator")?;
        Ok(Intent::new(action, data))
    }
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        locator: None,
        pick: false,
        get_content: false,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--locator" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--locator requires a content:// locator"))?;
                options.locator = Some(value.as_ref().to_owned());
            }
            "--pick" => {
                options.pick = true;
            }
            "--get-content" => {
                options.get_content = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("notepad");
    println!("  --config <path>          Use a specific config path");
    println!("  --locator <locator>      List this collection (default content://com.example.notepad/notes)");
    println!("  --pick                   Print the chosen note's locator instead of editing");
    println!("  --get-content            Same as --pick, for content requests");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo notes (in-memory)");
    println!("  --check                  Validate config and database, then exit");
    println!("  --help                   Show this help");
}

// Tests that touch process env vars hold this.
#[cfg(test)]
fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
