// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::editor::{Editor, NoteText};
use crate::worker::StoreWorker;
use anyhow::{Context, Result, anyhow, bail};
use notepad_app::{
    AlternativeAction, Locator, NavigationAction, NavigationRequest, NewNote, NoteUpdate, Snapshot,
};
use notepad_tui::{InternalEvent, ListRuntime, QueryRequest};
use std::process::Command;
use std::sync::mpsc::Sender;
use tracing::info;

pub struct CliRuntime {
    worker: StoreWorker,
    editor: Editor,
    alternatives: Vec<AlternativeAction>,
}

impl CliRuntime {
    pub fn new(worker: StoreWorker, editor: Editor, alternatives: Vec<AlternativeAction>) -> Self {
        Self {
            worker,
            editor,
            alternatives,
        }
    }

    fn edit_note(&mut self, locator: Locator) -> Result<()> {
        let note = self
            .worker
            .call(move |store| store.get_note(&locator))?
            .ok_or_else(|| anyhow!("{locator} no longer exists"))?;

        let original = NoteText::render(&note.title, &note.note);
        let edited = self.editor.edit_text(&original)?;
        if edited == original {
            info!(%locator, "note unchanged");
            return Ok(());
        }

        let text = NoteText::parse(&edited);
        let update = NoteUpdate {
            title: text.title,
            note: text.note,
        };
        let updated = self.worker.call(move |store| store.update(&locator, &update))?;
        info!(%locator, updated, "note saved");
        Ok(())
    }

    fn insert_note(&mut self, collection: Locator) -> Result<()> {
        let edited = self.editor.edit_text("")?;
        let text = NoteText::parse(&edited);
        if text.is_blank() {
            info!("empty note discarded");
            return Ok(());
        }

        let note = NewNote {
            title: text.title,
            note: text.note,
        };
        let created = self
            .worker
            .call(move |store| store.insert(&collection, &note))?;
        info!(%created, "note created");
        Ok(())
    }
}

impl ListRuntime for CliRuntime {
    fn query(&mut self, request: &QueryRequest) -> Result<Snapshot> {
        let request = request.clone();
        self.worker.call(move |store| {
            store.query(
                &request.locator,
                &request.projection,
                request.filter.as_ref(),
                request.sort,
            )
        })
    }

    fn delete(&mut self, locator: &Locator) -> Result<usize> {
        let locator = *locator;
        self.worker.call(move |store| store.delete(&locator, None))
    }

    fn navigate(&mut self, request: &NavigationRequest) -> Result<()> {
        match request.action {
            NavigationAction::Edit => self.edit_note(request.locator),
            NavigationAction::Insert => self.insert_note(request.locator),
        }
    }

    fn alternative_actions(&mut self) -> Result<Vec<AlternativeAction>> {
        Ok(self.alternatives.clone())
    }

    fn run_alternative(&mut self, action: &AlternativeAction, locator: &Locator) -> Result<()> {
        let mut argv = action.command.split_whitespace();
        let program = argv
            .next()
            .ok_or_else(|| anyhow!("menu action {:?} has no command", action.label))?;
        info!(label = %action.label, %locator, "running menu action");
        let status = Command::new(program)
            .args(argv)
            .arg(locator.to_string())
            .status()
            .with_context(|| format!("launch {program:?} for menu action {:?}", action.label))?;
        if !status.success() {
            bail!("{program:?} exited with {status}");
        }
        Ok(())
    }

    fn spawn_query(&mut self, request: QueryRequest, tx: Sender<InternalEvent>) -> Result<()> {
        self.worker.submit_query(request, tx)
    }

    fn spawn_delete(
        &mut self,
        request_id: u64,
        locator: Locator,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        self.worker.submit_delete(request_id, locator, tx)
    }
}

#[cfg(test)]
mod tests {
    use super::CliRuntime;
    use crate::editor::Editor;
    use crate::worker::StoreWorker;
    use anyhow::Result;
    use notepad_app::{
        AlternativeAction, LIST_PROJECTION, Locator, NavigationRequest, NoteId, SortOrder,
    };
    use notepad_db::Store;
    use notepad_testkit::fixture_notes;
    use notepad_tui::{ListRuntime, QueryRequest};

    fn runtime_with_editor(argv: &[&str]) -> Result<CliRuntime> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        for note in fixture_notes() {
            store.insert(&Locator::notes(), &note)?;
        }
        let editor = Editor::new(argv.iter().map(|arg| (*arg).to_owned()).collect())?;
        Ok(CliRuntime::new(
            StoreWorker::spawn(store)?,
            editor,
            Vec::new(),
        ))
    }

    fn titles(runtime: &mut CliRuntime) -> Result<Vec<String>> {
        let snapshot = runtime.query(&QueryRequest {
            request_id: 1,
            locator: Locator::notes(),
            projection: LIST_PROJECTION.to_vec(),
            filter: None,
            sort: SortOrder::parse("title_asc").unwrap_or_default(),
        })?;
        Ok(snapshot.titles())
    }

    #[cfg(unix)]
    #[test]
    fn unchanged_edit_does_not_touch_the_note() -> Result<()> {
        let mut runtime = runtime_with_editor(&["true"])?;
        let locator = Locator::note(NoteId::new(1));
        let before = runtime
            .worker
            .call(move |store| store.get_note(&locator))?
            .expect("note 1");

        runtime.navigate(&NavigationRequest::edit(locator))?;

        let after = runtime
            .worker
            .call(move |store| store.get_note(&locator))?
            .expect("note 1");
        assert_eq!(after.modified, before.modified);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn edit_saves_title_and_body() -> Result<()> {
        let mut runtime = runtime_with_editor(&[
            "sh",
            "-c",
            "printf 'Groceries for Sunday\\nmilk' > \"$1\"",
            "sh",
        ])?;
        let locator = Locator::note(NoteId::new(1));
        runtime.navigate(&NavigationRequest::edit(locator))?;

        let note = runtime
            .worker
            .call(move |store| store.get_note(&locator))?
            .expect("note 1");
        assert_eq!(note.title, "Groceries for Sunday");
        assert_eq!(note.note, "milk");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn empty_insert_creates_nothing() -> Result<()> {
        let mut runtime = runtime_with_editor(&["true"])?;
        runtime.navigate(&NavigationRequest::insert(Locator::notes()))?;
        assert_eq!(runtime.worker.call(|store| store.count())?, 3);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn insert_adds_a_note() -> Result<()> {
        let mut runtime =
            runtime_with_editor(&["sh", "-c", "printf 'Reading list\\nDune' > \"$1\"", "sh"])?;
        runtime.navigate(&NavigationRequest::insert(Locator::notes()))?;
        assert_eq!(
            titles(&mut runtime)?,
            vec!["Groceries", "Meeting notes", "Reading list", "Todo"]
        );
        Ok(())
    }

    #[test]
    fn editing_a_missing_note_is_an_error() -> Result<()> {
        let mut runtime = runtime_with_editor(&["true"])?;
        let error = runtime
            .navigate(&NavigationRequest::edit(Locator::note(NoteId::new(42))))
            .expect_err("note 42 does not exist");
        assert!(error.to_string().contains("no longer exists"));
        Ok(())
    }

    #[test]
    fn delete_goes_through_the_worker() -> Result<()> {
        let mut runtime = runtime_with_editor(&["true"])?;
        assert_eq!(runtime.delete(&Locator::note(NoteId::new(2)))?, 1);
        assert_eq!(runtime.delete(&Locator::note(NoteId::new(2)))?, 0);
        assert_eq!(titles(&mut runtime)?, vec!["Groceries", "Todo"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn menu_action_receives_the_locator() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let out = temp.path().join("out.txt");
        let script = temp.path().join("record.sh");
        std::fs::write(
            &script,
            format!("printf '%s' \"$1\" > '{}'\n", out.display()),
        )?;
        let mut runtime = runtime_with_editor(&["true"])?;
        let action = AlternativeAction {
            label: "record".to_owned(),
            command: format!("sh {}", script.display()),
            scope: Locator::notes(),
        };

        runtime.run_alternative(&action, &Locator::notes())?;
        assert_eq!(
            std::fs::read_to_string(&out)?,
            "content://com.example.notepad/notes"
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failing_menu_action_is_an_error() -> Result<()> {
        let mut runtime = runtime_with_editor(&["true"])?;
        let action = AlternativeAction {
            label: "broken".to_owned(),
            command: "false".to_owned(),
            scope: Locator::notes(),
        };
        assert!(
            runtime
                .run_alternative(&action, &Locator::notes())
                .is_err()
        );
        Ok(())
    }
}
