// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    Browse,
    Search,
    ConfirmDelete(NoteId),
    Menu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: ScreenMode,
    pub search_text: String,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: ScreenMode::Browse,
            search_text: String::new(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    FocusSearch,
    SubmitSearch,
    LeaveSearch,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,
    RequestDelete(NoteId),
    ConfirmDelete,
    CancelDelete,
    OpenMenu,
    CloseMenu,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(ScreenMode),
    SearchChanged(String),
    DeleteConfirmed(NoteId),
    DeleteCanceled(NoteId),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::FocusSearch => self.enter_mode(ScreenMode::Search),
            // Submitting does not query; the filter already tracks every edit.
            AppCommand::SubmitSearch | AppCommand::LeaveSearch => {
                if self.mode == ScreenMode::Search {
                    self.enter_mode(ScreenMode::Browse)
                } else {
                    Vec::new()
                }
            }
            AppCommand::SearchInput(ch) => {
                self.search_text.push(ch);
                vec![AppEvent::SearchChanged(self.search_text.clone())]
            }
            AppCommand::SearchBackspace => {
                if self.search_text.pop().is_some() {
                    vec![AppEvent::SearchChanged(self.search_text.clone())]
                } else {
                    Vec::new()
                }
            }
            AppCommand::ClearSearch => {
                if self.search_text.is_empty() {
                    Vec::new()
                } else {
                    self.search_text.clear();
                    vec![AppEvent::SearchChanged(String::new())]
                }
            }
            AppCommand::RequestDelete(id) => self.enter_mode(ScreenMode::ConfirmDelete(id)),
            AppCommand::ConfirmDelete => match self.mode {
                ScreenMode::ConfirmDelete(id) => {
                    let mut events = self.enter_mode(ScreenMode::Browse);
                    events.push(AppEvent::DeleteConfirmed(id));
                    events
                }
                _ => Vec::new(),
            },
            AppCommand::CancelDelete => match self.mode {
                ScreenMode::ConfirmDelete(id) => {
                    let mut events = self.enter_mode(ScreenMode::Browse);
                    events.push(AppEvent::DeleteCanceled(id));
                    events
                }
                _ => Vec::new(),
            },
            AppCommand::OpenMenu => self.enter_mode(ScreenMode::Menu),
            AppCommand::CloseMenu => {
                if self.mode == ScreenMode::Menu {
                    self.enter_mode(ScreenMode::Browse)
                } else {
                    Vec::new()
                }
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn enter_mode(&mut self, mode: ScreenMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
