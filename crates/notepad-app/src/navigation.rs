// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Locator, LocatorError, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntentAction {
    #[default]
    Main,
    Pick,
    GetContent,
}

impl IntentAction {
    pub const fn returns_selection(self) -> bool {
        matches!(self, Self::Pick | Self::GetContent)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Pick => "pick",
            Self::GetContent => "get-content",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub action: IntentAction,
    pub data: Option<Locator>,
}

impl Intent {
    pub const fn new(action: IntentAction, data: Option<Locator>) -> Self {
        Self { action, data }
    }

    pub fn base_locator(&self) -> Result<Locator, LocatorError> {
        match self.data {
            None => Ok(Locator::notes()),
            Some(locator) if locator.is_collection() => Ok(locator),
            Some(locator) => Err(LocatorError::UnknownPath(format!(
                "{locator} names a single note; pass a collection locator"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Edit,
    Insert,
}

impl NavigationAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Insert => "insert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub action: NavigationAction,
    pub locator: Locator,
}

impl NavigationRequest {
    pub const fn edit(locator: Locator) -> Self {
        Self {
            action: NavigationAction::Edit,
            locator,
        }
    }

    pub const fn insert(locator: Locator) -> Self {
        Self {
            action: NavigationAction::Insert,
            locator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActivation {
    ReturnSelection(Locator),
    Navigate(NavigationRequest),
}

pub fn activate_row(intent: &Intent, base: &Locator, id: NoteId) -> RowActivation {
    let locator = base.with_appended_id(id);
    if intent.action.returns_selection() {
        RowActivation::ReturnSelection(locator)
    } else {
        RowActivation::Navigate(NavigationRequest::edit(locator))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativeAction {
    pub label: String,
    pub command: String,
    pub scope: Locator,
}

impl AlternativeAction {
    pub fn applies_to(&self, locator: &Locator) -> bool {
        locator.is_within(&self.scope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    AddNote,
    Alternative(AlternativeAction),
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::AddNote => "add note",
            Self::Alternative(action) => &action.label,
        }
    }
}

pub fn menu_entries(locator: &Locator, alternatives: &[AlternativeAction]) -> Vec<MenuEntry> {
    let mut entries = vec![MenuEntry::AddNote];
    entries.extend(
        alternatives
            .iter()
            .filter(|action| action.applies_to(locator))
            .cloned()
            .map(MenuEntry::Alternative),
    );
    entries
}
