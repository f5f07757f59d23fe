// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NoteId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const LOCATOR_SCHEME: &str = "content";
pub const LOCATOR_AUTHORITY: &str = "com.example.notepad";
pub const NOTES_PATH: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("locator is empty")]
    Empty,

    #[error("locator {0:?} must start with content://")]
    InvalidScheme(String),

    #[error("locator authority {0:?} is unknown; expected {LOCATOR_AUTHORITY}")]
    UnknownAuthority(String),

    #[error("locator path {0:?} is unknown; expected /notes or /notes/<id>")]
    UnknownPath(String),

    #[error("locator id {0:?} is not a positive integer")]
    InvalidId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    id: Option<NoteId>,
}

impl Locator {
    pub const fn notes() -> Self {
        Self { id: None }
    }

    pub const fn note(id: NoteId) -> Self {
        Self { id: Some(id) }
    }

    // Appends a record id to a collection locator. Any id already present is
    // replaced, so the result always names exactly one note.
    pub const fn with_appended_id(&self, id: NoteId) -> Self {
        Self { id: Some(id) }
    }

    pub const fn id(&self) -> Option<NoteId> {
        self.id
    }

    pub const fn is_collection(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_within(&self, scope: &Locator) -> bool {
        match scope.id {
            None => true,
            Some(id) => self.id == Some(id),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocatorError::Empty);
        }

        let rest = raw
            .strip_prefix(LOCATOR_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .ok_or_else(|| LocatorError::InvalidScheme(raw.to_owned()))?;

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority != LOCATOR_AUTHORITY {
            return Err(LocatorError::UnknownAuthority(authority.to_owned()));
        }

        let mut segments = path.trim_end_matches('/').split('/');
        if segments.next() != Some(NOTES_PATH) {
            return Err(LocatorError::UnknownPath(format!("/{path}")));
        }

        let id = match segments.next() {
            None => None,
            Some(segment) => {
                let value = segment
                    .parse::<i64>()
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or_else(|| LocatorError::InvalidId(segment.to_owned()))?;
                Some(NoteId::new(value))
            }
        };

        if segments.next().is_some() {
            return Err(LocatorError::UnknownPath(format!("/{path}")));
        }

        Ok(Self { id })
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::notes()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCATOR_SCHEME}://{LOCATOR_AUTHORITY}/{NOTES_PATH}")?;
        if let Some(id) = self.id {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{Locator, LocatorError};
    use crate::NoteId;

    #[test]
    fn appending_an_id_to_the_collection_names_one_note() {
        let base = Locator::notes();
        let item = base.with_appended_id(NoteId::new(2));
        assert_eq!(item.id(), Some(NoteId::new(2)));
        assert_eq!(item.to_string(), "content://com.example.notepad/notes/2");
        assert!(base.is_collection());
        assert!(!item.is_collection());
    }

    #[test]
    fn parse_accepts_collection_and_item_forms() {
        assert_eq!(
            Locator::parse("content://com.example.notepad/notes"),
            Ok(Locator::notes())
        );
        assert_eq!(
            Locator::parse("content://com.example.notepad/notes/"),
            Ok(Locator::notes())
        );
        assert_eq!(
            Locator::parse("content://com.example.notepad/notes/17"),
            Ok(Locator::note(NoteId::new(17)))
        );
    }

    #[test]
    fn parse_rejects_foreign_and_malformed_locators() {
        assert_eq!(Locator::parse("  "), Err(LocatorError::Empty));
        assert!(matches!(
            Locator::parse("https://com.example.notepad/notes"),
            Err(LocatorError::InvalidScheme(_))
        ));
        assert!(matches!(
            Locator::parse("content://contacts/notes"),
            Err(LocatorError::UnknownAuthority(_))
        ));
        assert!(matches!(
            Locator::parse("content://com.example.notepad/folders"),
            Err(LocatorError::UnknownPath(_))
        ));
        assert!(matches!(
            Locator::parse("content://com.example.notepad/notes/abc"),
            Err(LocatorError::InvalidId(_))
        ));
        assert!(matches!(
            Locator::parse("content://com.example.notepad/notes/0"),
            Err(LocatorError::InvalidId(_))
        ));
        assert!(matches!(
            Locator::parse("content://com.example.notepad/notes/1/2"),
            Err(LocatorError::UnknownPath(_))
        ));
    }

    #[test]
    fn display_and_parse_agree() {
        let locator = Locator::note(NoteId::new(42));
        assert_eq!(locator.to_string().parse::<Locator>(), Ok(locator));
    }

    #[test]
    fn scope_matching() {
        let item = Locator::note(NoteId::new(3));
        assert!(item.is_within(&Locator::notes()));
        assert!(item.is_within(&item));
        assert!(!Locator::notes().is_within(&item));
        assert!(!item.is_within(&Locator::note(NoteId::new(4))));
    }
}
