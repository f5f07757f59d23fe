// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Id,
    Title,
    Note,
    Created,
    Modified,
}

impl Column {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Note => "note",
            Self::Created => "created",
            Self::Modified => "modified",
        }
    }
}

pub const LIST_PROJECTION: [Column; 3] = [Column::Id, Column::Title, Column::Modified];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Modified,
    Created,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub const MODIFIED_DESC: Self = Self {
        key: SortKey::Modified,
        direction: SortDirection::Desc,
    };

    pub const ALL: [Self; 6] = [
        Self::MODIFIED_DESC,
        Self::new(SortKey::Modified, SortDirection::Asc),
        Self::new(SortKey::Created, SortDirection::Desc),
        Self::new(SortKey::Created, SortDirection::Asc),
        Self::new(SortKey::Title, SortDirection::Asc),
        Self::new(SortKey::Title, SortDirection::Desc),
    ];

    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub const fn as_str(self) -> &'static str {
        match (self.key, self.direction) {
            (SortKey::Modified, SortDirection::Desc) => "modified_desc",
            (SortKey::Modified, SortDirection::Asc) => "modified_asc",
            (SortKey::Created, SortDirection::Desc) => "created_desc",
            (SortKey::Created, SortDirection::Asc) => "created_asc",
            (SortKey::Title, SortDirection::Desc) => "title_desc",
            (SortKey::Title, SortDirection::Asc) => "title_asc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let (key, direction) = value.rsplit_once('_')?;
        let key = match key {
            "modified" => SortKey::Modified,
            "created" => SortKey::Created,
            "title" => SortKey::Title,
            _ => return None,
        };
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };
        Some(Self { key, direction })
    }

    pub const fn column(self) -> Column {
        match self.key {
            SortKey::Modified => Column::Modified,
            SortKey::Created => Column::Created,
            SortKey::Title => Column::Title,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::MODIFIED_DESC
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub note: String,
    pub created: OffsetDateTime,
    pub modified: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNote {
    pub title: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteUpdate {
    pub title: String,
    pub note: String,
}

pub fn datetime_from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

pub fn millis_from_datetime(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}
