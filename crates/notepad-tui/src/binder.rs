// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use notepad_app::{Column, NoteId, Snapshot, Value, datetime_from_millis};
use time::macros::format_description;

pub const UNTITLED_LABEL: &str = "<untitled>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    pub primary: Column,
    pub secondary: Column,
}

impl Default for ColumnBinding {
    fn default() -> Self {
        Self {
            primary: Column::Title,
            secondary: Column::Modified,
        }
    }
}

impl ColumnBinding {
    fn required(self) -> [Column; 3] {
        [Column::Id, self.primary, self.secondary]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: NoteId,
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Default)]
pub struct ListBinder {
    binding: ColumnBinding,
    snapshot: Option<Snapshot>,
}

impl ListBinder {
    pub fn new(binding: ColumnBinding) -> Self {
        Self {
            binding,
            snapshot: None,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    // Binds `snapshot` and drops whatever was bound before. A snapshot that
    // lacks a bound column is rejected and released; the old one stays.
    pub fn change_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        drop(self.swap_snapshot(snapshot)?);
        Ok(())
    }

    pub fn swap_snapshot(&mut self, snapshot: Snapshot) -> Result<Option<Snapshot>> {
        let missing = self
            .binding
            .required()
            .into_iter()
            .filter(|column| snapshot.column_index(*column).is_none())
            .map(Column::as_str)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            bail!(
                "snapshot is missing bound columns: {}; include them in the projection",
                missing.join(", ")
            );
        }
        Ok(self.snapshot.replace(snapshot))
    }

    pub fn release(&mut self) {
        self.snapshot = None;
    }

    pub fn len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, Snapshot::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row_id(&self, index: usize) -> Option<NoteId> {
        self.snapshot.as_ref()?.row_id(index)
    }

    pub fn items(&self) -> Vec<ListRow> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        (0..snapshot.len())
            .filter_map(|row| {
                let id = snapshot.row_id(row)?;
                let primary = render_value(
                    self.binding.primary,
                    snapshot.value(row, self.binding.primary),
                );
                let secondary = render_value(
                    self.binding.secondary,
                    snapshot.value(row, self.binding.secondary),
                );
                Some(ListRow {
                    id,
                    primary: if primary.trim().is_empty() {
                        UNTITLED_LABEL.to_owned()
                    } else {
                        primary
                    },
                    secondary,
                })
            })
            .collect()
    }
}

fn render_value(column: Column, value: Option<&Value>) -> String {
    match (column, value) {
        (_, None | Some(Value::Null)) => String::new(),
        (Column::Created | Column::Modified, Some(Value::Integer(millis))) => {
            format_timestamp(*millis)
        }
        (_, Some(Value::Integer(value))) => value.to_string(),
        (_, Some(Value::Text(text))) => text.clone(),
    }
}

fn format_timestamp(millis: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    datetime_from_millis(millis)
        .and_then(|value| value.format(&format).ok())
        .unwrap_or_else(|| millis.to_string())
}
