// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Column, NoteId, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct SnapshotTracker {
    live: Arc<AtomicUsize>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Snapshot {
        self.live.fetch_add(1, Ordering::SeqCst);
        Snapshot {
            columns,
            rows,
            live: Arc::clone(&self.live),
        }
    }
}

#[derive(Debug)]
pub struct Snapshot {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    live: Arc<AtomicUsize>,
}

impl Snapshot {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|candidate| *candidate == column)
    }

    pub fn value(&self, row: usize, column: Column) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn row_id(&self, row: usize) -> Option<NoteId> {
        self.value(row, Column::Id)?.as_integer().map(NoteId::new)
    }

    pub fn ids(&self) -> Vec<NoteId> {
        (0..self.rows.len())
            .filter_map(|row| self.row_id(row))
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        (0..self.rows.len())
            .filter_map(|row| self.value(row, Column::Title))
            .map(|value| value.as_text().unwrap_or_default().to_owned())
            .collect()
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
