// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use notepad_app::{
    Column, Filter, Locator, NewNote, Note, NoteId, NoteUpdate, Snapshot, SnapshotTracker,
    SortDirection, SortOrder, Value, datetime_from_millis, millis_from_datetime,
};
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{debug, info};

pub const APP_NAME: &str = "notepad";

const NOTES_TABLE: &str = "notes";
const REQUIRED_COLUMNS: &[&str] = &["id", "title", "note", "created", "modified"];

pub struct Store {
    conn: Connection,
    snapshots: SnapshotTracker,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self {
            conn,
            snapshots: SnapshotTracker::new(),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self {
            conn,
            snapshots: SnapshotTracker::new(),
        })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn snapshot_tracker(&self) -> &SnapshotTracker {
        &self.snapshots
    }

    pub fn bootstrap(&self) -> Result<()> {
        if table_exists(&self.conn, NOTES_TABLE)? {
            validate_schema(&self.conn)?;
        }
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")?;
        Ok(())
    }

    // Runs a read against `locator`. Rows come back in `sort` order with the
    // id as tiebreaker in the same direction.
    pub fn query(
        &self,
        locator: &Locator,
        projection: &[Column],
        filter: Option<&Filter>,
        sort: SortOrder,
    ) -> Result<Snapshot> {
        if projection.is_empty() {
            bail!("query projection is empty; request at least one column");
        }

        let columns = projection
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let (where_clause, bound) = where_clause(locator, filter);
        let direction = match sort.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        let sql = format!(
            "SELECT {columns} FROM {NOTES_TABLE}{where_clause} ORDER BY {} {direction}, id {direction}",
            sort.column().as_str()
        );

        let mut stmt = self.conn.prepare(&sql).context("prepare notes query")?;
        let width = projection.len();
        let rows = stmt
            .query_map(params_from_iter(bound.iter()), |row| {
                (0..width)
                    .map(|index| row.get_ref(index).map(value_from_ref))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .with_context(|| format!("query {locator}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("collect rows for {locator}"))?;

        debug!(%locator, rows = rows.len(), filtered = filter.is_some(), "queried notes");
        Ok(self.snapshots.snapshot(projection.to_vec(), rows))
    }

    // Deletes what `locator` names, narrowed by `filter`. Returns the number
    // of rows removed; a locator naming a missing note removes zero.
    pub fn delete(&self, locator: &Locator, filter: Option<&Filter>) -> Result<usize> {
        let (where_clause, bound) = where_clause(locator, filter);
        let sql = format!("DELETE FROM {NOTES_TABLE}{where_clause}");
        let removed = self
            .conn
            .execute(&sql, params_from_iter(bound.iter()))
            .with_context(|| format!("delete {locator}"))?;
        info!(%locator, removed, "deleted notes");
        Ok(removed)
    }

    pub fn insert(&self, locator: &Locator, note: &NewNote) -> Result<Locator> {
        if !locator.is_collection() {
            bail!("cannot insert into {locator}; insert into the notes collection instead");
        }
        let now = now_millis();
        self.conn
            .execute(
                "INSERT INTO notes (title, note, created, modified) VALUES (?, ?, ?, ?)",
                params![note.title, note.note, now, now],
            )
            .context("insert note")?;
        let created = locator.with_appended_id(NoteId::new(self.conn.last_insert_rowid()));
        info!(locator = %created, "inserted note");
        Ok(created)
    }

    pub fn update(&self, locator: &Locator, update: &NoteUpdate) -> Result<usize> {
        let id = item_id(locator)?;
        let updated = self
            .conn
            .execute(
                "UPDATE notes SET title = ?, note = ?, modified = ? WHERE id = ?",
                params![update.title, update.note, now_millis(), id.get()],
            )
            .with_context(|| format!("update {locator}"))?;
        info!(%locator, updated, "updated note");
        Ok(updated)
    }

    pub fn get_note(&self, locator: &Locator) -> Result<Option<Note>> {
        let id = item_id(locator)?;
        let raw = self
            .conn
            .query_row(
                "SELECT id, title, note, created, modified FROM notes WHERE id = ?",
                params![id.get()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()
            .with_context(|| format!("load {locator}"))?;

        raw.map(|(id, title, note, created, modified)| {
            Ok(Note {
                id: NoteId::new(id),
                title,
                note,
                created: parse_millis(created)?,
                modified: parse_millis(modified)?,
            })
        })
        .transpose()
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .context("count notes")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("NOTEPAD_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set NOTEPAD_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("notepad.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn where_clause(locator: &Locator, filter: Option<&Filter>) -> (String, Vec<Box<dyn ToSql>>) {
    let mut predicates = Vec::new();
    let mut bound: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(id) = locator.id() {
        predicates.push("id = ?".to_owned());
        bound.push(Box::new(id.get()));
    }
    if let Some(filter) = filter {
        predicates.push(filter.sql());
        bound.push(Box::new(filter.pattern()));
    }

    if predicates.is_empty() {
        (String::new(), bound)
    } else {
        (format!(" WHERE {}", predicates.join(" AND ")), bound)
    }
}

fn item_id(locator: &Locator) -> Result<NoteId> {
    locator
        .id()
        .ok_or_else(|| anyhow!("{locator} names the whole collection; pass a note locator"))
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::Integer(value),
        ValueRef::Real(value) => Value::Text(value.to_string()),
        ValueRef::Text(value) => Value::Text(String::from_utf8_lossy(value).into_owned()),
        ValueRef::Blob(value) => Value::Text(format!("{value:?}")),
    }
}

fn validate_schema(conn: &Connection) -> Result<()> {
    let columns = table_columns(conn, NOTES_TABLE)?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains(*column))
        .collect();

    if !missing.is_empty() {
        bail!(
            "table `{NOTES_TABLE}` is missing required columns: {}; use a notepad-compatible database",
            missing.join(", ")
        );
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_millis() -> i64 {
    millis_from_datetime(OffsetDateTime::now_utc())
}

fn parse_millis(raw: i64) -> Result<OffsetDateTime> {
    datetime_from_millis(raw).ok_or_else(|| anyhow!("timestamp {raw} is out of range"))
}
