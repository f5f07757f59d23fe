// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use notepad_app::NewNote;
use std::path::PathBuf;

const TITLE_SUBJECTS: [&str; 16] = [
    "Groceries",
    "Meeting notes",
    "Todo",
    "Reading list",
    "Trip plan",
    "Recipe",
    "Gift ideas",
    "Standup",
    "Book club",
    "Budget",
    "Garden",
    "Workout",
    "Packing list",
    "Retro",
    "Call log",
    "Project ideas",
];

const TITLE_QUALIFIERS: [&str; 8] = [
    "",
    " (draft)",
    " for Monday",
    " - week 3",
    " v2",
    " backlog",
    " [archive]",
    " *urgent*",
];

const BODY_WORDS: [&str; 24] = [
    "buy", "call", "review", "draft", "send", "milk", "eggs", "agenda", "follow", "up",
    "schedule", "book", "flights", "notes", "ideas", "plan", "check", "ship", "fix", "water",
    "plants", "pay", "rent", "tomorrow",
];

pub const FIXTURE_TITLES: [&str; 3] = ["Groceries", "Meeting notes", "Todo"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct NoteFaker {
    rng: DeterministicRng,
}

impl NoteFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn note(&mut self) -> NewNote {
        let title = format!(
            "{}{}",
            self.pick(&TITLE_SUBJECTS),
            self.pick(&TITLE_QUALIFIERS)
        );
        let lines = 1 + self.rng.int_n(4);
        let note = (0..lines)
            .map(|_| self.sentence(3, 9))
            .collect::<Vec<_>>()
            .join("\n");
        NewNote { title, note }
    }

    pub fn notes(&mut self, count: usize) -> Vec<NewNote> {
        (0..count).map(|_| self.note()).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        let mut sentence = (0..count)
            .map(|_| self.pick(&BODY_WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

pub fn fixture_notes() -> Vec<NewNote> {
    FIXTURE_TITLES
        .iter()
        .map(|title| NewNote {
            title: (*title).to_owned(),
            note: format!("{title} body"),
        })
        .collect()
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("notepad.db");
    Ok((dir, db_path))
}
