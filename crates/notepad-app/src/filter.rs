// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

// The user text never reaches the SQL string: `sql()` only names the column
// and a placeholder, and `pattern()` is bound as the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: Column,
    needle: String,
    case: CaseSensitivity,
}

impl Filter {
    pub fn title_contains(text: &str, case: CaseSensitivity) -> Self {
        Self {
            column: Column::Title,
            needle: text.to_owned(),
            case,
        }
    }

    pub fn sql(&self) -> String {
        match self.case {
            CaseSensitivity::Sensitive => format!("{} GLOB ?", self.column.as_str()),
            CaseSensitivity::Insensitive => format!("lower({}) GLOB ?", self.column.as_str()),
        }
    }

    pub fn pattern(&self) -> String {
        let needle = match self.case {
            CaseSensitivity::Sensitive => escape_glob(&self.needle),
            CaseSensitivity::Insensitive => escape_glob(&self.needle.to_ascii_lowercase()),
        };
        format!("*{needle}*")
    }

    pub fn matches(&self, value: &str) -> bool {
        match self.case {
            CaseSensitivity::Sensitive => value.contains(&self.needle),
            CaseSensitivity::Insensitive => value
                .to_ascii_lowercase()
                .contains(&self.needle.to_ascii_lowercase()),
        }
    }
}

pub fn filter_for_search(text: &str, case: CaseSensitivity) -> Option<Filter> {
    if text.is_empty() {
        None
    } else {
        Some(Filter::title_contains(text, case))
    }
}

fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' => escaped.push_str("[*]"),
            '?' => escaped.push_str("[?]"),
            '[' => escaped.push_str("[[]"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{CaseSensitivity, Filter, escape_glob, filter_for_search};

    #[test]
    fn empty_text_means_no_filter() {
        assert_eq!(filter_for_search("", CaseSensitivity::Insensitive), None);
        assert_eq!(filter_for_search("", CaseSensitivity::Sensitive), None);
    }

    #[test]
    fn whitespace_is_a_real_search() {
        let filter = filter_for_search(" ", CaseSensitivity::Sensitive).expect("filter");
        assert_eq!(filter.pattern(), "* *");
    }

    #[test]
    fn non_empty_text_targets_title_with_wildcards() {
        let filter = filter_for_search("me", CaseSensitivity::Sensitive).expect("filter");
        assert_eq!(filter.sql(), "title GLOB ?");
        assert_eq!(filter.pattern(), "*me*");
    }

    #[test]
    fn insensitive_filter_folds_both_sides() {
        let filter = Filter::title_contains("MeEt", CaseSensitivity::Insensitive);
        assert_eq!(filter.sql(), "lower(title) GLOB ?");
        assert_eq!(filter.pattern(), "*meet*");
        assert!(filter.matches("Meeting notes"));
        assert!(!Filter::title_contains("MeEt", CaseSensitivity::Sensitive).matches("Meeting"));
    }

    #[test]
    fn glob_metacharacters_match_literally() {
        assert_eq!(escape_glob("a*b?c[d]"), "a[*]b[?]c[[]d]");
        let filter = Filter::title_contains("50%*", CaseSensitivity::Sensitive);
        assert_eq!(filter.pattern(), "*50%[*]*");
    }

    #[test]
    fn quotes_stay_in_the_bound_value() {
        let filter = Filter::title_contains("x' OR '1'='1", CaseSensitivity::Sensitive);
        assert_eq!(filter.sql(), "title GLOB ?");
        assert!(filter.pattern().contains("' OR '"));
    }
}
