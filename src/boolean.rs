//! Checkbox vocabulary.
//!
//! Matching is exact and case-sensitive. Nothing is trimmed or lowercased, so
//! `"Yes"` and `" yes"` are not members and resolve to `NULL`.

use crate::sql;

pub const TRUTHY_TOKENS: &[&str] = &[
    "checked", "x", "yes", "y", "1", "[x]", "☑", "✅", "✓", "✔", "enabled", "on", "done", "true",
];

pub const FALSY_TOKENS: &[&str] = &[
    "unchecked",
    "",
    "no",
    "n",
    "0",
    "[]",
    "[ ]",
    "disabled",
    "off",
    "false",
];

pub fn normalize_boolean(source: &str) -> String {
    sql::case_cascade(&[
        (
            format!("{source} IN ({})", sql::literal_list(TRUTHY_TOKENS)),
            "TRUE".to_string(),
        ),
        (
            format!("{source} IN ({})", sql::literal_list(FALSY_TOKENS)),
            "FALSE".to_string(),
        ),
    ])
}

pub fn parse_boolean(raw: &str) -> Option<bool> {
    if TRUTHY_TOKENS.contains(&raw) {
        Some(true)
    } else if FALSY_TOKENS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}
