//! Quoting and escaping helpers shared by every fragment builder.
//!
//! All functions return owned strings; callers compose them with `format!`.

/// Single-quoted string literal with embedded quotes doubled.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Double-quoted identifier with embedded quotes doubled.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escapes POSIX extended regex metacharacters so `value` matches literally.
pub fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(
            ch,
            '\\' | '.' | '^' | '$' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wraps an unanchored recognizer so it must match the whole value.
pub fn anchor(pattern: &str) -> String {
    format!("^{pattern}$")
}

/// `source ~ '^pattern$'`
pub fn regex_match(source: &str, pattern: &str) -> String {
    format!("{source} ~ {}", quote_literal(&anchor(pattern)))
}

/// Comma-separated list of quoted literals, suitable for `IN (...)`.
pub fn literal_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| quote_literal(v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CASE WHEN c1 THEN r1 ... ELSE NULL END`; a bare `NULL` for no arms.
pub fn case_cascade(arms: &[(String, String)]) -> String {
    if arms.is_empty() {
        return "NULL".to_string();
    }
    let whens = arms
        .iter()
        .map(|(condition, result)| format!("WHEN {condition} THEN {result}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("CASE {whens} ELSE NULL END")
}
