//! Option-set filters for single and multi select columns.
//!
//! Multi select values are tokenized on [`MULTI_SELECT_DELIMITER`], each
//! segment is kept only when it equals an allowed option, and the survivors
//! are rejoined in their original order. An all-invalid list becomes `NULL`.

use itertools::Itertools;

use crate::sql;

pub const MULTI_SELECT_DELIMITER: &str = ",";

/// Anchored alternation of the escaped options, e.g. `^(Red|Bl\.ue)$`.
pub fn option_pattern<S: AsRef<str>>(options: &[S]) -> String {
    let alternatives = options
        .iter()
        .map(|option| sql::escape_regex(option.as_ref()))
        .join("|");
    sql::anchor(&format!("({alternatives})"))
}

pub fn filter_single<S: AsRef<str>>(source: &str, options: &[S]) -> String {
    if options.is_empty() {
        return "NULL".to_string();
    }
    sql::case_cascade(&[(
        format!("{source} IN ({})", sql::literal_list(options)),
        source.to_string(),
    )])
}

pub fn filter_multi<S: AsRef<str>>(source: &str, options: &[S]) -> String {
    if options.is_empty() {
        return "NULL".to_string();
    }
    let delimiter = sql::quote_literal(MULTI_SELECT_DELIMITER);
    format!(
        "NULLIF(ARRAY_TO_STRING(ARRAY(\
         SELECT __segment.__value \
         FROM UNNEST(STRING_TO_ARRAY({source}, {delimiter})) \
         WITH ORDINALITY AS __segment(__value, __ordinal) \
         WHERE __segment.__value ~ {pattern} \
         ORDER BY __segment.__ordinal), {delimiter}), '')",
        pattern = sql::quote_literal(&option_pattern(options)),
    )
}

pub fn parse_single<S: AsRef<str>>(raw: &str, options: &[S]) -> Option<String> {
    options
        .iter()
        .any(|option| option.as_ref() == raw)
        .then(|| raw.to_string())
}

pub fn parse_multi<S: AsRef<str>>(raw: &str, options: &[S]) -> Option<String> {
    let kept = raw
        .split(MULTI_SELECT_DELIMITER)
        .filter(|segment| options.iter().any(|option| option.as_ref() == *segment))
        .join(MULTI_SELECT_DELIMITER);
    (!kept.is_empty()).then_some(kept)
}
