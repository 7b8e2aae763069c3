//! Numeric extraction and range bounding.
//!
//! Each builder has an in-process twin used by the preview path; both apply
//! the same patterns in the same order.

use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;

use crate::sql;

/// Everything that is neither a digit nor a literal point.
pub const NON_NUMERIC_PATTERN: &str = "[^0-9.]";
/// The first digit followed by a point; replaced once, never globally.
pub const FIRST_POINT_PATTERN: &str = "([0-9])\\.";
/// Placeholder for the honored separator while later points are stripped.
/// Cannot collide with input because the first pass removes it.
pub const POINT_MARKER: &str = "~";

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NON_NUMERIC_PATTERN).expect("static pattern"));
static FIRST_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FIRST_POINT_PATTERN).expect("static pattern"));

/// Strips `source` down to a decimal numeral; `NULL` when nothing is left.
///
/// Only the first point that follows a digit survives as the separator.
/// Every later point is removed and the digits after it are kept, so
/// `1.234.56` becomes `1.23456`.
pub fn extract_number(source: &str) -> String {
    let digits_only = format!(
        "REGEXP_REPLACE({source}, {}, '', 'g')",
        sql::quote_literal(NON_NUMERIC_PATTERN)
    );
    let marked = format!(
        "REGEXP_REPLACE({digits_only}, {}, {})",
        sql::quote_literal(FIRST_POINT_PATTERN),
        sql::quote_literal(&format!("\\1{POINT_MARKER}"))
    );
    let unpointed = format!("REGEXP_REPLACE({marked}, '\\.', '', 'g')");
    let restored = format!(
        "REGEXP_REPLACE({unpointed}, {}, '.')",
        sql::quote_literal(POINT_MARKER)
    );
    format!("CAST(NULLIF({restored}, '') AS DECIMAL)")
}

/// Casts a numeric expression to `BIGINT`; `NULL` when the rounded value
/// falls outside the `BIGINT` range. The expression is evaluated once.
pub fn fit_bigint(expr: &str) -> String {
    format!(
        "(SELECT CASE WHEN ROUND(__number.__value) BETWEEN {} AND {} \
         THEN CAST(__number.__value AS BIGINT) END \
         FROM (SELECT {expr} AS __value) AS __number)",
        i64::MIN,
        i64::MAX
    )
}

/// Saturating clamp into `[min, max]` that keeps `NULL` as `NULL`.
pub fn clamp(expr: &str, min: i64, max: i64) -> String {
    format!("CASE WHEN {expr} IS NULL THEN NULL ELSE LEAST(GREATEST({expr}, {min}), {max}) END")
}

/// Clamp into `[min, max]`, except values sitting exactly on the sentinels
/// `min - 1` and `max + 1` become `NULL`.
pub fn bounded(expr: &str, min: i64, max: i64) -> String {
    let below = min.saturating_sub(1);
    let above = max.saturating_add(1);
    format!(
        "CASE WHEN {expr} IS NULL OR {expr} IN ({below}, {above}) THEN NULL \
         ELSE LEAST(GREATEST({expr}, {min}), {max}) END"
    )
}

/// An extracted numeral, as in-process code can hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numeral {
    Exact(Decimal),
    /// Canonical text of a numeral with more integer digits than [`Decimal`]
    /// holds. A SQL `DECIMAL` stores it exactly.
    Wide(String),
}

impl Numeral {
    pub fn exact(&self) -> Option<Decimal> {
        match self {
            Numeral::Exact(value) => Some(*value),
            Numeral::Wide(_) => None,
        }
    }

    /// The exact value, or `max` for a wide numeral. Extraction never keeps a
    /// sign, so a wide numeral always lies above any `i64` bound.
    pub fn saturate(&self, max: i64) -> Decimal {
        self.exact().unwrap_or_else(|| Decimal::from(max))
    }
}

fn canonical(numeral: &str) -> String {
    let (whole, fraction) = numeral.split_once('.').unwrap_or((numeral, ""));
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// In-process counterpart of [`extract_number`].
pub fn extract_numeral(raw: &str) -> Option<Numeral> {
    let digits_only = NON_NUMERIC.replace_all(raw, "");
    let marked = FIRST_POINT.replacen(&digits_only, 1, format!("${{1}}{POINT_MARKER}"));
    let restored = marked.replace('.', "").replace(POINT_MARKER, ".");
    let numeral = restored.strip_suffix('.').unwrap_or(&restored);
    if numeral.is_empty() {
        return None;
    }
    Some(match Decimal::from_str(numeral) {
        Ok(value) => Numeral::Exact(value.normalize()),
        Err(_) => Numeral::Wide(canonical(numeral)),
    })
}

/// [`extract_numeral`] narrowed to values that fit a [`Decimal`].
pub fn parse_number(raw: &str) -> Option<Decimal> {
    extract_numeral(raw).as_ref().and_then(Numeral::exact)
}

pub fn clamp_value(value: Decimal, min: i64, max: i64) -> Decimal {
    value.max(Decimal::from(min)).min(Decimal::from(max))
}

pub fn bounded_value(value: Decimal, min: i64, max: i64) -> Option<Decimal> {
    let below = Decimal::from(min.saturating_sub(1));
    let above = Decimal::from(max.saturating_add(1));
    if value == below || value == above {
        None
    } else {
        Some(clamp_value(value, min, max))
    }
}
