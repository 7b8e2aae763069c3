use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{
    boolean,
    catalog::FormatCatalog,
    compiler::{CastRequest, PERCENT_MAX, PERCENT_MIN, YEAR_MAX, YEAR_MIN},
    error::Result,
    number::{self, Numeral},
    options,
    semantic_type::SemanticType,
    temporal,
};

/// A coerced cell, as the target engine would store it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    /// A decimal numeral wider than [`Decimal`]; canonical digits.
    WideDecimal(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    /// Elapsed seconds.
    Duration(Decimal),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) | Value::WideDecimal(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) | Value::Duration(d) => d.normalize().to_string(),
            Value::Boolean(b) => String::from(if *b { "1" } else { "0" }),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Time(t) => t.format("%H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn truncate_chars(raw: &str, limit: u32) -> String {
    raw.chars().take(limit as usize).collect()
}

/// Rounds half away from zero the way a `NUMERIC` to integer cast does.
fn to_integer(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Evaluates `request` against one raw cell in-process.
///
/// Follows the same rules as the SQL emitted by
/// [`CastCompiler`](crate::compiler::CastCompiler): `Ok(None)` stands for
/// SQL `NULL`, and only request errors (such as an unknown date format)
/// surface as `Err`.
pub fn coerce_value(
    request: &CastRequest,
    catalog: &FormatCatalog,
    raw: &str,
) -> Result<Option<Value>> {
    request.validate_limit()?;
    let value = match request.semantic_type {
        SemanticType::LongText
        | SemanticType::SingleLineText
        | SemanticType::Email
        | SemanticType::PhoneNumber
        | SemanticType::Url => Some(Value::Text(truncate_chars(raw, request.text_limit()))),
        SemanticType::Number => number::parse_number(raw)
            .and_then(to_integer)
            .map(Value::Integer),
        SemanticType::Year => number::extract_numeral(raw)
            .and_then(|n| number::bounded_value(n.saturate(YEAR_MAX), YEAR_MIN, YEAR_MAX))
            .and_then(to_integer)
            .map(Value::Integer),
        SemanticType::Decimal | SemanticType::Currency => {
            number::extract_numeral(raw).map(|numeral| match numeral {
                Numeral::Exact(value) => Value::Decimal(value),
                Numeral::Wide(digits) => Value::WideDecimal(digits),
            })
        }
        SemanticType::Percent => number::extract_numeral(raw)
            .map(|n| number::clamp_value(n.saturate(PERCENT_MAX), PERCENT_MIN, PERCENT_MAX))
            .map(Value::Decimal),
        SemanticType::Rating => {
            let limit = i64::from(request.rating_limit());
            number::extract_numeral(raw)
                .map(|n| number::clamp_value(n.saturate(limit), 0, limit))
                .and_then(to_integer)
                .map(Value::Integer)
        }
        SemanticType::Checkbox => boolean::parse_boolean(raw).map(Value::Boolean),
        SemanticType::Date => {
            temporal::parse_date(catalog, raw, request.date_format_id())?.map(Value::Date)
        }
        SemanticType::DateTime => {
            temporal::parse_datetime(catalog, raw, request.date_format_id())?
                .map(Value::DateTime)
        }
        SemanticType::Time => temporal::parse_time(catalog, raw)?.map(Value::Time),
        SemanticType::Duration => temporal::parse_duration(catalog, raw)?.map(Value::Duration),
        SemanticType::SingleSelect => {
            options::parse_single(raw, &request.options).map(Value::Text)
        }
        SemanticType::MultiSelect => options::parse_multi(raw, &request.options).map(Value::Text),
    };
    Ok(value)
}
