//! Typed column to display text, the inverse of the cast compiler.
//!
//! Formatting is best-effort display rather than validation, so unknown type
//! names fall back to a plain text cast instead of failing.

use std::str::FromStr;

use crate::{semantic_type::SemanticType, sql};

#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnFormatter;

impl ColumnFormatter {
    pub fn format(&self, column: &str, semantic_type: SemanticType) -> String {
        let ident = sql::quote_ident(column);
        match semantic_type {
            SemanticType::LongText
            | SemanticType::SingleLineText
            | SemanticType::Email
            | SemanticType::PhoneNumber
            | SemanticType::Url
            | SemanticType::SingleSelect
            | SemanticType::MultiSelect => text_cast(&ident),
            SemanticType::Number
            | SemanticType::Year
            | SemanticType::Decimal
            | SemanticType::Currency
            | SemanticType::Percent
            | SemanticType::Rating => text_cast(&ident),
            SemanticType::Checkbox => {
                format!("CASE {ident} WHEN TRUE THEN '1' WHEN FALSE THEN '0' ELSE NULL END")
            }
            SemanticType::Date
            | SemanticType::DateTime
            | SemanticType::Time
            | SemanticType::Duration => text_cast(&ident),
        }
    }

    pub fn format_named(&self, column: &str, type_name: &str) -> String {
        match SemanticType::from_str(type_name) {
            Ok(semantic_type) => self.format(column, semantic_type),
            Err(_) => text_cast(&sql::quote_ident(column)),
        }
    }
}

fn text_cast(expr: &str) -> String {
    format!("CAST({expr} AS TEXT)")
}
