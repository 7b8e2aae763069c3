//! Semantic type to SQL cast expression.
//!
//! [`CastCompiler`] is the single entry point used by the import pipeline. It
//! owns an immutable [`FormatCatalog`] and turns one [`CastRequest`] into one
//! expression string. It holds no mutable state, so a shared reference can be
//! used from any number of threads.

use std::str::FromStr;

use log::debug;

use crate::{
    boolean,
    catalog::{DEFAULT_DATE_FORMAT, FormatCatalog},
    error::{CoerceError, Result},
    number, options,
    semantic_type::{SemanticType, TypeCategory},
    temporal,
};

pub const DEFAULT_TEXT_LIMIT: u32 = 255;
pub const DEFAULT_RATING_LIMIT: u32 = 5;
/// Longest `VARCHAR(n)` PostgreSQL accepts.
pub const MAX_TEXT_LIMIT: u32 = 10_485_760;
/// Largest rating that still casts to `INTEGER`.
pub const MAX_RATING_LIMIT: u32 = i32::MAX as u32;
pub const YEAR_MIN: i64 = 1000;
pub const YEAR_MAX: i64 = 9999;
pub const PERCENT_MIN: i64 = 0;
pub const PERCENT_MAX: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastRequest {
    pub semantic_type: SemanticType,
    /// SQL expression producing the raw text, usually a quoted column.
    pub source: String,
    pub limit: Option<u32>,
    pub date_format: Option<String>,
    pub options: Vec<String>,
}

impl CastRequest {
    pub fn new(semantic_type: SemanticType, source: impl Into<String>) -> Self {
        Self {
            semantic_type,
            source: source.into(),
            limit: None,
            date_format: None,
            options: Vec::new(),
        }
    }

    /// Builds a request from an external type name; names outside the closed
    /// set fail as not implemented.
    pub fn named(type_name: &str, source: impl Into<String>) -> Result<Self> {
        Ok(Self::new(SemanticType::from_str(type_name)?, source))
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_date_format(mut self, id: impl Into<String>) -> Self {
        self.date_format = Some(id.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn date_format_id(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    pub fn text_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TEXT_LIMIT)
    }

    pub fn rating_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_RATING_LIMIT)
    }

    /// Rejects a limit the target type cannot be declared or cast with.
    pub fn validate_limit(&self) -> Result<()> {
        let valid = match self.semantic_type {
            SemanticType::Rating => self.rating_limit() <= MAX_RATING_LIMIT,
            ty if ty.category() == TypeCategory::Text => {
                (1..=MAX_TEXT_LIMIT).contains(&self.text_limit())
            }
            _ => true,
        };
        match self.limit {
            Some(limit) if !valid => Err(CoerceError::InvalidLimit {
                datatype: self.semantic_type.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CastCompiler {
    catalog: FormatCatalog,
}

impl CastCompiler {
    pub fn new(catalog: FormatCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn compile(&self, request: &CastRequest) -> Result<String> {
        request.validate_limit()?;
        let source = request.source.as_str();
        let expression = match request.semantic_type {
            SemanticType::LongText
            | SemanticType::SingleLineText
            | SemanticType::Email
            | SemanticType::PhoneNumber
            | SemanticType::Url => {
                format!("CAST({source} AS VARCHAR({}))", request.text_limit())
            }
            SemanticType::Number => number::fit_bigint(&number::extract_number(source)),
            SemanticType::Year => format!(
                "CAST({} AS INTEGER)",
                number::bounded(&number::extract_number(source), YEAR_MIN, YEAR_MAX)
            ),
            SemanticType::Decimal | SemanticType::Currency => number::extract_number(source),
            SemanticType::Percent => {
                number::clamp(&number::extract_number(source), PERCENT_MIN, PERCENT_MAX)
            }
            SemanticType::Rating => format!(
                "CAST({} AS INTEGER)",
                number::clamp(
                    &number::extract_number(source),
                    0,
                    i64::from(request.rating_limit())
                )
            ),
            SemanticType::Checkbox => boolean::normalize_boolean(source),
            SemanticType::Date => {
                temporal::match_date(&self.catalog, source, request.date_format_id())?
            }
            SemanticType::DateTime => {
                temporal::match_datetime(&self.catalog, source, request.date_format_id())?
            }
            SemanticType::Time => temporal::match_time(&self.catalog, source),
            SemanticType::Duration => temporal::duration_seconds(&self.catalog, source),
            SemanticType::SingleSelect => options::filter_single(source, &request.options),
            SemanticType::MultiSelect => options::filter_multi(source, &request.options),
        };
        debug!(
            "Compiled {} cast for {} ({} byte(s))",
            request.semantic_type,
            source,
            expression.len()
        );
        Ok(expression)
    }
}
