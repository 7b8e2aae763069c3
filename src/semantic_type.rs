//! Semantic column types understood by the cast compiler.
//!
//! [`SemanticType`] is a closed set. Both [`crate::compiler::CastCompiler`]
//! and [`crate::formatter::ColumnFormatter`] match on it exhaustively, so a
//! new variant does not build until both sides handle it. Type names coming
//! from outside (plans, the CLI) go through [`FromStr`], which reports any
//! name outside the set as [`CoerceError::NotImplemented`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::CoerceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticType {
    LongText,
    SingleLineText,
    Email,
    PhoneNumber,
    Url,
    Number,
    Year,
    Decimal,
    Currency,
    Percent,
    Rating,
    Date,
    DateTime,
    Time,
    Duration,
    Checkbox,
    SingleSelect,
    MultiSelect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Text,
    Numeric,
    Temporal,
    Logical,
    Enumerated,
}

impl TypeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Text => "text",
            TypeCategory::Numeric => "numeric",
            TypeCategory::Temporal => "temporal",
            TypeCategory::Logical => "logical",
            TypeCategory::Enumerated => "enumerated",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SemanticType {
    pub const ALL: [SemanticType; 18] = [
        SemanticType::LongText,
        SemanticType::SingleLineText,
        SemanticType::Email,
        SemanticType::PhoneNumber,
        SemanticType::Url,
        SemanticType::Number,
        SemanticType::Year,
        SemanticType::Decimal,
        SemanticType::Currency,
        SemanticType::Percent,
        SemanticType::Rating,
        SemanticType::Date,
        SemanticType::DateTime,
        SemanticType::Time,
        SemanticType::Duration,
        SemanticType::Checkbox,
        SemanticType::SingleSelect,
        SemanticType::MultiSelect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::LongText => "LongText",
            SemanticType::SingleLineText => "SingleLineText",
            SemanticType::Email => "Email",
            SemanticType::PhoneNumber => "PhoneNumber",
            SemanticType::Url => "URL",
            SemanticType::Number => "Number",
            SemanticType::Year => "Year",
            SemanticType::Decimal => "Decimal",
            SemanticType::Currency => "Currency",
            SemanticType::Percent => "Percent",
            SemanticType::Rating => "Rating",
            SemanticType::Date => "Date",
            SemanticType::DateTime => "DateTime",
            SemanticType::Time => "Time",
            SemanticType::Duration => "Duration",
            SemanticType::Checkbox => "Checkbox",
            SemanticType::SingleSelect => "SingleSelect",
            SemanticType::MultiSelect => "MultiSelect",
        }
    }

    pub fn category(&self) -> TypeCategory {
        match self {
            SemanticType::LongText
            | SemanticType::SingleLineText
            | SemanticType::Email
            | SemanticType::PhoneNumber
            | SemanticType::Url => TypeCategory::Text,
            SemanticType::Number
            | SemanticType::Year
            | SemanticType::Decimal
            | SemanticType::Currency
            | SemanticType::Percent
            | SemanticType::Rating => TypeCategory::Numeric,
            SemanticType::Date
            | SemanticType::DateTime
            | SemanticType::Time
            | SemanticType::Duration => TypeCategory::Temporal,
            SemanticType::Checkbox => TypeCategory::Logical,
            SemanticType::SingleSelect | SemanticType::MultiSelect => TypeCategory::Enumerated,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_type_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for SemanticType {
    type Err = CoerceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = match normalize_type_name(value).as_str() {
            "longtext" => SemanticType::LongText,
            "singlelinetext" | "text" => SemanticType::SingleLineText,
            "email" => SemanticType::Email,
            "phonenumber" | "phone" => SemanticType::PhoneNumber,
            "url" => SemanticType::Url,
            "number" | "integer" => SemanticType::Number,
            "year" => SemanticType::Year,
            "decimal" => SemanticType::Decimal,
            "currency" => SemanticType::Currency,
            "percent" => SemanticType::Percent,
            "rating" => SemanticType::Rating,
            "date" => SemanticType::Date,
            "datetime" | "timestamp" => SemanticType::DateTime,
            "time" => SemanticType::Time,
            "duration" => SemanticType::Duration,
            "checkbox" | "boolean" | "bool" => SemanticType::Checkbox,
            "singleselect" => SemanticType::SingleSelect,
            "multiselect" => SemanticType::MultiSelect,
            _ => {
                return Err(CoerceError::NotImplemented {
                    datatype: value.trim().to_string(),
                });
            }
        };
        Ok(parsed)
    }
}

impl Serialize for SemanticType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        SemanticType::from_str(&token).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names_and_aliases() {
        assert_eq!(
            "SingleSelect".parse::<SemanticType>().unwrap(),
            SemanticType::SingleSelect
        );
        assert_eq!(
            "single select".parse::<SemanticType>().unwrap(),
            SemanticType::SingleSelect
        );
        assert_eq!(
            "multi_select".parse::<SemanticType>().unwrap(),
            SemanticType::MultiSelect
        );
        assert_eq!("URL".parse::<SemanticType>().unwrap(), SemanticType::Url);
        assert_eq!(
            "timestamp".parse::<SemanticType>().unwrap(),
            SemanticType::DateTime
        );
    }

    #[test]
    fn canonical_names_parse_back() {
        for ty in SemanticType::ALL {
            assert_eq!(ty.as_str().parse::<SemanticType>().unwrap(), ty);
        }
    }

    #[test]
    fn unknown_names_are_not_implemented() {
        let err = "Attachment".parse::<SemanticType>().unwrap_err();
        assert_eq!(
            err,
            CoerceError::NotImplemented {
                datatype: "Attachment".to_string()
            }
        );
        assert!(err.to_string().contains("Attachment"));
    }

    #[test]
    fn categories_cover_every_type() {
        assert_eq!(SemanticType::Email.category(), TypeCategory::Text);
        assert_eq!(SemanticType::Rating.category(), TypeCategory::Numeric);
        assert_eq!(SemanticType::Duration.category(), TypeCategory::Temporal);
        assert_eq!(SemanticType::Checkbox.category(), TypeCategory::Logical);
        assert_eq!(
            SemanticType::MultiSelect.category(),
            TypeCategory::Enumerated
        );
    }
}
