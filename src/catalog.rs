//! Date and time format catalogs.
//!
//! A [`FormatCatalog`] is static configuration: ordered `(token, pattern)`
//! pairs for dates keyed by a format identifier, plus one ordered sequence
//! for times. Order is significant. Matchers walk a sequence front to back and
//! the first recognizer that matches wins, even when a later entry would be
//! more specific.
//!
//! Tokens use PostgreSQL `TO_DATE`/`TO_TIMESTAMP` template syntax. Patterns
//! are POSIX extended regular expressions and are stored *unanchored*; the
//! compiler adds `^...$` when it emits them.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Context;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoerceError, Result},
    sql,
};

pub const DEFAULT_DATE_FORMAT: &str = "dmy";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatSpec {
    pub token: String,
    pub pattern: String,
}

impl FormatSpec {
    pub fn new(token: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            pattern: pattern.into(),
        }
    }

    /// Joins a date spec and a time spec with a single space on both halves.
    pub fn combine(date: &FormatSpec, time: &FormatSpec) -> Self {
        Self {
            token: format!("{} {}", date.token, time.token),
            pattern: format!("{} {}", date.pattern, time.pattern),
        }
    }

    /// Compiles the anchored recognizer for in-process matching.
    pub fn recognizer(&self) -> Result<Regex> {
        Regex::new(&sql::anchor(&self.pattern)).map_err(|err| CoerceError::InvalidPattern {
            token: self.token.clone(),
            pattern: self.pattern.clone(),
            reason: err.to_string(),
        })
    }
}

fn spec(token: &str, pattern: impl Into<String>) -> FormatSpec {
    FormatSpec::new(token, pattern)
}

const YEAR: &str = "[0-9]{4}";
const LEAP_YEAR: &str = "([0-9]{2}(0[48]|[2468][048]|[13579][26])|([02468][048]|[13579][26])00)";
const SHORT_YEAR: &str = "[0-9]{2}";
const SHORT_LEAP_YEAR: &str = "(0[048]|[2468][048]|[13579][26])";
const HOUR_24: &str = "([01]?[0-9]|2[0-3])";
const HOUR_12: &str = "(0?[1-9]|1[0-2])";
const MINUTE: &str = "[0-5][0-9]";
const MERIDIEM: &str = "[AaPp][Mm]";
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day and month fragments for one calendar layout. `day` covers 1 to 28;
/// the wider days are only paired with months that have them.
struct CalendarFields {
    day: String,
    month: String,
    month_30: String,
    month_31: String,
    february: String,
}

impl CalendarFields {
    fn numeric(padding: &str) -> Self {
        Self {
            day: format!("({padding}[1-9]|1[0-9]|2[0-8])"),
            month: format!("({padding}[1-9]|1[0-2])"),
            month_30: format!("({padding}[13-9]|1[0-2])"),
            month_31: format!("({padding}[13578]|1[02])"),
            february: format!("{padding}2"),
        }
    }

    fn named() -> Self {
        let names = |months: &[usize]| {
            let alternatives = months
                .iter()
                .map(|&index| case_insensitive(MONTH_NAMES[index]))
                .join("|");
            format!("({alternatives})")
        };
        Self {
            day: "(0?[1-9]|1[0-9]|2[0-8])".to_string(),
            month: names(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
            month_30: names(&[0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
            month_31: names(&[0, 2, 4, 6, 7, 9, 11]),
            february: case_insensitive(MONTH_NAMES[1]),
        }
    }

    /// Alternation over every day/month pairing that exists, with February
    /// 29 only in leap years. `layout` places `(day, month, year)`.
    fn calendar<F>(&self, year: &str, leap_year: &str, layout: F) -> String
    where
        F: Fn(&str, &str, &str) -> String,
    {
        let arms = [
            layout(self.day.as_str(), self.month.as_str(), year),
            layout("(29|30)", self.month_30.as_str(), year),
            layout("31", self.month_31.as_str(), year),
            layout("29", self.february.as_str(), leap_year),
        ];
        format!("({})", arms.iter().map(|arm| format!("({arm})")).join("|"))
    }
}

fn case_insensitive(word: &str) -> String {
    word.chars()
        .map(|ch| format!("[{}{}]", ch.to_ascii_uppercase(), ch.to_ascii_lowercase()))
        .collect()
}

fn day_first(separator: &'static str) -> impl Fn(&str, &str, &str) -> String {
    move |day: &str, month: &str, year: &str| {
        format!("{day}{separator}{month}{separator}{year}")
    }
}

fn month_first(separator: &'static str) -> impl Fn(&str, &str, &str) -> String {
    move |day: &str, month: &str, year: &str| {
        format!("{month}{separator}{day}{separator}{year}")
    }
}

fn year_first(separator: &'static str) -> impl Fn(&str, &str, &str) -> String {
    move |day: &str, month: &str, year: &str| {
        format!("{year}{separator}{month}{separator}{day}")
    }
}

/// Raw catalog shape; every path into [`FormatCatalog`] goes through
/// [`FormatCatalog::new`] and its validation.
#[derive(Deserialize)]
struct RawCatalog {
    date_formats: BTreeMap<String, Vec<FormatSpec>>,
    time_formats: Vec<FormatSpec>,
}

impl TryFrom<RawCatalog> for FormatCatalog {
    type Error = CoerceError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Self::new(raw.date_formats, raw.time_formats)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawCatalog")]
pub struct FormatCatalog {
    date_formats: BTreeMap<String, Vec<FormatSpec>>,
    time_formats: Vec<FormatSpec>,
}

impl FormatCatalog {
    pub fn new(
        date_formats: BTreeMap<String, Vec<FormatSpec>>,
        time_formats: Vec<FormatSpec>,
    ) -> Result<Self> {
        let catalog = Self {
            date_formats,
            time_formats,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Built-in sequences. Recognizers only admit field values that exist on
    /// the calendar and the clock, so a matched cell always converts.
    pub fn builtin() -> Self {
        let flexible = CalendarFields::numeric("0?");
        let fixed = CalendarFields::numeric("0");
        let named = CalendarFields::named();
        let iso = flexible.calendar(YEAR, LEAP_YEAR, year_first("-"));

        let mut date_formats = BTreeMap::new();
        date_formats.insert(
            "dmy".to_string(),
            vec![
                spec("DD/MM/YYYY", flexible.calendar(YEAR, LEAP_YEAR, day_first("/"))),
                spec("DD-MM-YYYY", flexible.calendar(YEAR, LEAP_YEAR, day_first("-"))),
                spec("DD.MM.YYYY", flexible.calendar(YEAR, LEAP_YEAR, day_first("\\."))),
                spec(
                    "DD/MM/YY",
                    flexible.calendar(SHORT_YEAR, SHORT_LEAP_YEAR, day_first("/")),
                ),
                spec("YYYY-MM-DD", iso.clone()),
                spec("DD Mon YYYY", named.calendar(YEAR, LEAP_YEAR, day_first(" "))),
            ],
        );
        date_formats.insert(
            "mdy".to_string(),
            vec![
                spec("MM/DD/YYYY", flexible.calendar(YEAR, LEAP_YEAR, month_first("/"))),
                spec("MM-DD-YYYY", flexible.calendar(YEAR, LEAP_YEAR, month_first("-"))),
                spec(
                    "MM/DD/YY",
                    flexible.calendar(SHORT_YEAR, SHORT_LEAP_YEAR, month_first("/")),
                ),
                spec("YYYY-MM-DD", iso.clone()),
                spec("Mon DD YYYY", named.calendar(YEAR, LEAP_YEAR, month_first(" "))),
            ],
        );
        date_formats.insert(
            "ymd".to_string(),
            vec![
                spec("YYYY-MM-DD", iso),
                spec("YYYY/MM/DD", flexible.calendar(YEAR, LEAP_YEAR, year_first("/"))),
                spec("YYYY.MM.DD", flexible.calendar(YEAR, LEAP_YEAR, year_first("\\."))),
                spec("YYYYMMDD", fixed.calendar(YEAR, LEAP_YEAR, year_first(""))),
            ],
        );
        let time_formats = vec![
            spec("HH24:MI:SS", format!("{HOUR_24}:{MINUTE}:{MINUTE}")),
            spec("HH24:MI", format!("{HOUR_24}:{MINUTE}")),
            spec(
                "HH12:MI:SS AM",
                format!("{HOUR_12}:{MINUTE}:{MINUTE} {MERIDIEM}"),
            ),
            spec("HH12:MI AM", format!("{HOUR_12}:{MINUTE} {MERIDIEM}")),
        ];
        Self {
            date_formats,
            time_formats,
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: RawCatalog = serde_yaml::from_str(contents)
            .map_err(|err| CoerceError::Catalog(err.to_string()))?;
        Self::try_from(raw)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Reading format catalog {path:?}"))?;
        let catalog = Self::from_yaml_str(&contents)
            .with_context(|| format!("Parsing format catalog {path:?}"))?;
        debug!(
            "Loaded format catalog {:?} with {} date format(s)",
            path,
            catalog.date_formats.len()
        );
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|err| CoerceError::Catalog(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(CoerceError::Catalog(
                "catalog defines no date formats".to_string(),
            ));
        }
        for (id, specs) in &self.date_formats {
            if specs.is_empty() {
                return Err(CoerceError::EmptyFormatSequence(id.clone()));
            }
            for entry in specs {
                entry.recognizer()?;
            }
        }
        if self.time_formats.is_empty() {
            return Err(CoerceError::EmptyFormatSequence("time".to_string()));
        }
        for entry in &self.time_formats {
            entry.recognizer()?;
        }
        Ok(())
    }

    pub fn date_formats(&self, id: &str) -> Result<&[FormatSpec]> {
        self.date_formats
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| CoerceError::UnknownDateFormat {
                id: id.to_string(),
                available: self.format_ids().join(", "),
            })
    }

    pub fn time_formats(&self) -> &[FormatSpec] {
        &self.time_formats
    }

    /// Date-major, time-minor cross product of one date sequence with the
    /// time sequence.
    pub fn datetime_formats(&self, id: &str) -> Result<Vec<FormatSpec>> {
        let dates = self.date_formats(id)?;
        Ok(itertools::iproduct!(dates.iter(), self.time_formats.iter())
            .map(|(date, time)| FormatSpec::combine(date, time))
            .collect())
    }

    pub fn format_ids(&self) -> Vec<&str> {
        self.date_formats.keys().map(String::as_str).collect()
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
