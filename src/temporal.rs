//! Date, time, datetime and duration cascades over a [`FormatCatalog`].
//!
//! Every cascade tries its format sequence in order and commits to the first
//! recognizer that matches. A later format is never consulted once an earlier
//! one matched, even if parsing under the earlier token then fails.

use std::{str::FromStr, sync::LazyLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    catalog::{FormatCatalog, FormatSpec},
    error::Result,
    sql,
};

/// Plain seconds, optionally fractional. Checked before any time format.
pub const DURATION_SECONDS_PATTERN: &str = "[0-9]+(\\.[0-9]+)?";

static DURATION_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&sql::anchor(DURATION_SECONDS_PATTERN)).expect("static pattern")
});

fn cascade<F>(source: &str, specs: &[FormatSpec], parser: F) -> String
where
    F: Fn(&str) -> String,
{
    let arms = specs
        .iter()
        .map(|spec| {
            (
                sql::regex_match(source, &spec.pattern),
                parser(&sql::quote_literal(&spec.token)),
            )
        })
        .collect::<Vec<_>>();
    sql::case_cascade(&arms)
}

pub fn match_date(catalog: &FormatCatalog, source: &str, format_id: &str) -> Result<String> {
    let specs = catalog.date_formats(format_id)?;
    Ok(cascade(source, specs, |token| {
        format!("TO_DATE({source}, {token})")
    }))
}

pub fn match_datetime(catalog: &FormatCatalog, source: &str, format_id: &str) -> Result<String> {
    let specs = catalog.datetime_formats(format_id)?;
    Ok(cascade(source, &specs, |token| {
        format!("TO_TIMESTAMP({source}, {token})")
    }))
}

pub fn match_time(catalog: &FormatCatalog, source: &str) -> String {
    cascade(source, catalog.time_formats(), |token| {
        format!("CAST(TO_TIMESTAMP({source}, {token}) AS TIME)")
    })
}

pub fn duration_seconds(catalog: &FormatCatalog, source: &str) -> String {
    let mut arms = vec![(
        sql::regex_match(source, DURATION_SECONDS_PATTERN),
        format!("CAST({source} AS DECIMAL)"),
    )];
    arms.extend(catalog.time_formats().iter().map(|spec| {
        (
            sql::regex_match(source, &spec.pattern),
            format!(
                "EXTRACT(EPOCH FROM CAST(TO_TIMESTAMP({source}, {}) AS TIME))",
                sql::quote_literal(&spec.token)
            ),
        )
    }));
    sql::case_cascade(&arms)
}

/// Translates a `TO_DATE`/`TO_TIMESTAMP` template into a chrono format string.
pub fn chrono_format(token: &str) -> String {
    const TRANSLATIONS: &[(&str, &str)] = &[
        ("YYYY", "%Y"),
        ("Month", "%B"),
        ("Mon", "%b"),
        ("HH24", "%H"),
        ("HH12", "%I"),
        ("HH", "%I"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("MI", "%M"),
        ("SS", "%S"),
        ("AM", "%p"),
        ("PM", "%p"),
    ];
    let mut output = String::with_capacity(token.len() * 2);
    let mut rest = token;
    'outer: while !rest.is_empty() {
        for &(template, replacement) in TRANSLATIONS {
            if let Some(tail) = rest.strip_prefix(template) {
                output.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                output.push_str("%%");
            } else {
                output.push(ch);
            }
        }
        rest = chars.as_str();
    }
    output
}

fn first_match<'a>(raw: &str, specs: &'a [FormatSpec]) -> Result<Option<&'a FormatSpec>> {
    for spec in specs {
        if spec.recognizer()?.is_match(raw) {
            return Ok(Some(spec));
        }
    }
    Ok(None)
}

pub fn parse_date(catalog: &FormatCatalog, raw: &str, format_id: &str) -> Result<Option<NaiveDate>> {
    let specs = catalog.date_formats(format_id)?;
    Ok(first_match(raw, specs)?
        .and_then(|spec| NaiveDate::parse_from_str(raw, &chrono_format(&spec.token)).ok()))
}

pub fn parse_datetime(
    catalog: &FormatCatalog,
    raw: &str,
    format_id: &str,
) -> Result<Option<NaiveDateTime>> {
    let specs = catalog.datetime_formats(format_id)?;
    Ok(first_match(raw, &specs)?
        .and_then(|spec| NaiveDateTime::parse_from_str(raw, &chrono_format(&spec.token)).ok()))
}

pub fn parse_time(catalog: &FormatCatalog, raw: &str) -> Result<Option<NaiveTime>> {
    Ok(first_match(raw, catalog.time_formats())?
        .and_then(|spec| NaiveTime::parse_from_str(raw, &chrono_format(&spec.token)).ok()))
}

pub fn parse_duration(catalog: &FormatCatalog, raw: &str) -> Result<Option<Decimal>> {
    if DURATION_SECONDS.is_match(raw) {
        return Ok(Decimal::from_str(raw).ok());
    }
    Ok(parse_time(catalog, raw)?.map(|time| {
        let seconds = Decimal::from(time.num_seconds_from_midnight());
        let fraction = Decimal::new(i64::from(time.nanosecond()), 9);
        (seconds + fraction).normalize()
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn chrono_format_translates_templates() {
        assert_eq!(chrono_format("DD/MM/YYYY"), "%d/%m/%Y");
        assert_eq!(chrono_format("Mon DD YYYY"), "%b %d %Y");
        assert_eq!(chrono_format("HH12:MI:SS AM"), "%I:%M:%S %p");
        assert_eq!(chrono_format("YYYY-MM-DD HH24:MI"), "%Y-%m-%d %H:%M");
        assert_eq!(chrono_format("DD.MM.YY"), "%d.%m.%y");
    }

    #[test]
    fn date_cascade_emits_one_arm_per_spec() {
        let catalog = FormatCatalog::builtin();
        let expr = match_date(&catalog, "\"d\"", "ymd").unwrap();
        let arms = catalog
            .date_formats("ymd")
            .unwrap()
            .iter()
            .map(|spec| {
                format!(
                    "WHEN \"d\" ~ '^{}$' THEN TO_DATE(\"d\", '{}')",
                    spec.pattern, spec.token
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(expr, format!("CASE {} ELSE NULL END", arms.join(" ")));
        assert_eq!(expr.matches("TO_DATE(").count(), 4);
    }

    #[test]
    fn cascade_order_beats_specificity() {
        let mut dates = BTreeMap::new();
        dates.insert(
            "loose".to_string(),
            vec![
                FormatSpec::new("DD/MM/YYYY", "[0-9]{2}/[0-9]{2}/[0-9]{4}"),
                FormatSpec::new("MM/DD/YYYY", "[0-1][0-9]/[0-9]{2}/[0-9]{4}"),
            ],
        );
        let catalog = FormatCatalog::new(
            dates,
            vec![FormatSpec::new("HH24:MI", "[0-9]{2}:[0-9]{2}")],
        )
        .unwrap();
        let parsed = parse_date(&catalog, "03/04/2024", "loose").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 4, 3));
    }

    #[test]
    fn matched_but_unparseable_does_not_fall_through() {
        let mut dates = BTreeMap::new();
        dates.insert(
            "loose".to_string(),
            vec![
                FormatSpec::new("DD/MM/YYYY", "[0-9]{2}/[0-9]{2}/[0-9]{4}"),
                FormatSpec::new("MM/DD/YYYY", "[0-9]{2}/[0-9]{2}/[0-9]{4}"),
            ],
        );
        let catalog = FormatCatalog::new(
            dates,
            vec![FormatSpec::new("HH24:MI", "[0-9]{2}:[0-9]{2}")],
        )
        .unwrap();
        // Month 13 fails under the first token; the second is never tried.
        assert_eq!(parse_date(&catalog, "01/13/2024", "loose").unwrap(), None);
    }

    #[test]
    fn out_of_range_fields_fall_through_to_null() {
        let catalog = FormatCatalog::builtin();
        assert_eq!(parse_date(&catalog, "13/13/2024", "dmy").unwrap(), None);
        assert_eq!(parse_date(&catalog, "31/02/2024", "dmy").unwrap(), None);
        assert_eq!(parse_time(&catalog, "25:61").unwrap(), None);
        assert_eq!(parse_duration(&catalog, "25:61").unwrap(), None);
        assert_eq!(
            parse_date(&catalog, "29/02/2024", "dmy").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn unknown_format_id_is_an_error() {
        let catalog = FormatCatalog::builtin();
        assert!(match_date(&catalog, "x", "iso").is_err());
        assert!(match_datetime(&catalog, "x", "iso").is_err());
        assert!(parse_date(&catalog, "2024-01-01", "iso").is_err());
    }

    #[test]
    fn duration_prefers_plain_seconds() {
        let catalog = FormatCatalog::builtin();
        assert_eq!(parse_duration(&catalog, "90").unwrap(), Some(Decimal::from(90)));
        assert_eq!(
            parse_duration(&catalog, "1:30").unwrap(),
            Some(Decimal::from(5400))
        );
        assert_eq!(
            parse_duration(&catalog, "01:00:05").unwrap(),
            Some(Decimal::from(3605))
        );
        assert_eq!(parse_duration(&catalog, "ninety").unwrap(), None);

        let expr = duration_seconds(&catalog, "\"d\"");
        assert!(expr.starts_with(
            "CASE WHEN \"d\" ~ '^[0-9]+(\\.[0-9]+)?$' THEN CAST(\"d\" AS DECIMAL) WHEN"
        ));
        assert!(expr.contains(
            "THEN EXTRACT(EPOCH FROM CAST(TO_TIMESTAMP(\"d\", 'HH24:MI:SS') AS TIME))"
        ));
    }

    #[test]
    fn time_cascade_handles_meridiem() {
        let catalog = FormatCatalog::builtin();
        assert_eq!(
            parse_time(&catalog, "2:15 PM").unwrap(),
            NaiveTime::from_hms_opt(14, 15, 0)
        );
        assert_eq!(
            parse_time(&catalog, "14:15:30").unwrap(),
            NaiveTime::from_hms_opt(14, 15, 30)
        );
    }
}
