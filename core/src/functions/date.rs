//! Date functions. Dates are UTC instants; functions that take a time zone do their
//! calendar arithmetic in that zone and convert back.

use core::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, Locale, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use super::{Arity, Category, FunctionDescriptor, FunctionError, FunctionRegistry, number, text};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

/// Calendar unit used by `date_add`, `date_set` and `date_get`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DateUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl DateUnit {
    /// Parses a unit name such as `"day"`. Case-insensitive.
    pub fn parse(name: &str) -> Option<DateUnit> {
        Some(match name.trim().to_ascii_lowercase().as_str() {
            "year" => DateUnit::Year,
            "month" => DateUnit::Month,
            "week" => DateUnit::Week,
            "day" => DateUnit::Day,
            "hour" => DateUnit::Hour,
            "minute" => DateUnit::Minute,
            "second" => DateUnit::Second,
            "millisecond" => DateUnit::Millisecond,
            _ => return None,
        })
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateUnit::Year => "year",
            DateUnit::Month => "month",
            DateUnit::Week => "week",
            DateUnit::Day => "day",
            DateUnit::Hour => "hour",
            DateUnit::Minute => "minute",
            DateUnit::Second => "second",
            DateUnit::Millisecond => "millisecond",
        })
    }
}

fn date(args: &[Value], index: usize) -> Option<DateTime<Utc>> {
    args.get(index).and_then(Value::as_date)
}

fn unit(name: &str) -> Result<DateUnit, FunctionError> {
    DateUnit::parse(name).ok_or_else(|| FunctionError::InvalidDateUnit(name.to_string()))
}

fn zone(args: &[Value], index: usize) -> Result<Tz, FunctionError> {
    match text(args, index) {
        None => Ok(Tz::UTC),
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map_err(|_| FunctionError::InvalidTimeZone(name.to_string())),
    }
}

fn locale(name: &str) -> Result<Locale, FunctionError> {
    let normalized = name.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| FunctionError::InvalidLocale(name.to_string()))
}

/// Whole amount of a unit; `None` for NaN or infinite amounts.
fn whole(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

fn to_utc(tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>, FunctionError> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
        .ok_or_else(|| {
            FunctionError::InvalidArgument(format!("{} does not exist in time zone {}", local, tz.name()))
        })
}

fn add(date: DateTime<Utc>, amount: i64, unit: DateUnit, tz: Tz) -> Result<DateTime<Utc>, FunctionError> {
    let overflow = || {
        FunctionError::InvalidArgument(format!(
            "adding {} {} leaves the supported date range",
            amount, unit
        ))
    };
    let local = date.with_timezone(&tz).naive_local();
    match unit {
        DateUnit::Year | DateUnit::Month => {
            let months = match unit {
                DateUnit::Year => amount.checked_mul(12),
                _ => Some(amount),
            }
            .ok_or_else(overflow)?;
            let step = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| overflow())?);
            let shifted = if months >= 0 {
                local.checked_add_months(step)
            } else {
                local.checked_sub_months(step)
            }
            .ok_or_else(overflow)?;
            to_utc(tz, shifted)
        }
        DateUnit::Week | DateUnit::Day => {
            let days = match unit {
                DateUnit::Week => amount.checked_mul(7),
                _ => Some(amount),
            }
            .ok_or_else(overflow)?;
            let delta = TimeDelta::try_days(days).ok_or_else(overflow)?;
            to_utc(tz, local.checked_add_signed(delta).ok_or_else(overflow)?)
        }
        DateUnit::Hour | DateUnit::Minute | DateUnit::Second | DateUnit::Millisecond => {
            let delta = match unit {
                DateUnit::Hour => TimeDelta::try_hours(amount),
                DateUnit::Minute => TimeDelta::try_minutes(amount),
                DateUnit::Second => TimeDelta::try_seconds(amount),
                _ => TimeDelta::try_milliseconds(amount),
            }
            .ok_or_else(overflow)?;
            date.checked_add_signed(delta).ok_or_else(overflow)
        }
    }
}

fn set(date: DateTime<Utc>, value: i64, unit: DateUnit, tz: Tz) -> Result<DateTime<Utc>, FunctionError> {
    let out_of_range =
        || FunctionError::InvalidArgument(format!("{} is out of range for unit {}", value, unit));
    let local = date.with_timezone(&tz).naive_local();
    let field = u32::try_from(value).ok();
    let updated = match unit {
        DateUnit::Year => i32::try_from(value).ok().and_then(|year| local.with_year(year)),
        DateUnit::Month => field.and_then(|month| local.with_month(month)),
        DateUnit::Week => field.and_then(|week| {
            let iso = local.date().iso_week();
            NaiveDate::from_isoywd_opt(iso.year(), week, local.weekday())
                .map(|day| day.and_time(local.time()))
        }),
        DateUnit::Day => field.and_then(|day| local.with_day(day)),
        DateUnit::Hour => field.and_then(|hour| local.with_hour(hour)),
        DateUnit::Minute => field.and_then(|minute| local.with_minute(minute)),
        DateUnit::Second => field.and_then(|second| local.with_second(second)),
        DateUnit::Millisecond => field
            .filter(|millis| *millis < 1000)
            .and_then(|millis| local.with_nanosecond(millis * 1_000_000)),
    }
    .ok_or_else(out_of_range)?;
    to_utc(tz, updated)
}

fn get(date: DateTime<Utc>, unit: DateUnit, tz: Tz) -> i64 {
    let local = date.with_timezone(&tz);
    match unit {
        DateUnit::Year => i64::from(local.year()),
        DateUnit::Month => i64::from(local.month()),
        DateUnit::Week => i64::from(local.iso_week().week()),
        DateUnit::Day => i64::from(local.day()),
        DateUnit::Hour => i64::from(local.hour()),
        DateUnit::Minute => i64::from(local.minute()),
        DateUnit::Second => i64::from(local.second()),
        DateUnit::Millisecond => i64::from(local.timestamp_subsec_millis()),
    }
}

// ============================================================================
// Parsing and rendering
// ============================================================================

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses the date formats `date_parse` understands. `None` when none matches.
pub(crate) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|day| day.and_time(NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
}

fn check_pattern(pattern: &str) -> Result<(), FunctionError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FunctionError::InvalidPattern(pattern.to_string()));
    }
    Ok(())
}

fn parse_custom(text: &str, pattern: &str) -> Result<Option<DateTime<Utc>>, FunctionError> {
    check_pattern(pattern)?;
    if let Ok(date) = DateTime::parse_from_str(text, pattern) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
        return Ok(Some(naive.and_utc()));
    }
    Ok(NaiveDate::parse_from_str(text, pattern)
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc()))
}

fn render(date: &DateTime<Utc>, pattern: &str, locale: Option<Locale>) -> Result<String, FunctionError> {
    check_pattern(pattern)?;
    let mut out = String::new();
    let written = match locale {
        Some(locale) => write!(out, "{}", date.format_localized(pattern, locale)),
        None => write!(out, "{}", date.format(pattern)),
    };
    written.map_err(|_| FunctionError::InvalidPattern(pattern.to_string()))?;
    Ok(out)
}

/// Pattern for a size (`short` … `full`) and part (`date`, `time`, `date_time`).
fn style_pattern(size: &str, part: &str, localized: bool) -> Result<String, FunctionError> {
    let size = size.trim().to_ascii_lowercase();
    let (date, time) = match (size.as_str(), localized) {
        ("short", false) => ("%m/%d/%y", "%-I:%M %p"),
        ("medium", false) => ("%b %-d, %Y", "%-I:%M:%S %p"),
        ("long", false) => ("%B %-d, %Y", "%-I:%M:%S %p %Z"),
        ("full", false) => ("%A, %B %-d, %Y", "%-I:%M:%S %p %Z"),
        ("short", true) => ("%x", "%R"),
        ("medium", true) => ("%-d %b %Y", "%X"),
        ("long", true) => ("%-d %B %Y", "%X %Z"),
        ("full", true) => ("%A, %-d %B %Y", "%X %Z"),
        _ => {
            return Err(FunctionError::InvalidArgument(format!(
                "unknown date size '{}'",
                size
            )));
        }
    };
    match part.trim().to_ascii_lowercase().as_str() {
        "date" => Ok(date.to_string()),
        "time" => Ok(time.to_string()),
        "date_time" => Ok(format!("{} {}", date, time)),
        other => Err(FunctionError::InvalidArgument(format!(
            "unknown date part '{}'",
            other
        ))),
    }
}

// ============================================================================
// Registration
// ============================================================================

pub(super) fn register(registry: &mut FunctionRegistry) {
    register_conversions(registry);

    registry.register(
        FunctionDescriptor::builder("date_now", Category::Date)
            .describe("The current date and time")
            .returns(ValueKind::Date)
            .body(|_, _| Ok(Value::date(Utc::now()))),
    );
    registry.register(
        FunctionDescriptor::builder("date_before", Category::Date)
            .describe("Whether the first date is before the second")
            .params([KindSet::DATE, KindSet::DATE])
            .returns(ValueKind::Boolean)
            .body(|_, args| {
                Ok(match (date(args, 0), date(args, 1)) {
                    (Some(a), Some(b)) => Value::boolean(a < b),
                    _ => Value::missing(ValueKind::Boolean),
                })
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_after", Category::Date)
            .describe("Whether the first date is after the second")
            .params([KindSet::DATE, KindSet::DATE])
            .returns(ValueKind::Boolean)
            .body(|_, args| {
                Ok(match (date(args, 0), date(args, 1)) {
                    (Some(a), Some(b)) => Value::boolean(a > b),
                    _ => Value::missing(ValueKind::Boolean),
                })
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_diff", Category::Date)
            .describe("Milliseconds from the first date to the second")
            .params([KindSet::DATE, KindSet::DATE])
            .returns(ValueKind::Integer)
            .body(|_, args| {
                Ok(Value::integer(match (date(args, 0), date(args, 1)) {
                    (Some(a), Some(b)) => (b - a).num_milliseconds() as f64,
                    _ => f64::NAN,
                }))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_millis", Category::Date)
            .describe("Milliseconds since the Unix epoch")
            .params([KindSet::DATE])
            .returns(ValueKind::Integer)
            .body(|_, args| {
                Ok(Value::integer(
                    date(args, 0).map_or(f64::NAN, |d| d.timestamp_millis() as f64),
                ))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_add", Category::Date)
            .describe("Adds an amount of a unit to a date, optionally in a time zone")
            .params([KindSet::DATE, KindSet::NUMERIC, KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(3, 4))
            .returns(ValueKind::Date)
            .body(|_, args| {
                let tz = zone(args, 3)?;
                let (Some(d), Some(amount), Some(name)) =
                    (date(args, 0), whole(number(args, 1)), text(args, 2))
                else {
                    return Ok(Value::missing(ValueKind::Date));
                };
                Ok(Value::date(add(d, amount, unit(name)?, tz)?))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_set", Category::Date)
            .describe("Sets one unit of a date, optionally in a time zone")
            .params([KindSet::DATE, KindSet::NUMERIC, KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(3, 4))
            .returns(ValueKind::Date)
            .body(|_, args| {
                let tz = zone(args, 3)?;
                let (Some(d), Some(value), Some(name)) =
                    (date(args, 0), whole(number(args, 1)), text(args, 2))
                else {
                    return Ok(Value::missing(ValueKind::Date));
                };
                Ok(Value::date(set(d, value, unit(name)?, tz)?))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_get", Category::Date)
            .describe("Reads one unit of a date; months count from 1, weeks are ISO weeks")
            .params([KindSet::DATE, KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(2, 3))
            .returns(ValueKind::Integer)
            .body(|_, args| {
                let tz = zone(args, 2)?;
                let (Some(d), Some(name)) = (date(args, 0), text(args, 1)) else {
                    return Ok(Value::missing(ValueKind::Integer));
                };
                Ok(Value::integer(get(d, unit(name)?, tz) as f64))
            }),
    );
}

fn register_conversions(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("date_parse", Category::Conversion)
            .describe("Date from epoch milliseconds or from ISO-like text")
            .params([KindSet::NUMERIC | KindSet::STRING])
            .returns(ValueKind::Date)
            .body(|_, args| {
                let parsed = match &args[0] {
                    Value::String(text) => text.as_deref().and_then(parse_date),
                    other => whole(other.to_number()).and_then(DateTime::from_timestamp_millis),
                };
                Ok(Value::Date(parsed))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_parse_custom", Category::Conversion)
            .describe("Date from text using a strftime pattern")
            .params([KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::Date)
            .body(|_, args| match (text(args, 0), text(args, 1)) {
                (Some(input), Some(pattern)) => Ok(Value::Date(parse_custom(input, pattern)?)),
                _ => Ok(Value::missing(ValueKind::Date)),
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_str", Category::Conversion)
            .describe("Renders a date in a size (DATE_SHORT ...) and part (DATE_SHOW_DATE_ONLY ...)")
            .params([KindSet::DATE, KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::String)
            .body(|_, args| {
                let (Some(d), Some(size), Some(part)) = (date(args, 0), text(args, 1), text(args, 2))
                else {
                    return Ok(Value::missing(ValueKind::String));
                };
                let pattern = style_pattern(size, part, false)?;
                Ok(Value::string(render(&d, &pattern, None)?))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_str_loc", Category::Conversion)
            .describe("Renders a date in a size and part for a locale such as de_DE")
            .params([KindSet::DATE, KindSet::STRING, KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::String)
            .body(|_, args| {
                let (Some(d), Some(size), Some(part), Some(name)) =
                    (date(args, 0), text(args, 1), text(args, 2), text(args, 3))
                else {
                    return Ok(Value::missing(ValueKind::String));
                };
                let pattern = style_pattern(size, part, true)?;
                Ok(Value::string(render(&d, &pattern, Some(locale(name)?))?))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("date_str_custom", Category::Conversion)
            .describe("Renders a date with a strftime pattern, optionally for a locale")
            .params([KindSet::DATE, KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(2, 3))
            .returns(ValueKind::String)
            .body(|_, args| {
                let requested = text(args, 2).map(locale).transpose()?;
                let (Some(d), Some(pattern)) = (date(args, 0), text(args, 1)) else {
                    return Ok(Value::missing(ValueKind::String));
                };
                Ok(Value::string(render(&d, pattern, requested)?))
            }),
    );
}
