use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use spendbook_domain::{Category, CategoryFilter};

use crate::cli::core::CommandError;

/// Positional arguments plus `--flag value` / `--flag=value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    values: Vec<(&'static str, &'a str)>,
    switches: Vec<&'static str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`. `options` take a value; `switches` do not.
    pub fn parse(
        args: &[&'a str],
        options: &[&'static str],
        switches: &[&'static str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };
            if let Some(known) = switches.iter().copied().find(|known| *known == name) {
                if inline.is_some() {
                    return Err(invalid(format!("`--{name}` does not take a value.")));
                }
                parsed.switches.push(known);
                continue;
            }
            let Some(known) = options.iter().copied().find(|known| *known == name) else {
                return Err(invalid(format!("Unknown option `--{name}`.")));
            };
            let value = match inline {
                Some(value) => value,
                None => iter
                    .next()
                    .ok_or_else(|| invalid(format!("`--{name}` expects a value.")))?,
            };
            parsed.values.push((known, value));
        }
        Ok(parsed)
    }

    /// Last value given for `name`.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.values
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }
}

pub(crate) fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

/// Accepts `12.5`, `$12.50` and `1,234.00`.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| invalid(format!("`{input}` is not a valid amount.")))
}

pub(crate) fn parse_category(input: &str) -> Result<Category, CommandError> {
    Category::from_str(input).map_err(|err| invalid(err.to_string()))
}

pub(crate) fn parse_category_filter(input: &str) -> Result<CategoryFilter, CommandError> {
    CategoryFilter::from_str(input).map_err(|err| invalid(err.to_string()))
}

/// A full RFC 3339 timestamp, or `YYYY-MM-DD` taken as midnight UTC.
pub(crate) fn parse_date(input: &str) -> Result<DateTime<Utc>, CommandError> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| date_error(input))?;
    let midnight = day.and_hms_opt(0, 0, 0).ok_or_else(|| date_error(input))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Calendar day for range filters; timestamps keep their own calendar day.
pub(crate) fn parse_day(input: &str) -> Result<NaiveDate, CommandError> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| date_error(input))
}

fn date_error(input: &str) -> CommandError {
    invalid(format!(
        "`{input}` is not a valid date. Use YYYY-MM-DD or an RFC 3339 timestamp."
    ))
}
