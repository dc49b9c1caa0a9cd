use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// `YYYY-MM-DD`, optionally followed by `+ N` or `- N` days
static DATE_OFFSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\s*(?:([+-])\s*(\d+))?$").unwrap());

/// Evaluate simple date arithmetic in a `@start`/`@due` value
///
/// `2018-12-30 + 1` becomes `2018-12-31`. Values Things understands on its
/// own (`today`, `next month`, ...) and anything that is not a valid ISO date
/// are returned trimmed but otherwise untouched.
pub fn compute_date(value: &str) -> String {
    let value = value.trim();
    let Some(caps) = DATE_OFFSET_REGEX.captures(value) else {
        return value.to_string();
    };
    let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") else {
        return value.to_string();
    };

    let days = match caps.get(3) {
        Some(m) => match m.as_str().parse::<i64>() {
            Ok(days) => days,
            Err(_) => return value.to_string(),
        },
        None => 0,
    };
    let days = if caps.get(2).map(|m| m.as_str()) == Some("-") {
        -days
    } else {
        days
    };

    Duration::try_days(days)
        .and_then(|offset| date.checked_add_signed(offset))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}
