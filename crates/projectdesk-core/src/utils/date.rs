//! `dd/MM/yyyy` input handling for date fields.

use chrono::{Datelike, NaiveDate};

/// Digits in a complete `ddMMyyyy` entry.
pub const MAX_DATE_DIGITS: usize = 8;

/// Length of a complete masked entry, `dd/MM/yyyy`.
pub const MAX_DATE_LEN: usize = 10;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;

/// Reduce arbitrary input to at most eight digits and re-insert the slashes.
///
/// `"01032024"` and `"01/03/2024"` both become `"01/03/2024"`; partial input
/// is masked as far as it goes (`"010"` becomes `"01/0"`).
pub fn mask_date_input(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_DATE_DIGITS)
        .collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}/{}", &digits[..2], &digits[2..]),
        _ => format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

/// Parse a complete `dd/MM/yyyy` entry.
///
/// Returns `None` for partial input, years outside 1900..=2200, and dates
/// that do not exist (`31/02/2024`).
pub fn parse_display_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != MAX_DATE_LEN || bytes[2] != b'/' || bytes[5] != b'/' {
        return None;
    }

    let all_digits = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2 && *i != 5)
        .all(|(_, b)| b.is_ascii_digit());
    if !all_digits {
        return None;
    }

    let day: u32 = trimmed[0..2].parse().ok()?;
    let month: u32 = trimmed[3..5].parse().ok()?;
    let year: i32 = trimmed[6..10].parse().ok()?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    // from_ymd_opt rejects day/month overflow instead of rolling over
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Render a date as `dd/MM/yyyy`.
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}
