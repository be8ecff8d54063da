// Program-year helpers
use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::FIRST_DASHBOARD_YEAR;

/// Months in program-year order: Toastmasters years run July through June.
pub const PROGRAM_YEAR_MONTHS: [&str; 12] =
    ["7", "8", "9", "10", "11", "12", "1", "2", "3", "4", "5", "6"];

static PROGRAM_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").unwrap());

/// Returns the current program year, like "2022-2023".
pub fn current_program_year() -> String {
    let today = Local::now().date_naive();
    let (year, month) = (today.year(), today.month());
    if month >= 7 {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

/// A program year is valid if it is two consecutive years in "YYYY-YYYY"
/// form, no earlier than the first year the dashboard covers and no later
/// than the current one.
pub fn is_valid_program_year(prog_year: &str) -> bool {
    let Some(caps) = PROGRAM_YEAR_RE.captures(prog_year) else {
        return false;
    };
    if prog_year < FIRST_DASHBOARD_YEAR || prog_year > current_program_year().as_str() {
        return false;
    }
    let first: u32 = caps[1].parse().unwrap_or(0);
    let second: u32 = caps[2].parse().unwrap_or(0);
    second == first + 1
}
