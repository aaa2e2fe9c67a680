pub mod catalog;
pub mod config;
pub mod simulate;

use chrono::{Local, NaiveDate};

/// `--today` override, defaulting to the local date.
pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}
