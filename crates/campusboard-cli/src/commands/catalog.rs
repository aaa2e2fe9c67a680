use std::path::PathBuf;

use campusboard_core::catalog::try_parse_event_date;
use campusboard_core::{eligible_pools, Catalog, InterestStore};
use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Show parsed dates and eligibility for every event
    Check {
        /// Catalog file (.json or .toml)
        path: PathBuf,
        /// Date to evaluate against (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct EventReport<'a> {
    id: &'a str,
    title: &'a str,
    raw_date: &'a str,
    /// `None` when the date string is malformed and falls back to today.
    parsed_date: Option<NaiveDate>,
    eligible: bool,
    jokes: usize,
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::Check { path, today } => {
            let catalog = Catalog::load(&path)?;
            let today = super::resolve_today(today);
            let pools = eligible_pools(&catalog, &InterestStore::new(), today);

            let report: Vec<EventReport> = catalog
                .iter()
                .map(|e| EventReport {
                    id: &e.id,
                    title: &e.title,
                    raw_date: &e.date,
                    parsed_date: try_parse_event_date(&e.date),
                    eligible: pools.all.iter().any(|p| p.id == e.id),
                    jokes: e.jokes.len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);

            let malformed = report.iter().filter(|r| r.parsed_date.is_none()).count();
            if malformed > 0 {
                eprintln!("{malformed} event(s) have malformed dates and are treated as today");
            }
        }
    }
    Ok(())
}
