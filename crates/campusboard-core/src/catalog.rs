//! Read-only event catalog.
//!
//! The catalog is owned by the surrounding application and shared with the
//! scheduler behind an `Arc`. Dates are stored exactly as they appear in the
//! source data (`DD Mon YYYY`) and parsed on demand with [`parse_event_date`],
//! which never fails: anything it cannot read is treated as `today`.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CoreError};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A single campus event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusEvent {
    pub id: String,
    pub title: String,
    /// `DD Mon YYYY`, e.g. `17 Oct 2026`.
    pub date: String,
    /// Flavor-text variants used as nudge messages.
    #[serde(default)]
    pub jokes: Vec<String>,
}

impl CampusEvent {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            jokes: Vec::new(),
        }
    }

    pub fn with_jokes<I, S>(mut self, jokes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jokes = jokes.into_iter().map(Into::into).collect();
        self
    }

    /// Event date, or `today` when the stored string is malformed.
    pub fn date_or(&self, today: NaiveDate) -> NaiveDate {
        parse_event_date(&self.date, today)
    }

    /// True when the event happens today or later.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date_or(today) >= today
    }
}

/// Parse a `DD Mon YYYY` date, falling back to `fallback` on any malformed input.
pub fn parse_event_date(raw: &str, fallback: NaiveDate) -> NaiveDate {
    try_parse_event_date(raw).unwrap_or(fallback)
}

/// Strict variant of [`parse_event_date`].
pub fn try_parse_event_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split_whitespace();
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "event")]
    events: Vec<CampusEvent>,
}

/// Ordered, immutable list of events.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    events: Vec<CampusEvent>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(events: Vec<CampusEvent>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.id.as_str()) {
                return Err(CatalogError::DuplicateId(event.id.clone()));
            }
        }
        Ok(Self { events })
    }

    /// Parse a JSON array of events.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let events: Vec<CampusEvent> = serde_json::from_str(content)
            .map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Self::new(events)
    }

    /// Parse a TOML document made of `[[event]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog =
            toml::from_str(content).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Self::new(parsed.events)
    }

    /// Load a catalog file; the format is picked from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// cannot be parsed, or contains duplicate ids.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf()).into()),
        };
        tracing::debug!(path = %path.display(), events = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&CampusEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn events(&self) -> &[CampusEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CampusEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
