//! # Campusboard Core Library
//!
//! This library provides the toast scheduling engine behind the Campusboard
//! events dashboard. Every so often it nudges the user about one upcoming
//! event, reacts to interest signals, and keeps a notification history. The
//! CLI and any GUI are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Scheduler**: A clock-driven state machine that requires the caller
//!   to periodically invoke `run_due()` (or use [`runtime::spawn_driver`])
//! - **Selection**: Eligibility filter plus a seedable two-level random draw
//! - **Toast slot**: Capacity-one container with a visible/exiting lifecycle
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ToastScheduler`]: Owns the slot, history, interests and timers
//! - [`Catalog`]: Read-only list of campus events
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod history;
pub mod interest;
pub mod runtime;
pub mod scheduler;
pub mod selection;
pub mod storage;
pub mod timer;
pub mod toast;

pub use catalog::{parse_event_date, CampusEvent, Catalog};
pub use eligibility::{eligible_pools, EligiblePools};
pub use error::{CatalogError, ConfigError, CoreError};
pub use events::{CoreEvent, RemovalReason, TickOutcome};
pub use history::{NotificationHistory, NotificationRecord};
pub use interest::InterestStore;
pub use scheduler::{DashboardSnapshot, Lifecycle, ToastScheduler};
pub use storage::Config;
pub use timer::{Clock, ManualClock, SystemClock};
pub use toast::{ToastItem, ToastPhase};
