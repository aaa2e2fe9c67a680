use std::path::PathBuf;
use std::sync::Arc;

use campusboard_core::{Catalog, Config, ManualClock, ToastScheduler};
use chrono::NaiveDate;
use clap::Args;

const MAX_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Args)]
pub struct SimulateArgs {
    /// Catalog file (.json or .toml)
    pub path: PathBuf,
    /// Simulated duration in seconds, at most one week
    #[arg(
        long,
        default_value = "300",
        value_parser = clap::value_parser!(u64).range(..=MAX_SECONDS)
    )]
    pub seconds: u64,
    /// Clock resolution in milliseconds
    #[arg(long, default_value = "100")]
    pub step_ms: u64,
    /// RNG seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Simulated date (YYYY-MM-DD), defaults to today; the run starts at 09:00
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Event ids to mark as interested before the run starts
    #[arg(long = "interested")]
    pub interested: Vec<String>,
    /// Event ids to register before the run starts
    #[arg(long = "registered")]
    pub registered: Vec<String>,
    /// Print the final dashboard snapshot after the event stream
    #[arg(long)]
    pub snapshot: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(Catalog::load(&args.path)?);
    let mut config = Config::load_or_default();
    if args.seed.is_some() {
        config.selection.seed = args.seed;
    }

    let start = super::resolve_today(args.today)
        .and_hms_opt(9, 0, 0)
        .ok_or("invalid start time")?;
    let clock = ManualClock::new(start);
    let mut scheduler = ToastScheduler::with_clock(catalog, config, clock.clone())?;

    for id in &args.registered {
        scheduler.register(id);
    }
    scheduler.start();
    for id in &args.interested {
        scheduler.toggle_interested(id);
    }

    let step = args.step_ms.max(1);
    let mut elapsed = 0;
    loop {
        for event in scheduler.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
        if elapsed >= args.seconds.saturating_mul(1000) {
            break;
        }
        clock.advance_ms(i64::try_from(step)?);
        elapsed += step;
        scheduler.run_due();
    }

    scheduler.stop();
    tracing::info!(
        notifications = scheduler.history().len(),
        "simulation finished"
    );
    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&scheduler.snapshot())?);
    }
    Ok(())
}
