//! `slots` CLI — check appointment times and list bookable slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Is this time bookable for the expert?
//! slots validate --at 2025-01-07T09:30 --schedule expert.json
//!
//! # List a week of slots (schedule from stdin)
//! cat expert.json | slots list --schedule -
//!
//! # Slots grouped by day, as JSON, from a fixed date
//! slots list --schedule expert.json --from 2025-01-13 --days 5 --by-day --json
//!
//! # Earliest bookable slot
//! slots next --schedule expert.json
//!
//! # Long-form display string
//! slots --locale en format 2025-01-07T09:30
//!
//! # Pin the clock and load a policy file
//! slots --now 2025-01-06T10:00 --policy policy.json list
//! ```
//!
//! Exit status is 0 on success, 2 when the time is rejected or no slot is
//! found, and 1 on errors.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use slot_engine::{
    group_by_day, parse_datetime, BookingPolicy, Clock, ExpertSchedule, FixedClock, Locale,
    Slot, SlotEngine, SystemClock, DEFAULT_SEARCH_DAYS,
};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Engine = SlotEngine<Box<dyn Clock>>;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment slot validation and listing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Booking policy JSON file (lead time, horizon, interval, timezone, locale)
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Message and display language: vi or en (overrides the policy)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// IANA timezone for working hours (overrides the policy)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Evaluate as if the current time were this datetime
    #[arg(long, global = true)]
    now: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a single appointment time is bookable
    Validate {
        /// Appointment time (RFC 3339, or local YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: String,
        /// Expert schedule JSON file ("-" for stdin); only time rules apply if omitted
        #[arg(short, long)]
        schedule: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every bookable slot in a window of days
    List {
        /// Expert schedule JSON file ("-" for stdin); policy defaults if omitted
        #[arg(short, long)]
        schedule: Option<String>,
        /// First day to search (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,
        /// Number of days to search
        #[arg(long, default_value_t = DEFAULT_SEARCH_DAYS)]
        days: u32,
        /// Group slots under their calendar day
        #[arg(long)]
        by_day: bool,
        /// Print slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the earliest bookable slot
    Next {
        /// Expert schedule JSON file ("-" for stdin); policy defaults if omitted
        #[arg(short, long)]
        schedule: Option<String>,
        /// First day to search (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,
        /// Number of days to search
        #[arg(long, default_value_t = DEFAULT_SEARCH_DAYS)]
        days: u32,
        /// Print the slot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Format a datetime as a long-form display string
    Format {
        /// Datetime to format; unparseable input prints "Invalid Date"
        datetime: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let policy = load_policy(cli.policy.as_deref(), cli.locale.as_deref(), cli.tz.as_deref())?;
    let clock: Box<dyn Clock> = match cli.now.as_deref() {
        Some(raw) => {
            let now = parse_datetime(raw, policy.timezone)
                .with_context(|| format!("Invalid --now value: {}", raw))?;
            debug!(%now, "clock pinned");
            Box::new(FixedClock::new(now))
        }
        None => Box::new(SystemClock),
    };
    let engine: Engine = SlotEngine::with_clock(clock, policy);

    match cli.command {
        Commands::Validate { at, schedule, json } => {
            let schedule = match schedule.as_deref() {
                Some(path) => Some(load_schedule(path, engine.policy())?),
                None => None,
            };
            let at = parse_datetime(&at, engine.policy().timezone)
                .with_context(|| format!("Invalid --at value: {}", at))?;
            let result = engine.validate(at, schedule.as_ref());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.is_valid {
                println!("valid: {} ({})", result.message, engine.format(at));
            } else {
                let rule = result.rule().map(|r| r.name()).unwrap_or_default();
                println!("invalid [{}]: {}", rule, result.message);
            }
            Ok(exit_status(result.is_valid))
        }
        Commands::List {
            schedule,
            from,
            days,
            by_day,
            json,
        } => {
            let schedule = schedule_or_default(schedule.as_deref(), engine.policy())?;
            let from = parse_date(from.as_deref())?;
            let slots = engine.enumerate_slots(&schedule, from, days);

            if by_day {
                let grouped = group_by_day(&slots, engine.policy().timezone);
                if json {
                    println!("{}", serde_json::to_string_pretty(&grouped)?);
                } else {
                    for day in &grouped {
                        println!("{}", day.date);
                        for slot in &day.slots {
                            println!("  {}", slot_line(slot));
                        }
                    }
                }
            } else if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}", slot_line(slot));
                }
            }
            Ok(exit_status(!slots.is_empty()))
        }
        Commands::Next {
            schedule,
            from,
            days,
            json,
        } => {
            let schedule = schedule_or_default(schedule.as_deref(), engine.policy())?;
            let from = parse_date(from.as_deref())?;
            let slot = engine.first_available(&schedule, from, days);

            match (&slot, json) {
                (Some(slot), true) => println!("{}", serde_json::to_string_pretty(slot)?),
                (Some(slot), false) => println!("{}", slot_line(slot)),
                (None, true) => println!("null"),
                (None, false) => println!("No available slots in the next {} days", days),
            }
            Ok(exit_status(slot.is_some()))
        }
        Commands::Format { datetime } => {
            println!("{}", engine.format_str(&datetime));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn exit_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn slot_line(slot: &Slot) -> String {
    format!("{}  {}", slot.time.to_rfc3339(), slot.display)
}

/// Build the policy from an optional file, then apply --locale and --tz.
fn load_policy(path: Option<&str>, locale: Option<&str>, tz: Option<&str>) -> Result<BookingPolicy> {
    let mut policy = match path {
        Some(path) => {
            let json = read_input(Some(path))?;
            BookingPolicy::from_json(&json)
                .with_context(|| format!("Failed to load policy: {}", path))?
        }
        None => BookingPolicy::default(),
    };

    if let Some(raw) = locale {
        let locale: Locale = raw.parse()?;
        policy = policy.with_locale(locale);
    }
    if let Some(name) = tz {
        policy = policy.with_timezone_name(name)?;
    }

    debug!(timezone = %policy.timezone, locale = %policy.locale, "policy loaded");
    Ok(policy)
}

fn load_schedule(path: &str, policy: &BookingPolicy) -> Result<ExpertSchedule> {
    let source = if path == "-" { None } else { Some(path) };
    let json = read_input(source)?;
    ExpertSchedule::from_json(&json, &policy.schedule_defaults)
        .with_context(|| format!("Failed to load schedule: {}", path))
}

fn schedule_or_default(path: Option<&str>, policy: &BookingPolicy) -> Result<ExpertSchedule> {
    match path {
        Some(path) => load_schedule(path, policy),
        None => Ok(ExpertSchedule::from_defaults(&policy.schedule_defaults)),
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid --from date (expected YYYY-MM-DD): {}", s))
    })
    .transpose()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
