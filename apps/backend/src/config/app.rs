//! Process configuration loaded from environment variables.
//!
//! Everything the binary needs at startup is read once here; components get
//! their collaborators from `AppState` and never read the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL;
use crate::config::rules::TournamentRules;
use crate::domain::eligibility::{EntryRequirements, DEFAULT_ENTRY_COST, DEFAULT_MIN_LEVEL};
use crate::domain::schedule::EntryWindow;
use crate::error::AppError;

pub const DEFAULT_ENTRY_RACE_RETRIES: u32 = 3;

/// Which store of record the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(AppError::config(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub store_backend: StoreBackend,

    /// `None` selects the in-process leaderboard cache.
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,

    pub rules: TournamentRules,
    pub entry_race_retries: u32,
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("BACKEND_PORT", 3001u16)?;

        let store_backend = match optional_var("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Postgres,
        };

        let redis_url = optional_var("REDIS_URL");

        let ttl_secs = parse_var("LEADERBOARD_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs())?;
        if ttl_secs == 0 {
            return Err(AppError::config(
                "LEADERBOARD_CACHE_TTL_SECS must be at least 1",
            ));
        }

        let cost = parse_var("ENTRY_COST", DEFAULT_ENTRY_COST)?;
        if cost < 0 {
            return Err(AppError::config(format!(
                "ENTRY_COST must not be negative, got {cost}"
            )));
        }
        let min_level = parse_var("ENTRY_MIN_LEVEL", DEFAULT_MIN_LEVEL)?;
        if min_level < 1 {
            return Err(AppError::config(format!(
                "ENTRY_MIN_LEVEL must be at least 1, got {min_level}"
            )));
        }

        let window = match optional_var("ENTRY_CUTOFF_HOUR") {
            None => EntryWindow::default(),
            Some(raw) => raw
                .parse::<u8>()
                .ok()
                .and_then(EntryWindow::from_hour)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "ENTRY_CUTOFF_HOUR must be an hour between 1 and 24, got '{raw}'"
                    ))
                })?,
        };

        let entry_race_retries = parse_var("ENTRY_RACE_RETRIES", DEFAULT_ENTRY_RACE_RETRIES)?;

        Ok(Config {
            host,
            port,
            store_backend,
            redis_url,
            cache_ttl: Duration::from_secs(ttl_secs),
            rules: TournamentRules::new(EntryRequirements { cost, min_level }, window),
            entry_race_retries,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match optional_var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("{name} has an invalid value: '{raw}'"))
        }),
    }
}
