use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::schedule::cache::DEFAULT_TTL;
use crate::schedule::service::{DEFAULT_SCAN_CONCURRENCY, DEFAULT_SOURCE_TIMEOUT};
use crate::utils::validation::validate_telegram_chat_id;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/users.db";
const DEFAULT_SOURCES_PATH: &str = "./schedule_sources.json";
const DEFAULT_BASE_DIR: &str = "./schedules";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    /// Chat that receives registration notices.
    pub admin_chat_id: Option<i64>,
    pub schedule_sources: PathBuf,
    pub schedule_base_dir: PathBuf,
    pub cache_ttl: Duration,
    pub utc_offset_hours: i32,
    pub fetch_timeout: Duration,
    pub scan_concurrency: usize,
    pub prefetch_cron: Option<String>,
}

/// Non-empty trimmed value of `name`, if set.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match var(name) {
        Some(raw) => raw.parse().map_err(|_| anyhow!("Invalid {}", name)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = var("TELEGRAM_BOT_TOKEN").ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let http_port: u16 = parse_var("HTTP_PORT", 3000)?;

        let admin_chat_id = match var("ADMIN_CHAT_ID") {
            Some(raw) => {
                let id: i64 = raw.parse().map_err(|_| anyhow!("Invalid ADMIN_CHAT_ID"))?;
                validate_telegram_chat_id(id).map_err(|e| anyhow!("Invalid ADMIN_CHAT_ID: {}", e))?;
                Some(id)
            }
            None => None,
        };

        let schedule_sources = var("SCHEDULE_SOURCES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCES_PATH));
        let schedule_base_dir = var("SCHEDULE_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));

        let cache_ttl_secs: u64 = parse_var("CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?;
        if cache_ttl_secs == 0 {
            return Err(anyhow!("Invalid CACHE_TTL_SECS"));
        }

        let utc_offset_hours: i32 = parse_var("UTC_OFFSET_HOURS", 5)?;
        if !(-12..=14).contains(&utc_offset_hours) {
            return Err(anyhow!("Invalid UTC_OFFSET_HOURS"));
        }

        let fetch_timeout_secs: u64 = parse_var("FETCH_TIMEOUT_SECS", DEFAULT_SOURCE_TIMEOUT.as_secs())?;
        if fetch_timeout_secs == 0 {
            return Err(anyhow!("Invalid FETCH_TIMEOUT_SECS"));
        }

        let scan_concurrency: usize = parse_var("SCAN_CONCURRENCY", DEFAULT_SCAN_CONCURRENCY)?;

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            admin_chat_id,
            schedule_sources,
            schedule_base_dir,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            utc_offset_hours,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            scan_concurrency: scan_concurrency.max(1),
            prefetch_cron: var("PREFETCH_CRON"),
        })
    }

    /// The university's local timezone.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or_else(|| anyhow!("Invalid UTC_OFFSET_HOURS"))
    }
}
