use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use strum_macros::{Display, EnumString};

use crate::calendar::resolver::HalfDayRule;

/// Whether an optional table is used. `auto` probes the schema once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceToggle {
    Enabled,
    Disabled,
    Auto,
}

/// Whether `leaves` rows carry an `employee_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveScope {
    Employee,
    Organization,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_punch_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,

    pub holidays_source: SourceToggle,
    pub leaves_source: SourceToggle,
    pub daily_cache: SourceToggle,
    pub leave_scope: LeaveScope,
    pub half_day_rule: HalfDayRule,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,
            rate_punch_per_min: parsed("RATE_PUNCH_PER_MIN", 30)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parsed("LOG_LEVEL", tracing::Level::DEBUG)?,

            holidays_source: parsed("HOLIDAYS_SOURCE", SourceToggle::Auto)?,
            leaves_source: parsed("LEAVES_SOURCE", SourceToggle::Auto)?,
            daily_cache: parsed("DAILY_CACHE", SourceToggle::Auto)?,
            leave_scope: parsed("LEAVE_SCOPE", LeaveScope::Employee)?,
            half_day_rule: parsed("HALF_DAY_RULE", HalfDayRule::default())?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "mysql://localhost/test".to_string(),
            jwt_secret: "test-secret".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_protected_per_min: 1000,
            rate_punch_per_min: 30,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            holidays_source: SourceToggle::Enabled,
            leaves_source: SourceToggle::Enabled,
            daily_cache: SourceToggle::Enabled,
            leave_scope: LeaveScope::Employee,
            half_day_rule: HalfDayRule::LeaveDriven,
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key}={raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
