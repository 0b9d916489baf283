use std::future::Future;

use anyhow::Context;
use sqlx::MySqlPool;
use tracing::info;

use crate::config::{Config, SourceToggle};

/// Which optional tables this deployment uses. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub holidays: bool,
    pub leaves: bool,
    pub daily_cache: bool,
}

impl Capabilities {
    pub async fn probe(pool: &MySqlPool, config: &Config) -> anyhow::Result<Self> {
        let capabilities = Self {
            holidays: resolve(config.holidays_source, "holidays", || {
                table_exists(pool, "holidays")
            })
            .await?,
            leaves: resolve(config.leaves_source, "leaves", || table_exists(pool, "leaves")).await?,
            daily_cache: resolve(config.daily_cache, "employee_attendance_daily", || {
                table_exists(pool, "employee_attendance_daily")
            })
            .await?,
        };

        info!(
            holidays = capabilities.holidays,
            leaves = capabilities.leaves,
            daily_cache = capabilities.daily_cache,
            "Optional sources resolved"
        );
        Ok(capabilities)
    }
}

/// Table lookup in the connected schema.
pub async fn table_exists(pool: &MySqlPool, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM information_schema.tables
        WHERE table_schema = DATABASE() AND table_name = ?
        "#,
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Explicit settings win; only `auto` runs the probe.
async fn resolve<F, Fut>(toggle: SourceToggle, table: &str, probe: F) -> anyhow::Result<bool>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, sqlx::Error>>,
{
    match toggle {
        SourceToggle::Enabled => Ok(true),
        SourceToggle::Disabled => Ok(false),
        SourceToggle::Auto => {
            let found = probe()
                .await
                .with_context(|| format!("Failed to probe for table {table}"))?;
            if !found {
                info!(table, "Optional table not found, source disabled");
            }
            Ok(found)
        }
    }
}
