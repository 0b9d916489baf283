use std::sync::Arc;

use sqlx::MySqlPool;

use crate::calendar::assembler::CalendarAssembler;
use crate::calendar::ports::PunchLog;
use crate::calendar::resolver::DayStatusResolver;
use crate::calendar::sync::DailyCacheSynchronizer;
use crate::config::Config;
use crate::store::mysql::{MySqlDailyCache, MySqlHolidays, MySqlLeaves, MySqlPunches};
use crate::utils::db_utils::Capabilities;

/// Shared handler state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub calendar: Arc<CalendarAssembler>,
    pub punches: Arc<dyn PunchLog>,
}

impl AppState {
    /// Wires the MySQL adapters, leaving out the optional sources this
    /// deployment does not have.
    pub fn from_pool(pool: MySqlPool, config: &Config, capabilities: Capabilities) -> Self {
        let punches = Arc::new(MySqlPunches::new(pool.clone()));
        let resolver = DayStatusResolver::new(config.half_day_rule);

        let mut calendar = CalendarAssembler::new(punches.clone(), resolver);
        if capabilities.leaves {
            calendar = calendar.with_leaves(Arc::new(MySqlLeaves::new(
                pool.clone(),
                config.leave_scope,
            )));
        }
        if capabilities.holidays {
            calendar = calendar.with_holidays(Arc::new(MySqlHolidays::new(pool.clone())));
        }
        if capabilities.daily_cache {
            calendar = calendar.with_cache(DailyCacheSynchronizer::new(Arc::new(
                MySqlDailyCache::new(pool),
            )));
        }

        Self {
            calendar: Arc::new(calendar),
            punches,
        }
    }
}
