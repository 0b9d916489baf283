pub mod daily_row;
pub mod day_status;
pub mod holiday;
pub mod leave;
pub mod punch;
pub mod role;
