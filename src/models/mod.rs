pub mod custom_log;
pub mod daily_log;
pub mod user;
