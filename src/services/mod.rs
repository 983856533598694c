pub mod custom_stats;
pub mod daily_log;
pub mod mailer;
pub mod notifications;
pub mod stats;
