pub mod custom_logs;
pub mod daily_logs;
mod pool;
pub mod users;

pub use pool::create_pool;
