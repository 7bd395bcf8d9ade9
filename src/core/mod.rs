pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use time::{Clock, ManualClock, SystemClock, Timestamp};
