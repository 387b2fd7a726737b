//! Application services for the dashboard.

pub mod monitor;
pub mod preferences;
pub mod rclone;

pub use monitor::{MonitorEvent, StatsMonitor};
pub use preferences::{Preferences, PreferencesStore};
pub use rclone::{RcloneClient, StatsSource};
