//! Typed rclone transfer statistics.
//!
//! Decodes the JSON reported by rclone's `core/stats` and `core/transferred`
//! remote-control calls into reports whose quantities carry their units, and
//! renders those quantities for humans.
//!
//! ```
//! use rclone_stats::{decode_stats, format_duration, format_memory, BaseUnit};
//!
//! let report = decode_stats(r#"{"speed": 1500000, "elapsedTime": 90061}"#).unwrap();
//! assert_eq!(format_memory(report.speed, BaseUnit::Bytes), "1.50 MB/s");
//! assert_eq!(format_duration(report.elapsed_time), "1d1h1m1s");
//! ```

pub mod error;
pub mod format;
pub mod quantity;
pub mod report;

pub use error::{Error, Result};
pub use format::{
    decompose_duration, format_duration, format_memory, normalize_memory, select_prefix,
    BaseUnit, DurationParts, Prefix, Scaled,
};
pub use quantity::{
    Bits, BitsPerSecond, Bytes, BytesPerSecond, DataRate, DataSize, Milliseconds, Minutes,
    Quantity, Seconds, Time, Unit,
};
pub use report::{
    decode_stats, decode_stats_strict, decode_transferred, normalize_stats, CompletedTransfer,
    CompletedTransferReport, RawCompletedTransfer, RawCompletedTransferReport, RawStatsReport,
    RawTransferReport, StatsReport, TransferReport,
};
