//! Raw rclone payloads and their typed counterparts.
//!
//! rclone's `core/stats` and `core/transferred` calls return plain JSON
//! numbers for every quantity. The `Raw*` structs mirror that wire shape with
//! everything optional; the typed structs attach a unit to every quantity and
//! replace absent optional fields with stable defaults.
//!
//! Normalization only tags values, it never rescales them. Required numeric
//! fields that are missing from the payload are not repaired: a missing
//! quantity becomes a NaN magnitude and a missing count becomes `None`. Use
//! [`decode_stats_strict`] when a payload must be complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::quantity::{Bytes, BytesPerSecond, Quantity, Seconds, Unit};

// =============================================================================
// Wire Types
// =============================================================================

/// One active transfer as sent by rclone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransferReport {
    pub bytes: Option<f64>,
    /// `null` while rclone cannot estimate the remaining time.
    pub eta: Option<f64>,
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub speed: Option<f64>,
    pub speed_avg: Option<f64>,
    pub size: Option<f64>,
}

/// Aggregate statistics as sent by rclone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatsReport {
    pub speed: Option<f64>,
    pub bytes: Option<f64>,
    pub errors: Option<u64>,
    pub fatal_error: Option<bool>,
    pub retry_error: Option<bool>,
    pub checks: Option<u64>,
    pub transfers: Option<u64>,
    pub deletes: Option<u64>,
    pub renames: Option<u64>,
    pub transfer_time: Option<f64>,
    pub elapsed_time: Option<f64>,
    pub last_error: Option<String>,
    pub transferring: Option<Vec<RawTransferReport>>,
    #[serde(default, deserialize_with = "names_or_empty")]
    pub checking: Vec<String>,
}

impl RawStatsReport {
    /// Names of required fields absent from the payload.
    ///
    /// Transfer entries are reported as `transferring[<index>].<field>`.
    pub fn missing_fields(&self) -> Vec<String> {
        let required = [
            ("speed", self.speed.is_none()),
            ("bytes", self.bytes.is_none()),
            ("errors", self.errors.is_none()),
            ("fatalError", self.fatal_error.is_none()),
            ("retryError", self.retry_error.is_none()),
            ("checks", self.checks.is_none()),
            ("transfers", self.transfers.is_none()),
            ("deletes", self.deletes.is_none()),
            ("renames", self.renames.is_none()),
            ("transferTime", self.transfer_time.is_none()),
            ("elapsedTime", self.elapsed_time.is_none()),
        ];

        let mut missing: Vec<String> = required
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| name.to_string())
            .collect();

        for (index, transfer) in self.transferring.iter().flatten().enumerate() {
            let required = [
                ("bytes", transfer.bytes.is_none()),
                ("name", transfer.name.is_none()),
                ("percentage", transfer.percentage.is_none()),
                ("speed", transfer.speed.is_none()),
                ("speedAvg", transfer.speed_avg.is_none()),
                ("size", transfer.size.is_none()),
            ];
            missing.extend(
                required
                    .iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| format!("transferring[{}].{}", index, name)),
            );
        }

        missing
    }
}

/// A finished transfer as sent by rclone `core/transferred`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCompletedTransfer {
    pub name: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub bytes: f64,
    #[serde(default)]
    pub checked: bool,
    pub started_at: String,
    pub completed_at: String,
    #[serde(default)]
    pub error: String,
    #[serde(rename = "jobid")]
    pub job_id: Option<u64>,
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCompletedTransferReport {
    #[serde(default)]
    pub transferred: Vec<RawCompletedTransfer>,
}

/// Accepts any JSON value; only an array yields names, and only its string
/// elements are kept. `null`, objects and scalars all become an empty list.
fn names_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let names = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(names)
}

// =============================================================================
// Typed Reports
// =============================================================================

/// One in-flight file transfer with unit-tagged quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    /// File path relative to the transfer root.
    pub name: String,
    /// Total size of the file.
    pub size: Quantity<Bytes>,
    /// Bytes transferred so far. Not guaranteed to be `<= size`.
    pub bytes: Quantity<Bytes>,
    /// Completion percentage, nominally 0 to 100.
    pub percentage: f64,
    /// Average speed over the whole transfer.
    pub speed: Quantity<BytesPerSecond>,
    /// Current speed as an exponentially weighted moving average.
    pub speed_avg: Quantity<BytesPerSecond>,
    /// Estimated time until completion, `None` when unknown.
    pub eta: Option<Quantity<Seconds>>,
}

/// Process-wide transfer statistics with unit-tagged quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    /// Average speed since the start of the process.
    pub speed: Quantity<BytesPerSecond>,
    /// Total bytes transferred since the start of the process.
    pub bytes: Quantity<Bytes>,
    pub errors: Option<u64>,
    /// At least one fatal error occurred. Sticky upstream.
    pub fatal_error: bool,
    /// At least one retryable error occurred. Sticky upstream.
    pub retry_error: bool,
    pub checks: Option<u64>,
    pub transfers: Option<u64>,
    pub deletes: Option<u64>,
    pub renames: Option<u64>,
    /// Total time spent on running jobs.
    pub transfer_time: Quantity<Seconds>,
    /// Time since the start of the process.
    pub elapsed_time: Quantity<Seconds>,
    /// Last error message, empty when none was reported.
    pub last_error: String,
    /// Active transfers in the order rclone reported them.
    pub transferring: Vec<TransferReport>,
    /// Names of files currently being checked.
    pub checking: Vec<String>,
}

/// A finished transfer with unit-tagged sizes and parsed timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTransfer {
    pub name: String,
    pub size: Quantity<Bytes>,
    pub bytes: Quantity<Bytes>,
    /// The file was only checked (skipped or deleted), not copied.
    pub checked: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Error description, empty on success.
    pub error: String,
    pub job_id: Option<u64>,
    /// Stats group the transfer belongs to.
    pub group: String,
}

impl CompletedTransfer {
    /// Wall-clock time between start and completion.
    pub fn duration(&self) -> Quantity<Seconds> {
        let millis = (self.completed_at - self.started_at).num_milliseconds();
        Quantity::new(millis as f64 / 1000.0)
    }

    pub fn failed(&self) -> bool {
        !self.error.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTransferReport {
    pub transferred: Vec<CompletedTransfer>,
}

// =============================================================================
// Normalization
// =============================================================================

fn tag<U: Unit>(raw: Option<f64>) -> Quantity<U> {
    Quantity::new(raw.unwrap_or(f64::NAN))
}

impl From<RawTransferReport> for TransferReport {
    fn from(raw: RawTransferReport) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            size: tag(raw.size),
            bytes: tag(raw.bytes),
            percentage: raw.percentage.unwrap_or(f64::NAN),
            speed: tag(raw.speed),
            speed_avg: tag(raw.speed_avg),
            eta: raw.eta.map(Quantity::new),
        }
    }
}

impl From<RawStatsReport> for StatsReport {
    fn from(raw: RawStatsReport) -> Self {
        Self {
            speed: tag(raw.speed),
            bytes: tag(raw.bytes),
            errors: raw.errors,
            fatal_error: raw.fatal_error.unwrap_or(false),
            retry_error: raw.retry_error.unwrap_or(false),
            checks: raw.checks,
            transfers: raw.transfers,
            deletes: raw.deletes,
            renames: raw.renames,
            transfer_time: tag(raw.transfer_time),
            elapsed_time: tag(raw.elapsed_time),
            last_error: raw.last_error.unwrap_or_default(),
            transferring: raw
                .transferring
                .unwrap_or_default()
                .into_iter()
                .map(TransferReport::from)
                .collect(),
            checking: raw.checking,
        }
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| Error::Timestamp {
            field,
            value: value.to_string(),
        })
}

impl TryFrom<RawCompletedTransfer> for CompletedTransfer {
    type Error = Error;

    fn try_from(raw: RawCompletedTransfer) -> Result<Self> {
        Ok(Self {
            started_at: parse_timestamp("started_at", &raw.started_at)?,
            completed_at: parse_timestamp("completed_at", &raw.completed_at)?,
            name: raw.name,
            size: Quantity::new(raw.size),
            bytes: Quantity::new(raw.bytes),
            checked: raw.checked,
            error: raw.error,
            job_id: raw.job_id,
            group: raw.group,
        })
    }
}

impl TryFrom<RawCompletedTransferReport> for CompletedTransferReport {
    type Error = Error;

    fn try_from(raw: RawCompletedTransferReport) -> Result<Self> {
        let transferred = raw
            .transferred
            .into_iter()
            .map(CompletedTransfer::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transferred })
    }
}

/// Normalize an already decoded `core/stats` payload.
pub fn normalize_stats(raw: RawStatsReport) -> StatsReport {
    StatsReport::from(raw)
}

/// Decode a `core/stats` message and normalize it.
///
/// Malformed JSON, or a value of the wrong JSON type in a known field, is an
/// [`Error::Decode`]. An already normalized report serialized back to JSON is
/// rejected the same way since its quantities are objects, not numbers.
pub fn decode_stats(json: &str) -> Result<StatsReport> {
    let raw: RawStatsReport = serde_json::from_str(json)?;
    tracing::trace!(
        transferring = raw.transferring.as_ref().map_or(0, Vec::len),
        checking = raw.checking.len(),
        "Decoded stats report"
    );
    Ok(normalize_stats(raw))
}

/// Like [`decode_stats`], but fails with [`Error::MissingField`] naming the
/// first absent required field instead of letting it through as NaN or
/// `None`.
pub fn decode_stats_strict(json: &str) -> Result<StatsReport> {
    let raw: RawStatsReport = serde_json::from_str(json)?;
    if let Some(field) = raw.missing_fields().into_iter().next() {
        return Err(Error::MissingField(field));
    }
    Ok(normalize_stats(raw))
}

/// Decode a `core/transferred` message.
pub fn decode_transferred(json: &str) -> Result<CompletedTransferReport> {
    let raw: RawCompletedTransferReport = serde_json::from_str(json)?;
    tracing::trace!(count = raw.transferred.len(), "Decoded transferred report");
    CompletedTransferReport::try_from(raw)
}
