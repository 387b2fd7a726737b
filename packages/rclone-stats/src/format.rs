//! Human-scaled rendering of quantities.
//!
//! Sizes and rates use a decimal (1000-based) prefix ladder with an early
//! promotion margin: a tier is chosen once the value reaches 90% of the
//! tier's factor, so a value hovering around 999.6 KB renders as 1.00 MB
//! instead of flickering between the two. Durations are decomposed greedily
//! into days, hours, minutes and seconds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantity::{DataRate, DataSize, Family, Quantity, Seconds, Time, Unit};

/// Fraction of the next tier's factor at which that tier is selected.
///
/// Selecting the highest tier `t` with `magnitude >= 0.9 * 1000^t` is the
/// same as `floor(log1000(magnitude) + 1 - log1000(900))`, without the
/// rounding noise of the logarithms at the boundary.
pub const PROMOTION_THRESHOLD: f64 = 0.9;

/// Base unit family used for size and rate display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseUnit {
    #[default]
    Bytes,
    Bits,
}

impl BaseUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseUnit::Bytes => "bytes",
            BaseUnit::Bits => "bits",
        }
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Families that render on the prefix ladder.
pub trait Scalable: Family {
    fn symbol(base: BaseUnit) -> &'static str;
}

impl Scalable for DataSize {
    fn symbol(base: BaseUnit) -> &'static str {
        match base {
            BaseUnit::Bytes => "B",
            BaseUnit::Bits => "b",
        }
    }
}

impl Scalable for DataRate {
    fn symbol(base: BaseUnit) -> &'static str {
        match base {
            BaseUnit::Bytes => "B/s",
            BaseUnit::Bits => "bps",
        }
    }
}

/// A decimal SI prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prefix {
    None,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Zetta,
    Yotta,
}

impl Prefix {
    /// Every prefix, smallest first.
    pub const LADDER: [Prefix; 9] = [
        Prefix::None,
        Prefix::Kilo,
        Prefix::Mega,
        Prefix::Giga,
        Prefix::Tera,
        Prefix::Peta,
        Prefix::Exa,
        Prefix::Zetta,
        Prefix::Yotta,
    ];

    pub fn factor(self) -> f64 {
        match self {
            Prefix::None => 1.0,
            Prefix::Kilo => 1e3,
            Prefix::Mega => 1e6,
            Prefix::Giga => 1e9,
            Prefix::Tera => 1e12,
            Prefix::Peta => 1e15,
            Prefix::Exa => 1e18,
            Prefix::Zetta => 1e21,
            Prefix::Yotta => 1e24,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Kilo => "K",
            Prefix::Mega => "M",
            Prefix::Giga => "G",
            Prefix::Tera => "T",
            Prefix::Peta => "P",
            Prefix::Exa => "E",
            Prefix::Zetta => "Z",
            Prefix::Yotta => "Y",
        }
    }
}

/// Pick the display tier for a magnitude.
///
/// Zero, negative and NaN magnitudes stay unscaled; anything past the yotta
/// threshold stays at yotta.
pub fn select_prefix(magnitude: f64) -> Prefix {
    Prefix::LADDER
        .iter()
        .rev()
        .copied()
        .find(|prefix| magnitude >= prefix.factor() * PROMOTION_THRESHOLD)
        .unwrap_or(Prefix::None)
}

/// A magnitude rescaled onto the prefix ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled {
    pub value: f64,
    pub prefix: Prefix,
    pub symbol: &'static str,
}

impl fmt::Display for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}{}", self.value, self.prefix.symbol(), self.symbol)
    }
}

/// Rescale a data size or data rate for display in `base` units.
pub fn normalize_memory<U>(quantity: Quantity<U>, base: BaseUnit) -> Scaled
where
    U: Unit,
    U::Family: Scalable,
{
    let bytes = quantity.base_value();
    let magnitude = match base {
        BaseUnit::Bytes => bytes,
        BaseUnit::Bits => bytes * 8.0,
    };
    let prefix = select_prefix(magnitude);

    Scaled {
        value: magnitude / prefix.factor(),
        prefix,
        symbol: <U::Family as Scalable>::symbol(base),
    }
}

/// Render a data size or data rate, e.g. `"1.50 MB/s"`.
pub fn format_memory<U>(quantity: Quantity<U>, base: BaseUnit) -> String
where
    U: Unit,
    U::Family: Scalable,
{
    normalize_memory(quantity, base).to_string()
}

/// Whole days, hours, minutes and seconds of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

const DAY: f64 = 86_400.0;
const HOUR: f64 = 3_600.0;
const MINUTE: f64 = 60.0;

/// Split `seconds` by floor division, carrying the remainder down.
///
/// Fractional seconds are dropped. Non-finite input yields all zeros.
pub fn decompose_duration(seconds: f64) -> DurationParts {
    if !seconds.is_finite() {
        return DurationParts::default();
    }

    let mut remaining = seconds;
    let mut take = |factor: f64| {
        let count = (remaining / factor).floor();
        remaining -= count * factor;
        count as i64
    };

    DurationParts {
        days: take(DAY),
        hours: take(HOUR),
        minutes: take(MINUTE),
        seconds: take(1.0),
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.days, 'd'),
            (self.hours, 'h'),
            (self.minutes, 'm'),
            (self.seconds, 's'),
        ];
        for (count, suffix) in parts {
            if count != 0 {
                write!(f, "{}{}", count, suffix)?;
            }
        }
        Ok(())
    }
}

/// Render a duration as compact tokens, e.g. `"1d1h1m1s"`.
///
/// Zero-valued components are skipped, so zero renders as an empty string.
pub fn format_duration<U>(quantity: Quantity<U>) -> String
where
    U: Unit<Family = Time>,
{
    decompose_duration(quantity.convert::<Seconds>().value()).to_string()
}
