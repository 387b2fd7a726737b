//! Unit-tagged numeric values.
//!
//! A [`Quantity`] carries its unit as a type parameter. Every unit belongs to
//! exactly one [`Family`] (data size, data rate or time), and conversion is
//! only defined between units of the same family, so mixing a byte count with
//! a byte rate fails to compile instead of producing a wrong number.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A dimension that units can be measured in.
pub trait Family: Copy + fmt::Debug + Send + Sync + 'static {
    /// Human name of the dimension.
    const NAME: &'static str;
}

/// Amount of data. Base unit: bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSize;

/// Amount of data per unit of time. Base unit: bytes per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRate;

/// Elapsed or remaining time. Base unit: seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time;

impl Family for DataSize {
    const NAME: &'static str = "data size";
}

impl Family for DataRate {
    const NAME: &'static str = "data rate";
}

impl Family for Time {
    const NAME: &'static str = "time";
}

/// A unit of measurement within a [`Family`].
pub trait Unit: Copy + fmt::Debug + Send + Sync + 'static {
    type Family: Family;

    /// Symbol used when rendering a value in this unit.
    const SYMBOL: &'static str;

    /// Size of one of this unit, expressed in the family's base unit.
    const FACTOR: f64;
}

macro_rules! unit {
    ($(#[$meta:meta])* $name:ident, $family:ty, $symbol:literal, $factor:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl Unit for $name {
            type Family = $family;
            const SYMBOL: &'static str = $symbol;
            const FACTOR: f64 = $factor;
        }
    };
}

unit!(
    /// One bit, an eighth of a byte.
    Bits, DataSize, "b", 0.125
);
unit!(Bytes, DataSize, "B", 1.0);
unit!(BitsPerSecond, DataRate, "bps", 0.125);
unit!(BytesPerSecond, DataRate, "B/s", 1.0);
unit!(Milliseconds, Time, "ms", 0.001);
unit!(Seconds, Time, "s", 1.0);
unit!(Minutes, Time, "min", 60.0);

/// A magnitude tagged with its unit.
///
/// Tagging never changes the magnitude: `Quantity::<Bytes>::new(5.0)` holds
/// exactly `5.0`. Use [`Quantity::convert`] to move between units of the
/// same family.
#[derive(Clone, Copy)]
pub struct Quantity<U: Unit> {
    value: f64,
    unit: PhantomData<U>,
}

impl<U: Unit> Quantity<U> {
    /// Tag a raw magnitude with the unit `U`.
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            unit: PhantomData,
        }
    }

    /// The magnitude in the quantity's own unit.
    pub fn value(self) -> f64 {
        self.value
    }

    /// The magnitude expressed in the family's base unit.
    pub fn base_value(self) -> f64 {
        self.value * U::FACTOR
    }

    pub fn symbol(self) -> &'static str {
        U::SYMBOL
    }

    /// Convert to another unit of the same family.
    pub fn convert<V>(self) -> Quantity<V>
    where
        V: Unit<Family = U::Family>,
    {
        Quantity::new(self.base_value() / V::FACTOR)
    }

    /// Whether the magnitude is a usable number (not NaN or infinite).
    pub fn is_finite(self) -> bool {
        self.value.is_finite()
    }
}

impl<U: Unit> Default for Quantity<U> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<U: Unit> PartialEq for Quantity<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U: Unit> PartialOrd for Quantity<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<U: Unit> fmt::Debug for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({} {})", self.value, U::SYMBOL)
    }
}

impl<U: Unit> fmt::Display for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, U::SYMBOL)
    }
}

impl<U: Unit> Serialize for Quantity<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Quantity", 2)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("unit", U::SYMBOL)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagging_keeps_magnitude() {
        let size = Quantity::<Bytes>::new(937_912_872.0);
        assert_eq!(size.value(), 937_912_872.0);
        assert_eq!(size.symbol(), "B");
    }

    #[test]
    fn test_convert_within_family() {
        let size = Quantity::<Bytes>::new(2.0);
        assert_eq!(size.convert::<Bits>().value(), 16.0);

        let rate = Quantity::<BitsPerSecond>::new(8_000.0);
        assert_eq!(rate.convert::<BytesPerSecond>().value(), 1_000.0);

        let eta = Quantity::<Seconds>::new(150.0);
        assert_eq!(eta.convert::<Minutes>().value(), 2.5);
        assert_eq!(eta.convert::<Milliseconds>().value(), 150_000.0);
    }

    #[test]
    fn test_comparison() {
        assert!(Quantity::<Bytes>::new(1.0) < Quantity::<Bytes>::new(2.0));
        assert_eq!(Quantity::<Seconds>::new(3.0), Quantity::<Seconds>::new(3.0));
        assert_ne!(
            Quantity::<Seconds>::new(f64::NAN),
            Quantity::<Seconds>::new(f64::NAN)
        );
    }

    #[test]
    fn test_serialize_carries_unit() {
        let json = serde_json::to_value(Quantity::<BytesPerSecond>::new(3_432_125.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "value": 3_432_125.0, "unit": "B/s" }));
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::<Seconds>::new(252.0).to_string(), "252 s");
    }
}
