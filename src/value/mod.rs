//! Native value model
//!
//! This module defines the closed set of values the marshaller understands:
//! - JSON scalars (strings, booleans, integers of several widths, doubles)
//! - Containers (ordered arrays and string-keyed mappings)
//! - MongoDB-only types (ObjectId, binary, dates, timestamps, regex, undefined)
//! - An opaque variant for foreign values that are passed through untouched
//!
//! Values enter this model through the conversions in [`adapter`].

pub mod adapter;

use std::collections::BTreeMap;

use bson::Bson;
use bson::oid::ObjectId;

pub use adapter::normalize_mapping;

/// String-keyed mapping of native values.
///
/// Key order carries no meaning; a sorted map keeps output deterministic.
pub type Mapping = BTreeMap<String, Value>;

/// A value drawn from the native document model
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all (distinct from [`Value::Undefined`])
    Absent,

    /// Raw byte sequence, encoded as generic binary
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed mapping of values
    Map(Mapping),

    /// 12-byte object identifier
    ObjectId(ObjectId),

    /// Binary blob with a subtype tag
    Binary(Binary),

    /// UTC instant
    DateTime(Instant),

    /// Replication timestamp (seconds + ordinal)
    Timestamp(Timestamp),

    /// Regular expression
    Regex(Regex),

    /// Explicit undefined marker
    Undefined,

    /// JSON primitive
    Scalar(Scalar),

    /// Foreign value with no encoding rule
    Opaque(Opaque),
}

/// JSON primitive scalars, shared by the input and output models
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    UInt8(u8),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
}

/// Binary payload tagged with a BSON subtype byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Create a binary value
    pub fn new(subtype: u8, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype,
            bytes: bytes.into(),
        }
    }

    /// Create a generic (subtype 0) binary value
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(0, bytes)
    }
}

/// UTC instant as an integer offset from the Unix epoch
///
/// Drivers disagree on precision, so both variants are kept and normalized
/// to milliseconds at encoding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    /// Nanoseconds since the Unix epoch
    Nanos(i64),

    /// Milliseconds since the Unix epoch
    Millis(i64),
}

impl Instant {
    /// Milliseconds since the Unix epoch.
    ///
    /// Nanosecond values are divided by 1,000,000 with truncation toward zero.
    pub fn timestamp_millis(&self) -> i64 {
        match *self {
            Instant::Nanos(n) => n / 1_000_000,
            Instant::Millis(m) => m,
        }
    }
}

/// Replication timestamp packed into 64 bits
///
/// The high 32 bits hold seconds since the epoch, the low 32 bits an
/// ordinal within that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Pack seconds and ordinal into a timestamp
    pub fn from_parts(seconds: u32, ordinal: u32) -> Self {
        Self(((seconds as u64) << 32) | ordinal as u64)
    }

    /// Seconds part (high 32 bits)
    pub fn seconds(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Ordinal part (low 32 bits)
    pub fn ordinal(&self) -> u32 {
        self.0 as u32
    }

    /// The packed 64-bit representation
    pub fn packed(&self) -> u64 {
        self.0
    }
}

/// Regular expression pattern with its option flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub pattern: String,
    pub options: String,
}

impl Regex {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

/// A value the model has no rule for, kept verbatim for passthrough
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    type_name: String,
    value: Bson,
}

impl Opaque {
    /// Wrap a BSON value, naming it after its element type
    pub fn new(value: Bson) -> Self {
        let type_name = format!("{:?}", value.element_type());
        Self { type_name, value }
    }

    /// Wrap a value under an explicit type name
    ///
    /// Used for application types that reach the marshaller through a
    /// BSON representation but should be reported under their own name.
    pub fn named(type_name: impl Into<String>, value: Bson) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    /// Name of the foreign type, used in diagnostics
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The original value
    pub fn value(&self) -> &Bson {
        &self.value
    }

    /// Consume the wrapper and return the original value
    pub fn into_inner(self) -> Bson {
        self.value
    }
}

impl Value {
    /// Short name of the variant, used in trace logs
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::ObjectId(_) => "objectId",
            Value::Binary(_) => "binary",
            Value::DateTime(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Regex(_) => "regex",
            Value::Undefined => "undefined",
            Value::Scalar(_) => "scalar",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Check if the value is a container
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Decimal128;

    #[test]
    fn test_timestamp_parts() {
        let ts = Timestamp::from_parts(1_700_000_000, 7);
        assert_eq!(ts.seconds(), 1_700_000_000);
        assert_eq!(ts.ordinal(), 7);
        assert_eq!(ts.packed(), (1_700_000_000u64 << 32) | 7);
    }

    #[test]
    fn test_timestamp_high_bits() {
        let ts = Timestamp::from_parts(u32::MAX, u32::MAX);
        assert_eq!(ts.packed(), u64::MAX);
        assert_eq!(ts.seconds(), u32::MAX);
        assert_eq!(ts.ordinal(), u32::MAX);
    }

    #[test]
    fn test_instant_millis() {
        assert_eq!(Instant::Millis(1_701_862_788_373).timestamp_millis(), 1_701_862_788_373);
        assert_eq!(Instant::Nanos(1_701_862_788_373_999_999).timestamp_millis(), 1_701_862_788_373);
        assert_eq!(Instant::Nanos(999_999).timestamp_millis(), 0);
    }

    #[test]
    fn test_instant_negative_nanos_truncate() {
        assert_eq!(Instant::Nanos(-1_500_000).timestamp_millis(), -1);
    }

    #[test]
    fn test_opaque_type_name() {
        let opaque = Opaque::new(Bson::MaxKey);
        assert_eq!(opaque.type_name(), "MaxKey");

        let opaque = Opaque::new(Bson::Decimal128(Decimal128::from_bytes([0u8; 16])));
        assert_eq!(opaque.type_name(), "Decimal128");

        let opaque = Opaque::named("geo::Point", Bson::Int32(1));
        assert_eq!(opaque.type_name(), "geo::Point");
        assert_eq!(opaque.into_inner(), Bson::Int32(1));
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Absent.kind(), "absent");
        assert_eq!(Value::Undefined.kind(), "undefined");
        assert!(Value::Array(vec![]).is_container());
        assert!(Value::Map(Mapping::new()).is_container());
        assert!(!Value::Bytes(vec![]).is_container());
    }
}
