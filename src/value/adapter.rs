//! Boundary conversions into the native value model
//!
//! Upstream libraries expose the same logical values in several shapes:
//! `bson::Bson` and `bson::Document` from the driver, `serde_json` values from
//! JSON sources, `chrono` instants from application code. Everything is
//! classified here so the marshaller only ever sees [`Value`].

use std::any::{Any, type_name};
use std::collections::HashMap;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{Binary, Instant, Mapping, Opaque, Regex, Scalar, Timestamp, Value};
use crate::diagnostics::{DiagnosticSink, Notice};

/// Coerce any accepted mapping representation into a [`Mapping`]
///
/// Accepted shapes are `bson::Document`, [`Mapping`],
/// `HashMap<String, Value>` and `serde_json::Map<String, serde_json::Value>`.
/// Any other type is reported to `sink` and replaced by an empty mapping,
/// which drops whatever the source held.
pub fn normalize_mapping<T: Any>(source: &T, sink: &dyn DiagnosticSink) -> Mapping {
    let source = source as &dyn Any;

    if let Some(doc) = source.downcast_ref::<Document>() {
        return document_to_mapping(doc);
    }
    if let Some(map) = source.downcast_ref::<Mapping>() {
        return map.clone();
    }
    if let Some(map) = source.downcast_ref::<HashMap<String, Value>>() {
        return map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    }
    if let Some(map) = source.downcast_ref::<serde_json::Map<String, JsonValue>>() {
        return map
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect();
    }

    sink.notice(&Notice::UnexpectedMapping {
        type_name: type_name::<T>().to_string(),
    });
    Mapping::new()
}

/// Convert a BSON document into a mapping of native values
pub fn document_to_mapping(doc: &Document) -> Mapping {
    doc.iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect()
}

/* ========================= bson ========================= */

impl From<Bson> for Value {
    fn from(value: Bson) -> Self {
        match value {
            Bson::Null => Value::Absent,
            Bson::Undefined => Value::Undefined,
            Bson::String(s) => Value::Scalar(Scalar::String(s)),
            Bson::Boolean(b) => Value::Scalar(Scalar::Bool(b)),
            Bson::Int32(n) => Value::Scalar(Scalar::Int32(n)),
            Bson::Int64(n) => Value::Scalar(Scalar::Int64(n)),
            Bson::Double(f) => Value::Scalar(Scalar::Double(f)),
            Bson::ObjectId(oid) => Value::ObjectId(oid),
            Bson::DateTime(dt) => Value::DateTime(Instant::Millis(dt.timestamp_millis())),
            Bson::Binary(bin) => Value::Binary(Binary::new(u8::from(bin.subtype), bin.bytes)),
            Bson::Timestamp(ts) => Value::Timestamp(Timestamp::from_parts(ts.time, ts.increment)),
            Bson::RegularExpression(regex) => Value::Regex(Regex::new(regex.pattern, regex.options)),
            Bson::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            Bson::Document(doc) => Value::Map(
                doc.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
            other => Value::Opaque(Opaque::new(other)),
        }
    }
}

impl From<&Bson> for Value {
    fn from(value: &Bson) -> Self {
        Value::from(value.clone())
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::from(Bson::Document(doc))
    }
}

impl From<&Document> for Value {
    fn from(doc: &Document) -> Self {
        Value::Map(document_to_mapping(doc))
    }
}

/* ========================= serde_json ========================= */

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Absent,
            JsonValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::UInt64(u))
                } else {
                    Value::Scalar(Scalar::Double(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::String(s) => Value::Scalar(Scalar::String(s)),
            JsonValue::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/* ========================= chrono ========================= */

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        let instant = match dt.timestamp_nanos_opt() {
            Some(nanos) => Instant::Nanos(nanos),
            None => Instant::Millis(dt.timestamp_millis()),
        };
        Value::DateTime(instant)
    }
}

/* ========================= leaf types ========================= */

impl From<ObjectId> for Value {
    fn from(oid: ObjectId) -> Self {
        Value::ObjectId(oid)
    }
}

impl From<Binary> for Value {
    fn from(bin: Binary) -> Self {
        Value::Binary(bin)
    }
}

impl From<Instant> for Value {
    fn from(instant: Instant) -> Self {
        Value::DateTime(instant)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Regex> for Value {
    fn from(regex: Regex) -> Self {
        Value::Regex(regex)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(v.into()))
                }
            }
        )*
    };
}

scalar_from! {
    String => String,
    &str => String,
    bool => Bool,
    u8 => UInt8,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Double,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Absent)
    }
}
