//! Per-variant Extended JSON encoders
//!
//! Each function turns one MongoDB-only value into its `$`-tagged object.
//! None of them can fail.

use base64::Engine;
use bson::oid::ObjectId;

use super::output::{JsonMap, JsonSafe};
use crate::value::{Binary, Instant, Regex, Scalar, Timestamp};

/// `{"$oid": "<24 lowercase hex chars>"}`
pub fn encode_object_id(oid: &ObjectId) -> JsonSafe {
    tagged("$oid", JsonSafe::from(hex::encode(oid.bytes())))
}

/// `{"$date": <milliseconds since epoch>}`
pub fn encode_datetime(instant: &Instant) -> JsonSafe {
    tagged("$date", JsonSafe::Scalar(Scalar::Int64(instant.timestamp_millis())))
}

/// `{"$type": "<hex subtype>", "$binary": "<base64>"}`
pub fn encode_binary(bin: &Binary) -> JsonSafe {
    encode_binary_parts(bin.subtype, &bin.bytes)
}

/// Binary encoding from a subtype and a borrowed payload
pub fn encode_binary_parts(subtype: u8, bytes: &[u8]) -> JsonSafe {
    let mut map = JsonMap::new();
    map.insert("$type".to_string(), JsonSafe::from(subtype_hex(subtype)));
    map.insert("$binary".to_string(), JsonSafe::from(bytes_to_base64(bytes)));
    JsonSafe::Object(map)
}

/// `{"$timestamp": {"t": <seconds>, "i": <ordinal>}}`
///
/// Both halves are reinterpreted as signed 32-bit integers.
pub fn encode_timestamp(ts: &Timestamp) -> JsonSafe {
    let mut inner = JsonMap::new();
    inner.insert("t".to_string(), JsonSafe::Scalar(Scalar::Int32(ts.seconds() as i32)));
    inner.insert("i".to_string(), JsonSafe::Scalar(Scalar::Int32(ts.ordinal() as i32)));
    tagged("$timestamp", JsonSafe::Object(inner))
}

/// `{"$regex": "<pattern>", "$options": "<options>"}`
pub fn encode_regex(regex: &Regex) -> JsonSafe {
    let mut map = JsonMap::new();
    map.insert("$regex".to_string(), JsonSafe::from(regex.pattern.clone()));
    map.insert("$options".to_string(), JsonSafe::from(regex.options.clone()));
    JsonSafe::Object(map)
}

/// `{"$undefined": true}`
pub fn encode_undefined() -> JsonSafe {
    tagged("$undefined", JsonSafe::Scalar(Scalar::Bool(true)))
}

/// Lowercase hex of a subtype byte, without prefix or zero padding
pub fn subtype_hex(subtype: u8) -> String {
    format!("{:x}", subtype)
}

/// Standard padded Base64
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn tagged(key: &str, value: JsonSafe) -> JsonSafe {
    let mut map = JsonMap::new();
    map.insert(key.to_string(), value);
    JsonSafe::Object(map)
}
