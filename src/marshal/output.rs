//! JSON-safe output tree
//!
//! [`JsonSafe`] holds only what a JSON encoder can write: null, scalars,
//! arrays and string-keyed objects. The one exception is
//! [`JsonSafe::Opaque`], the passthrough for values the marshaller did not
//! recognize; it serializes through the driver's relaxed Extended JSON form.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::value::{Opaque, Scalar, Value};

/// Object of JSON-safe values
pub type JsonMap = BTreeMap<String, JsonSafe>;

/// A value made only of JSON-representable parts
#[derive(Debug, Clone, PartialEq)]
pub enum JsonSafe {
    Null,
    Scalar(Scalar),
    Array(Vec<JsonSafe>),
    Object(JsonMap),
    /// Unrecognized input, returned as it came in
    Opaque(Opaque),
}

impl JsonSafe {
    /// Look up a key if this is an object
    pub fn get(&self, key: &str) -> Option<&JsonSafe> {
        match self {
            JsonSafe::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonSafe::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonSafe]> {
        match self {
            JsonSafe::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonSafe::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonSafe::Null)
    }

    /// Convert into a `serde_json::Value`
    ///
    /// Non-finite doubles have no JSON form and become `null`.
    pub fn into_json(self) -> JsonValue {
        match self {
            JsonSafe::Null => JsonValue::Null,
            JsonSafe::Scalar(scalar) => scalar_to_json(scalar),
            JsonSafe::Array(arr) => JsonValue::Array(arr.into_iter().map(Self::into_json).collect()),
            JsonSafe::Object(map) => {
                let mut obj = serde_json::Map::new();
                for (key, value) in map {
                    obj.insert(key, value.into_json());
                }
                JsonValue::Object(obj)
            }
            JsonSafe::Opaque(opaque) => opaque.into_inner().into_relaxed_extjson(),
        }
    }
}

fn scalar_to_json(scalar: Scalar) -> JsonValue {
    match scalar {
        Scalar::String(s) => JsonValue::String(s),
        Scalar::Bool(b) => JsonValue::Bool(b),
        Scalar::UInt8(n) => JsonValue::Number(n.into()),
        Scalar::Int32(n) => JsonValue::Number(n.into()),
        Scalar::UInt32(n) => JsonValue::Number(n.into()),
        Scalar::Int64(n) => JsonValue::Number(n.into()),
        Scalar::UInt64(n) => JsonValue::Number(n.into()),
        Scalar::Double(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::UInt8(n) => serializer.serialize_u8(*n),
            Scalar::Int32(n) => serializer.serialize_i32(*n),
            Scalar::UInt32(n) => serializer.serialize_u32(*n),
            Scalar::Int64(n) => serializer.serialize_i64(*n),
            Scalar::UInt64(n) => serializer.serialize_u64(*n),
            Scalar::Double(f) => serializer.serialize_f64(*f),
        }
    }
}

impl Serialize for JsonSafe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonSafe::Null => serializer.serialize_unit(),
            JsonSafe::Scalar(scalar) => scalar.serialize(serializer),
            JsonSafe::Array(arr) => arr.serialize(serializer),
            JsonSafe::Object(map) => map.serialize(serializer),
            JsonSafe::Opaque(opaque) => opaque
                .value()
                .clone()
                .into_relaxed_extjson()
                .serialize(serializer),
        }
    }
}

impl From<String> for JsonSafe {
    fn from(s: String) -> Self {
        JsonSafe::Scalar(Scalar::String(s))
    }
}

impl From<&str> for JsonSafe {
    fn from(s: &str) -> Self {
        JsonSafe::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<Scalar> for JsonSafe {
    fn from(scalar: Scalar) -> Self {
        JsonSafe::Scalar(scalar)
    }
}

/// Feed converted output back in as input
impl From<JsonSafe> for Value {
    fn from(value: JsonSafe) -> Self {
        match value {
            JsonSafe::Null => Value::Absent,
            JsonSafe::Scalar(scalar) => Value::Scalar(scalar),
            JsonSafe::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            JsonSafe::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
            JsonSafe::Opaque(opaque) => Value::Opaque(opaque),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, Decimal128};

    #[test]
    fn test_into_json_scalars() {
        assert_eq!(JsonSafe::Null.into_json(), JsonValue::Null);
        assert_eq!(JsonSafe::from("x").into_json(), serde_json::json!("x"));
        assert_eq!(
            JsonSafe::Scalar(Scalar::UInt8(255)).into_json(),
            serde_json::json!(255)
        );
        assert_eq!(
            JsonSafe::Scalar(Scalar::UInt32(u32::MAX)).into_json(),
            serde_json::json!(u32::MAX)
        );
        assert_eq!(
            JsonSafe::Scalar(Scalar::Double(f64::NAN)).into_json(),
            JsonValue::Null
        );
    }

    #[test]
    fn test_serialize_matches_into_json() {
        let mut map = JsonMap::new();
        map.insert("a".to_string(), JsonSafe::Scalar(Scalar::Int64(1)));
        map.insert(
            "b".to_string(),
            JsonSafe::Array(vec![JsonSafe::Null, JsonSafe::Scalar(Scalar::Bool(false))]),
        );
        let value = JsonSafe::Object(map);

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"a":1,"b":[null,false]}"#);
        assert_eq!(serde_json::to_value(&value).unwrap(), value.into_json());
    }

    #[test]
    fn test_opaque_serializes_as_relaxed_extjson() {
        let decimal = Bson::Decimal128(Decimal128::from_bytes([0u8; 16]));
        let value = JsonSafe::Opaque(Opaque::new(decimal.clone()));
        let expected = decimal.into_relaxed_extjson();

        assert_eq!(serde_json::to_value(&value).unwrap(), expected);
        assert_eq!(value.into_json(), expected);
    }

    #[test]
    fn test_accessors() {
        let mut map = JsonMap::new();
        map.insert("$oid".to_string(), JsonSafe::from("abc"));
        let value = JsonSafe::Object(map);

        assert_eq!(value.get("$oid").and_then(JsonSafe::as_str), Some("abc"));
        assert!(value.get("missing").is_none());
        assert!(value.as_array().is_none());
        assert!(JsonSafe::Null.is_null());
    }

    #[test]
    fn test_back_into_value() {
        let out = JsonSafe::Array(vec![JsonSafe::Null, JsonSafe::from("s")]);
        assert_eq!(
            Value::from(out),
            Value::Array(vec![Value::Absent, Value::from("s")])
        );
    }
}
