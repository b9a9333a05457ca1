//! Extended JSON marshalling
//!
//! [`Marshaller`] walks a native [`Value`] and produces a [`JsonSafe`] tree in
//! which every MongoDB-only type has been replaced by its `$`-tagged form:
//!
//! | input | output |
//! |---|---|
//! | absent | `null` |
//! | raw bytes | `{"$type": "0", "$binary": "<base64>"}` |
//! | ObjectId | `{"$oid": "<hex>"}` |
//! | date | `{"$date": <millis>}` |
//! | binary | `{"$type": "<hex>", "$binary": "<base64>"}` |
//! | timestamp | `{"$timestamp": {"t": <secs>, "i": <ordinal>}}` |
//! | regex | `{"$regex": "<pattern>", "$options": "<opts>"}` |
//! | undefined | `{"$undefined": true}` |
//!
//! Arrays and mappings are converted element by element; scalars pass
//! through unchanged. Values of an unknown type are reported to the
//! diagnostic sink and returned as they are.
//!
//! # Example
//!
//! ```rust
//! use bson::{doc, oid::ObjectId};
//! use mejson::marshal::Marshaller;
//!
//! let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
//! let doc = doc! { "id": [oid], "n": 3 };
//!
//! let json = Marshaller::new().marshal_document(&doc).unwrap().into_json();
//! assert_eq!(
//!     json,
//!     serde_json::json!({ "id": [{ "$oid": "507f1f77bcf86cd799439011" }], "n": 3 })
//! );
//! ```

pub mod encoders;
pub mod output;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bson::{Bson, Document};
use tracing::trace;

pub use output::{JsonMap, JsonSafe};

use crate::config::MarshalConfig;
use crate::diagnostics::{DiagnosticSink, Notice, SinkKind, StderrSink, TracingSink};
use crate::error::{MarshalError, Result};
use crate::value::{Mapping, Value, normalize_mapping};
use encoders::*;

/// Default maximum container nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Converts native values into Extended JSON
///
/// Holds no per-call state; one instance can be cloned freely and shared
/// across threads.
#[derive(Clone)]
pub struct Marshaller {
    /// Where soft-failure notices go
    sink: Arc<dyn DiagnosticSink>,

    /// Maximum container nesting, `None` for unbounded
    max_depth: Option<usize>,
}

impl Marshaller {
    /// Create a marshaller that logs notices through `tracing`
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Create a marshaller reporting to the given sink
    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Build a marshaller from configuration
    pub fn from_config(config: &MarshalConfig) -> Self {
        let sink: Arc<dyn DiagnosticSink> = match config.diagnostics {
            SinkKind::Tracing => Arc::new(TracingSink),
            SinkKind::Stderr => Arc::new(StderrSink),
        };
        Self::with_sink(sink).with_max_depth(config.max_depth)
    }

    /// Set the nesting limit; `None` or `Some(0)` removes it
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth.filter(|&d| d > 0);
        self
    }

    /// Current nesting limit
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Convert a value to its JSON-safe form
    ///
    /// # Returns
    /// * `Result<JsonSafe>` - Converted tree, or the first hard failure
    ///   raised anywhere inside it
    pub fn marshal(&self, value: &Value) -> Result<JsonSafe> {
        trace!(kind = value.kind(), "marshalling value");
        Ok(self.marshal_at(value, 0)?)
    }

    /// Convert a BSON document
    pub fn marshal_document(&self, doc: &Document) -> Result<JsonSafe> {
        self.marshal(&Value::from(doc))
    }

    /// Convert any BSON value
    pub fn marshal_bson(&self, value: &Bson) -> Result<JsonSafe> {
        self.marshal(&Value::from(value))
    }

    /// Normalize a mapping of any accepted representation, then convert it
    ///
    /// Unaccepted representations are reported and converted as an empty
    /// object.
    pub fn marshal_mapping_source<T: Any>(&self, source: &T) -> Result<JsonSafe> {
        let mapping = normalize_mapping(source, self.sink.as_ref());
        Ok(self.marshal_mapping(&mapping, 0)?)
    }

    fn marshal_at(&self, value: &Value, depth: usize) -> std::result::Result<JsonSafe, MarshalError> {
        match value {
            Value::Absent => Ok(JsonSafe::Null),
            Value::Bytes(bytes) => Ok(encode_binary_parts(0, bytes)),
            Value::Array(arr) => self.marshal_array(arr, depth),
            Value::Map(map) => self.marshal_mapping(map, depth),
            Value::ObjectId(oid) => Ok(encode_object_id(oid)),
            Value::DateTime(instant) => Ok(encode_datetime(instant)),
            Value::Binary(bin) => Ok(encode_binary(bin)),
            Value::Timestamp(ts) => Ok(encode_timestamp(ts)),
            Value::Regex(regex) => Ok(encode_regex(regex)),
            Value::Undefined => Ok(encode_undefined()),
            Value::Scalar(scalar) => Ok(JsonSafe::Scalar(scalar.clone())),
            Value::Opaque(opaque) => {
                trace!(kind = value.kind(), depth, "passing through {}", opaque.type_name());
                self.sink.notice(&Notice::UnknownType {
                    type_name: opaque.type_name().to_string(),
                });
                Ok(JsonSafe::Opaque(opaque.clone()))
            }
        }
    }

    fn marshal_array(
        &self,
        arr: &[Value],
        depth: usize,
    ) -> std::result::Result<JsonSafe, MarshalError> {
        self.enter(depth)?;
        let mut out = Vec::with_capacity(arr.len());
        for item in arr {
            out.push(self.marshal_at(item, depth + 1)?);
        }
        Ok(JsonSafe::Array(out))
    }

    fn marshal_mapping(
        &self,
        map: &Mapping,
        depth: usize,
    ) -> std::result::Result<JsonSafe, MarshalError> {
        self.enter(depth)?;
        let mut out = JsonMap::new();
        for (key, value) in map {
            out.insert(key.clone(), self.marshal_at(value, depth + 1)?);
        }
        Ok(JsonSafe::Object(out))
    }

    /// Check that a container at `depth` enclosing containers is allowed
    fn enter(&self, depth: usize) -> std::result::Result<(), MarshalError> {
        if let Some(limit) = self.max_depth
            && depth >= limit
        {
            trace!(depth, limit, "nesting limit reached");
            return Err(MarshalError::DepthExceeded { limit });
        }
        Ok(())
    }
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Marshaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marshaller")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Convert a value with a default [`Marshaller`]
pub fn marshal(value: &Value) -> Result<JsonSafe> {
    Marshaller::new().marshal(value)
}
