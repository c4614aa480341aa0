//! Coder Module
//!
//! Translates application values to and from the byte payloads stored by a
//! [`Cache`](crate::cache::Cache). The contract itself never looks inside a
//! payload; only the [`Cacher`](crate::cacher::Cacher) facade uses a coder.

use std::fmt::Debug;

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;

// == Coder Trait ==
/// Pluggable payload serializer.
pub trait Coder: Send + Sync + Debug {
    /// Short identifier, used in logs.
    fn name(&self) -> &str;

    /// Encodes a value into a payload.
    fn encode(&self, value: &Value) -> Result<Bytes>;

    /// Decodes a payload produced by [`Coder::encode`].
    fn decode(&self, payload: &[u8]) -> Result<Value>;
}

// == JSON Coder ==
/// Default coder: compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCoder;

impl Coder for JsonCoder {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn decode(&self, payload: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(payload)?)
    }
}
