// crates/kvstore-core/src/codec.rs
// ============================================================================
// Module: Value Codecs
// Description: Pluggable value <-> byte encodings for store payloads.
// Purpose: Keep value serialization out of backend implementations.
// Dependencies: bincode, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Codec`] turns caller values into the opaque byte payload a backend
//! persists, and back. Backends never inspect the payload. Two codecs ship
//! with the crate: [`JsonCodec`] (the default) and the compact binary
//! [`BincodeCodec`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Codec errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encoding or decoding failed.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),
    /// Bincode encoding or decoding failed.
    #[error("bincode codec error: {0}")]
    Bincode(#[from] bincode::Error),
    /// Error reported by a caller-supplied codec.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync + 'static>),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Value encoding capability injected into stores.
///
/// Implementations must be deterministic: encoding the same value twice
/// yields the same bytes.
pub trait Codec: Send + Sync {
    /// Encodes a value into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the value cannot be encoded.
    fn marshal<V>(&self, value: &V) -> Result<Vec<u8>, CodecError>
    where
        V: Serialize + ?Sized;

    /// Decodes bytes into a value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the bytes do not decode into `V`.
    fn unmarshal<V>(&self, data: &[u8]) -> Result<V, CodecError>
    where
        V: DeserializeOwned;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn marshal<V>(&self, value: &V) -> Result<Vec<u8>, CodecError>
    where
        V: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal<V>(&self, data: &[u8]) -> Result<V, CodecError>
    where
        V: DeserializeOwned,
    {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Binary codec backed by `bincode`.
///
/// Payloads are not self-describing; decode with the type that was encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn marshal<V>(&self, value: &V) -> Result<Vec<u8>, CodecError>
    where
        V: Serialize + ?Sized,
    {
        Ok(bincode::serialize(value)?)
    }

    fn unmarshal<V>(&self, data: &[u8]) -> Result<V, CodecError>
    where
        V: DeserializeOwned,
    {
        Ok(bincode::deserialize(data)?)
    }
}

impl<C> Codec for &C
where
    C: Codec,
{
    fn marshal<V>(&self, value: &V) -> Result<Vec<u8>, CodecError>
    where
        V: Serialize + ?Sized,
    {
        (**self).marshal(value)
    }

    fn unmarshal<V>(&self, data: &[u8]) -> Result<V, CodecError>
    where
        V: DeserializeOwned,
    {
        (**self).unmarshal(data)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

    use std::collections::BTreeMap;

    use serde::Deserialize;
    use serde::Serialize;

    use super::BincodeCodec;
    use super::Codec;
    use super::CodecError;
    use super::JsonCodec;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        tags: Vec<String>,
    }

    fn sample() -> Profile {
        Profile {
            name: "Ann".to_string(),
            tags: vec!["admin".to_string()],
        }
    }

    #[test]
    fn json_codec_emits_plain_json() {
        let bytes = JsonCodec.marshal(&sample()).expect("marshal");
        assert_eq!(bytes, br#"{"name":"Ann","tags":["admin"]}"#.to_vec());
    }

    #[test]
    fn json_codec_decodes_map_payload() {
        let decoded: BTreeMap<String, String> =
            JsonCodec.unmarshal(br#"{"name":"Ann"}"#).expect("unmarshal");
        assert_eq!(decoded.get("name").map(String::as_str), Some("Ann"));
    }

    #[test]
    fn json_codec_rejects_mismatched_type() {
        let result: Result<u32, CodecError> = JsonCodec.unmarshal(br#""text""#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn bincode_codec_restores_struct() {
        let bytes = BincodeCodec.marshal(&sample()).expect("marshal");
        let decoded: Profile = BincodeCodec.unmarshal(&bytes).expect("unmarshal");
        assert_eq!(decoded, sample());
    }

    #[test]
    fn bincode_codec_rejects_truncated_payload() {
        let bytes = BincodeCodec.marshal(&sample()).expect("marshal");
        let result: Result<Profile, CodecError> = BincodeCodec.unmarshal(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(CodecError::Bincode(_))));
    }

    #[test]
    fn codec_encoding_is_deterministic() {
        let first = JsonCodec.marshal(&sample()).expect("first");
        let second = JsonCodec.marshal(&sample()).expect("second");
        assert_eq!(first, second);
    }

    fn encode_with<C: Codec>(codec: C, value: u64) -> Vec<u8> {
        codec.marshal(&value).expect("marshal")
    }

    #[test]
    fn codec_reference_delegates() {
        assert_eq!(encode_with(&BincodeCodec, 7), encode_with(BincodeCodec, 7));
    }
}
