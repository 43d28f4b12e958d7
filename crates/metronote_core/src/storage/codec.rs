//! Persisted payload codec for collections and scalar preferences.
//!
//! # Responsibility
//! - Encode a full collection as a versioned JSON envelope.
//! - Decode both the envelope and the bare-array layout older builds wrote.
//!
//! # Invariants
//! - Encoded collections always carry `version == COLLECTION_FORMAT_VERSION`.
//! - Envelopes with a newer version are rejected, never partially read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current collection envelope version.
pub const COLLECTION_FORMAT_VERSION: u32 = 1;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    UnsupportedVersion { found: u32, latest_supported: u32 },
    UnexpectedShape(&'static str),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed payload: {err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "payload version {found} is newer than supported {latest_supported}"
            ),
            Self::UnexpectedShape(details) => write!(f, "unexpected payload shape: {details}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, R> {
    version: u32,
    records: &'a [R],
}

#[derive(Deserialize)]
struct EnvelopeOwned {
    version: u32,
    records: Value,
}

/// Encodes the whole collection as a versioned envelope.
pub fn encode_collection<R: Serialize>(records: &[R]) -> CodecResult<String> {
    let envelope = EnvelopeRef {
        version: COLLECTION_FORMAT_VERSION,
        records,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a persisted collection payload.
///
/// Accepts `{"version": N, "records": [...]}` with `N <= 1` and a bare
/// `[...]` array.
pub fn decode_collection<R: DeserializeOwned>(raw: &str) -> CodecResult<Vec<R>> {
    let value: Value = serde_json::from_str(raw)?;
    let records = match value {
        Value::Array(_) => value,
        Value::Object(_) => {
            let envelope: EnvelopeOwned = serde_json::from_value(value)?;
            if envelope.version > COLLECTION_FORMAT_VERSION {
                return Err(CodecError::UnsupportedVersion {
                    found: envelope.version,
                    latest_supported: COLLECTION_FORMAT_VERSION,
                });
            }
            envelope.records
        }
        _ => {
            return Err(CodecError::UnexpectedShape(
                "expected a record array or a versioned envelope",
            ))
        }
    };
    Ok(serde_json::from_value(records)?)
}

/// Encodes one scalar preference value.
pub fn encode_scalar<T: Serialize>(value: &T) -> CodecResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes one scalar preference value.
pub fn decode_scalar<T: DeserializeOwned>(raw: &str) -> CodecResult<T> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::{decode_collection, decode_scalar, encode_collection, CodecError};

    #[test]
    fn encoded_collection_carries_version_tag() {
        let raw = encode_collection(&["a".to_string()]).expect("encode");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(json["version"], 1);
        assert_eq!(json["records"][0], "a");
    }

    #[test]
    fn bare_array_payload_is_accepted() {
        let decoded: Vec<u32> = decode_collection("[3, 2, 1]").expect("decode");
        assert_eq!(decoded, vec![3, 2, 1]);
    }

    #[test]
    fn newer_envelope_version_is_rejected() {
        let err = decode_collection::<u32>(r#"{"version": 7, "records": []}"#)
            .expect_err("newer version must fail");
        assert!(matches!(
            err,
            CodecError::UnsupportedVersion {
                found: 7,
                latest_supported: 1
            }
        ));
    }

    #[test]
    fn scalar_payload_must_be_a_json_value_of_the_right_type() {
        assert!(!decode_scalar::<bool>("false").expect("decode"));
        assert!(decode_scalar::<bool>("\"yes\"").is_err());
        assert!(decode_scalar::<bool>("{not json").is_err());
    }

    #[test]
    fn string_payload_has_unexpected_shape() {
        let err = decode_collection::<u32>("\"oops\"").expect_err("string must fail");
        assert!(matches!(err, CodecError::UnexpectedShape(_)));
    }
}
