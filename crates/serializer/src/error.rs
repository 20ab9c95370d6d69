//! Codec error type.

use thiserror::Error;

use crate::geo_point::GeoPointError;
use crate::reference::ReferenceError;
use crate::timestamp::TimestampError;
use crate::wire::SpecialType;

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("malformed input: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown special value type {0}")]
    UnknownSpecialType(serde_json::Value),
    #[error("invalid {kind} value: {reason}")]
    InvalidSpecial { kind: SpecialType, reason: String },
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    GeoPoint(#[from] GeoPointError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

pub type Result<T> = std::result::Result<T, SerializerError>;
