//! Principal serialization for the session layer.

use log::*;
use serde_json::{Map, Value};

use super::{Principal, TwitterIdPrincipal};
use crate::error::{principal_error, Error, ErrorKind, PrincipalErrorKind};

/// Field name of the Twitter principal envelope.
pub const TWITTER_FIELD: &str = "Twitter";

/// Start of every encoded Twitter principal: the reserved key with a string value.
const ENCODED_PREFIX: &str = "{\"Twitter\":\"";

/// Trait for converting principals to and from their persisted string form.
///
/// A serializer only handles the principal kinds it `supports`; callers pick
/// the serializer with `supports` when writing and `supports_encoded` when reading.
pub trait PrincipalSerializer: Send + Sync {
    /// Whether this serializer handles the given principal.
    fn supports(&self, principal: &Principal) -> bool;

    /// Encode a supported principal.
    fn serialize(&self, principal: &Principal) -> Result<String, Error>;

    /// Whether an encoded value looks like one this serializer produced.
    ///
    /// This is a cheap shape test, not a parse.
    fn supports_encoded(&self, value: &str) -> bool;

    /// Decode a value.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the envelope is well formed but carries no principal;
    /// an error when the envelope itself is malformed.
    fn deserialize(&self, value: &str) -> Result<Option<Principal>, Error>;
}

/// Serializer for [`TwitterIdPrincipal`].
///
/// The envelope is `{"Twitter":"<json of the principal>"}`: the inner document is
/// itself JSON, stored as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterIdPrincipalSerializer;

impl TwitterIdPrincipalSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl PrincipalSerializer for TwitterIdPrincipalSerializer {
    fn supports(&self, principal: &Principal) -> bool {
        matches!(principal, Principal::TwitterId(_))
    }

    fn serialize(&self, principal: &Principal) -> Result<String, Error> {
        let twitter_principal = principal.as_twitter_id().ok_or_else(|| {
            principal_error(
                PrincipalErrorKind::Serialization,
                &format!("Unsupported principal {}", principal),
            )
        })?;

        let mut envelope = Map::new();
        envelope.insert(
            TWITTER_FIELD.to_string(),
            Value::String(twitter_principal.to_json()?),
        );

        serde_json::to_string(&Value::Object(envelope)).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Principal(PrincipalErrorKind::Serialization),
        })
    }

    /// Accepts exactly `{"Twitter":"<string>"}`: the reserved key as the only
    /// member, with a string value.
    fn supports_encoded(&self, value: &str) -> bool {
        let Some(rest) = value.strip_prefix(ENCODED_PREFIX) else {
            return false;
        };

        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => return &rest[i + 1..] == "}",
                _ => {}
            }
        }
        false
    }

    fn deserialize(&self, value: &str) -> Result<Option<Principal>, Error> {
        let document: Value = serde_json::from_str(value).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Principal(PrincipalErrorKind::Deserialization),
        })?;

        let envelope = document.as_object().ok_or_else(|| {
            principal_error(
                PrincipalErrorKind::Deserialization,
                "Found invalid data structure while parsing TwitterIdPrincipal",
            )
        })?;

        match envelope.get(TWITTER_FIELD) {
            Some(Value::String(inner)) if !inner.is_empty() => {
                TwitterIdPrincipal::from_json(inner).map(|p| Some(p.into()))
            }
            Some(Value::String(_)) | Some(Value::Null) | None => {
                debug!("No TwitterIdPrincipal in serialized value");
                Ok(None)
            }
            Some(other) => Err(principal_error(
                PrincipalErrorKind::Deserialization,
                &format!("Expected a string for {}, found {}", TWITTER_FIELD, other),
            )),
        }
    }
}
