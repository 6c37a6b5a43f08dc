//! Principal asserting a Twitter user id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{principal_error, Error, ErrorKind, PrincipalErrorKind};
use crate::oauth::AccessToken;

/// The user id Twitter asserted for the authenticated subject.
///
/// Equality and hashing consider only the user id. The JSON form,
/// `{"userId":"<id>"}`, is persisted inside sessions and must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwitterIdPrincipal {
    #[serde(rename = "userId", default)]
    user_id: String,
}

impl TwitterIdPrincipal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Build the principal from the user id carried by an access token.
    pub fn from_access_token(token: &AccessToken) -> Self {
        Self::new(token.user_id.to_string())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Principal name, identical to the user id.
    pub fn name(&self) -> &str {
        &self.user_id
    }

    /// Encode as the inner `{"userId":...}` document.
    pub fn to_json(&self) -> Result<String, Error> {
        if self.user_id.is_empty() {
            return Err(principal_error(
                PrincipalErrorKind::Serialization,
                "TwitterIdPrincipal has no userId",
            ));
        }

        serde_json::to_string(self).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Principal(PrincipalErrorKind::Serialization),
        })
    }

    /// Decode the inner `{"userId":...}` document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let principal: Self = serde_json::from_str(json).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Principal(PrincipalErrorKind::Deserialization),
        })?;

        if principal.user_id.is_empty() {
            return Err(principal_error(
                PrincipalErrorKind::Deserialization,
                "Serialized TwitterIdPrincipal has no userId",
            ));
        }

        Ok(principal)
    }
}

impl fmt::Display for TwitterIdPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TwitterIdPrincipal{{TwitterIdPrincipal={}}}", self.user_id)
    }
}
