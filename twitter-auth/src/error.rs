//! Error types for the `twitter-auth` crate.
//!
//! Follows the same pattern as the other crates in the workspace: a root Error struct
//! holding an error kind tree and an optional source for error chaining.

use std::error::Error as StdError;
use std::fmt;

use crate::step::Event;

/// Top-level error type for twitter-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in twitter-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Authn(AuthnErrorKind),
    Principal(PrincipalErrorKind),
    OAuth(OAuthErrorKind),
    Config(ConfigErrorKind),
}

/// Authentication failures reported back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthnErrorKind {
    /// No usable OAuth token could be obtained or used.
    NoCredentials,
    /// The step ran outside a live, attempted authentication flow.
    InvalidContext,
    /// Zero or more than one Twitter principal on the subject.
    InvalidSubject,
}

/// Errors from principal (de)serialization.
#[derive(Debug, PartialEq)]
pub enum PrincipalErrorKind {
    Serialization,
    Deserialization,
}

/// Errors raised by OAuth1 client implementations.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    RequestToken,
    AccessToken,
    Network,
    InvalidResponse,
}

/// Errors from integration configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    MissingConsumerKey,
    MissingConsumerSecret,
}

impl Error {
    /// The outcome signal this error is reported as at a step boundary.
    ///
    /// Provider and transport failures always surface as `NoCredentials`.
    pub fn event(&self) -> Event {
        match &self.error_kind {
            ErrorKind::Authn(kind) => Event::from(*kind),
            ErrorKind::OAuth(_) => Event::NoCredentials,
            ErrorKind::Principal(_) | ErrorKind::Config(_) => Event::InvalidContext,
        }
    }

    /// Message of the underlying cause, if any.
    pub fn source_message(&self) -> Option<String> {
        self.source.as_ref().map(|e| e.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let detail = self
            .source
            .as_ref()
            .map(|e| format!(": {}", e))
            .unwrap_or_default();
        match &self.error_kind {
            ErrorKind::Authn(kind) => write!(f, "Authentication error: {:?}{}", kind, detail),
            ErrorKind::Principal(kind) => write!(f, "Principal error: {:?}{}", kind, detail),
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}{}", kind, detail),
            ErrorKind::Config(kind) => write!(f, "Configuration error: {:?}{}", kind, detail),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper function to create authentication errors.
pub fn authn_error(kind: AuthnErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Authn(kind),
    }
}

/// Wraps any error as an authentication error, keeping it as the source.
pub fn authn_error_from(kind: AuthnErrorKind, err: Error) -> Error {
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::Authn(kind),
    }
}

/// Helper function to create principal errors.
pub fn principal_error(kind: PrincipalErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Principal(kind),
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Helper function to create configuration errors.
pub fn config_error(kind: ConfigErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Config(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_errors_surface_as_no_credentials() {
        let err = oauth_error(OAuthErrorKind::AccessToken, "Invalid or expired token");
        assert_eq!(err.event(), Event::NoCredentials);
    }

    #[test]
    fn test_authn_errors_keep_their_event() {
        assert_eq!(
            authn_error(AuthnErrorKind::InvalidSubject, "x").event(),
            Event::InvalidSubject
        );
        assert_eq!(
            authn_error(AuthnErrorKind::InvalidContext, "x").event(),
            Event::InvalidContext
        );
    }

    #[test]
    fn test_wrapped_error_preserves_provider_message() {
        let provider = oauth_error(OAuthErrorKind::RequestToken, "Desktop applications only support the oauth_callback value 'oob'");
        let err = authn_error_from(AuthnErrorKind::NoCredentials, provider);

        assert_eq!(err.error_kind, ErrorKind::Authn(AuthnErrorKind::NoCredentials));
        assert!(err
            .source_message()
            .unwrap()
            .contains("oauth_callback value 'oob'"));
    }

    #[test]
    fn test_display_includes_kind() {
        let err = principal_error(PrincipalErrorKind::Serialization, "userId is unset");
        assert_eq!(
            err.to_string(),
            "Principal error: Serialization: userId is unset"
        );
    }
}
