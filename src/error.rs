//! Error types for the Twitter login flow.
use std::error::Error as StdError;
use std::fmt;

use twitter_auth::error::{Error as TwitterAuthError, ErrorKind as TwitterAuthErrorKind};
use twitter_auth::Event;

/// Top-level error of the login flow. `error_kind` tells the host how the
/// attempt ended; `source` keeps the underlying cause for diagnostics.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: FlowErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum FlowErrorKind {
    /// The Twitter integration is not configured.
    Config,
    /// A step ended the attempt with this event.
    Authn(Event),
    /// Persisted principals could not be read or written.
    Session,
}

impl Error {
    /// The event the attempt ended with, if it ended in a step.
    pub fn event(&self) -> Option<Event> {
        match self.error_kind {
            FlowErrorKind::Authn(event) => Some(event),
            _ => None,
        }
    }

    pub(crate) fn authn(event: Event, source: Option<TwitterAuthError>) -> Self {
        Error {
            source: source.map(|e| Box::new(e) as Box<dyn StdError + Send + Sync>),
            error_kind: FlowErrorKind::Authn(event),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            FlowErrorKind::Config => write!(f, "Twitter login is not configured"),
            FlowErrorKind::Authn(event) => write!(f, "Twitter login ended with {}", event),
            FlowErrorKind::Session => write!(f, "Twitter principal session data error"),
        }?;
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Translate errors from the `twitter-auth` layer into this layer.
impl From<TwitterAuthError> for Error {
    fn from(err: TwitterAuthError) -> Self {
        let error_kind = match &err.error_kind {
            TwitterAuthErrorKind::Config(_) => FlowErrorKind::Config,
            TwitterAuthErrorKind::Principal(_) => FlowErrorKind::Session,
            TwitterAuthErrorKind::Authn(_) | TwitterAuthErrorKind::OAuth(_) => {
                FlowErrorKind::Authn(err.event())
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
