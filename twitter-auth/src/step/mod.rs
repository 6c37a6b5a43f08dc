//! Authentication steps of the Twitter login flow.
//!
//! Each step reads and updates one [`AttemptState`] and reports an [`Event`] back
//! to whatever orchestrates the flow. Steps never retry and never let a provider
//! error escape as anything other than an event.

mod canonicalize;
mod initialize;
mod process_redirect;

pub use canonicalize::{ActivationCondition, TwitterSubjectCanonicalization};
pub use initialize::{InitializeTwitterContext, PROCEED_MARKER};
pub use process_redirect::{ProcessRedirectFromTwitter, VERIFIER_PARAM};

use std::fmt;

use async_trait::async_trait;

use crate::attempt::AttemptState;
use crate::error::AuthnErrorKind;

/// Outcome signals reported to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Proceed,
    NoCredentials,
    InvalidContext,
    InvalidSubject,
}

impl Event {
    /// Get the event identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Proceed => "proceed",
            Event::NoCredentials => "NoCredentials",
            Event::InvalidContext => "InvalidProfileContext",
            Event::InvalidSubject => "InvalidSubject",
        }
    }

    pub fn is_proceed(&self) -> bool {
        *self == Event::Proceed
    }
}

impl From<AuthnErrorKind> for Event {
    fn from(kind: AuthnErrorKind) -> Self {
        match kind {
            AuthnErrorKind::NoCredentials => Event::NoCredentials,
            AuthnErrorKind::InvalidContext => Event::InvalidContext,
            AuthnErrorKind::InvalidSubject => Event::InvalidSubject,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step of an authentication flow.
#[async_trait]
pub trait AuthenticationStep: Send + Sync {
    /// Step name, used as the log prefix.
    fn name(&self) -> &'static str;

    /// Run the step against the attempt's state.
    async fn execute(&self, attempt: &mut AttemptState) -> Event;
}
