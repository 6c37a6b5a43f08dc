//! Typed state of one authentication attempt.

use chrono::{DateTime, Utc};

use super::InboundRequest;
use crate::error::Error;
use crate::handshake::HandshakeContext;
use crate::principal::Subject;
use crate::step::Event;

/// Outcome of a successful login flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationResult {
    /// Identifier of the login flow that produced the result.
    pub flow_id: String,
    /// The authenticated subject and its principals.
    pub subject: Subject,
    pub authenticated_at: DateTime<Utc>,
}

impl AuthenticationResult {
    pub fn new(flow_id: impl Into<String>, subject: Subject) -> Self {
        Self {
            flow_id: flow_id.into(),
            subject,
            authenticated_at: Utc::now(),
        }
    }
}

/// Input and output of subject canonicalization.
#[derive(Debug, Default)]
pub struct CanonicalizationContext {
    pub subject: Option<Subject>,
    /// The canonical principal name, once canonicalization succeeds.
    pub principal_name: Option<String>,
    /// Why canonicalization failed, if it did.
    pub exception: Option<Error>,
}

impl CanonicalizationContext {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject: Some(subject),
            principal_name: None,
            exception: None,
        }
    }
}

impl From<&AuthenticationResult> for CanonicalizationContext {
    fn from(result: &AuthenticationResult) -> Self {
        Self::new(result.subject.clone())
    }
}

/// The last failure classified during the attempt.
#[derive(Debug)]
pub struct ErrorContext {
    pub event: Event,
    pub error: Error,
}

/// Everything one authentication attempt carries between its steps.
///
/// Owned by exactly one attempt; nothing in here is shared across attempts.
#[derive(Debug)]
pub struct AttemptState {
    pub id: String,
    /// Login flow being attempted. Steps refuse to run without one.
    pub attempted_flow: Option<String>,
    /// Request currently being handled, if the host supplied it.
    pub request: Option<InboundRequest>,
    /// Path, with query, the browser returns to in order to resume the flow.
    pub flow_execution_url: String,
    pub handshake: Option<HandshakeContext>,
    pub result: Option<AuthenticationResult>,
    pub c14n: Option<CanonicalizationContext>,
    pub error: Option<ErrorContext>,
}

impl AttemptState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attempted_flow: None,
            request: None,
            flow_execution_url: String::new(),
            handshake: None,
            result: None,
            c14n: None,
            error: None,
        }
    }

    pub fn with_attempted_flow(mut self, flow_id: impl Into<String>) -> Self {
        self.attempted_flow = Some(flow_id.into());
        self
    }

    pub fn with_request(mut self, request: InboundRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_flow_execution_url(mut self, flow_execution_url: impl Into<String>) -> Self {
        self.flow_execution_url = flow_execution_url.into();
        self
    }

    /// Record a failure and return the event it is reported as.
    pub fn fail(&mut self, error: Error) -> Event {
        let event = error.event();
        self.error = Some(ErrorContext { event, error });
        event
    }

    /// Drop the handshake state once the attempt has concluded.
    pub fn conclude(&mut self) {
        self.handshake = None;
    }
}
