//! Finishes the handshake when Twitter redirects the browser back.

use async_trait::async_trait;
use log::*;

use super::{AuthenticationStep, Event};
use crate::attempt::{AttemptState, AuthenticationResult, InboundRequest};
use crate::error::{authn_error, authn_error_from, AuthnErrorKind, Error};
use crate::handshake::HandshakeContext;
use crate::principal::{Subject, TwitterIdPrincipal};

/// Query parameter carrying the OAuth verifier on the redirect.
pub const VERIFIER_PARAM: &str = "oauth_verifier";

/// Exchanges the verifier for an access token and records the Twitter principal.
///
/// Performs at most one access token exchange per invocation. On success the
/// attempt carries an [`AuthenticationResult`] whose subject holds the new
/// [`TwitterIdPrincipal`]; on failure nothing is attached.
#[derive(Debug, Default)]
pub struct ProcessRedirectFromTwitter;

impl ProcessRedirectFromTwitter {
    pub fn new() -> Self {
        Self
    }

    /// Checks made before any request handling.
    fn pre_execute<'a>(&self, attempt: &'a AttemptState) -> Result<&'a str, Error> {
        let flow_id = attempt.attempted_flow.as_deref().ok_or_else(|| {
            info!("[{}] No attempted flow within authentication context", self.name());
            authn_error(AuthnErrorKind::InvalidContext, "No attempted flow")
        })?;

        if attempt.handshake.is_none() {
            info!("[{}] No TwitterContext available within authentication context", self.name());
            return Err(authn_error(
                AuthnErrorKind::NoCredentials,
                "No TwitterContext available",
            ));
        }

        Ok(flow_id)
    }

    /// Complete the handshake for the redirect in `request`.
    ///
    /// # Returns
    ///
    /// The principal for the user Twitter authenticated. The access token is kept
    /// on the handshake context.
    pub async fn complete(
        &self,
        handshake: &mut HandshakeContext,
        request: Option<&InboundRequest>,
    ) -> Result<TwitterIdPrincipal, Error> {
        let request = request.ok_or_else(|| {
            debug!("[{}] Profile action does not contain an inbound request", self.name());
            authn_error(AuthnErrorKind::NoCredentials, "No inbound request available")
        })?;

        let verifier = request
            .parameter(VERIFIER_PARAM)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                debug!("[{}] No Twitter OAuth verifier in request", self.name());
                authn_error(AuthnErrorKind::NoCredentials, "No OAuth verifier in request")
            })?;
        debug!("[{}] Twitter returned verifier {}", self.name(), verifier);

        let access_token = handshake
            .client()
            .access_token(handshake.request_token(), verifier)
            .await
            .map_err(|e| {
                warn!(
                    "[{}] Exception obtaining access token from Twitter: {}",
                    self.name(),
                    e
                );
                authn_error_from(AuthnErrorKind::NoCredentials, e)
            })?;

        info!("[{}] Login by '{}' succeeded", self.name(), access_token.user_id);

        let principal = TwitterIdPrincipal::from_access_token(&access_token);
        handshake.set_access_token(access_token);
        Ok(principal)
    }
}

#[async_trait]
impl AuthenticationStep for ProcessRedirectFromTwitter {
    fn name(&self) -> &'static str {
        "ProcessRedirectFromTwitter"
    }

    async fn execute(&self, attempt: &mut AttemptState) -> Event {
        let flow_id = match self.pre_execute(attempt) {
            Ok(flow_id) => flow_id.to_string(),
            Err(e) => return attempt.fail(e),
        };

        let Some(handshake) = attempt.handshake.as_mut() else {
            return attempt.fail(authn_error(
                AuthnErrorKind::NoCredentials,
                "No TwitterContext available",
            ));
        };

        match self.complete(handshake, attempt.request.as_ref()).await {
            Ok(principal) => {
                let mut subject = Subject::new();
                subject.add_principal(principal);
                attempt.result = Some(AuthenticationResult::new(flow_id, subject));
                Event::Proceed
            }
            Err(e) => attempt.fail(e),
        }
    }
}
