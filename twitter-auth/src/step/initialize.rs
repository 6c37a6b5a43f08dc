//! Starts the handshake: obtains a request token and the Twitter login URL.

use std::sync::Arc;

use async_trait::async_trait;
use log::*;

use super::{AuthenticationStep, Event};
use crate::attempt::{AttemptState, InboundRequest};
use crate::error::{authn_error, authn_error_from, AuthnErrorKind, Error};
use crate::handshake::HandshakeContext;
use crate::integration::TwitterIntegration;
use crate::oauth::OAuth1ClientFactory;

/// Appended to the flow execution URL so the flow proceeds when Twitter redirects back.
pub const PROCEED_MARKER: &str = "&_eventId=proceed";

/// Creates the attempt's [`HandshakeContext`].
///
/// On success the attempt holds a handshake with a request token, and
/// [`HandshakeContext::login_url`] is where the browser goes next. On failure no
/// handshake is left on the attempt, so a retry starts from scratch.
pub struct InitializeTwitterContext {
    integration: TwitterIntegration,
    client_factory: Arc<dyn OAuth1ClientFactory>,
}

impl InitializeTwitterContext {
    pub fn new(integration: TwitterIntegration, client_factory: Arc<dyn OAuth1ClientFactory>) -> Self {
        Self {
            integration,
            client_factory,
        }
    }

    pub fn integration(&self) -> &TwitterIntegration {
        &self.integration
    }

    /// URL Twitter sends the browser back to after authorization.
    ///
    /// # Arguments
    ///
    /// * `request` - The request being handled, for its scheme and server name
    /// * `flow_execution_url` - Path and query that resume the current flow
    pub fn callback_url(request: &InboundRequest, flow_execution_url: &str) -> String {
        format!(
            "{}://{}{}{}",
            request.scheme, request.host, flow_execution_url, PROCEED_MARKER
        )
    }

    /// Build a handshake context holding a fresh client and request token.
    ///
    /// # Returns
    ///
    /// The new handshake context, or the provider error if no request token was issued.
    pub async fn begin(
        &self,
        request: &InboundRequest,
        flow_execution_url: &str,
    ) -> Result<HandshakeContext, Error> {
        let client = self.client_factory.create(&self.integration);
        debug!(
            "[{}] Created TwitterContext using TwitterIntegration with consumer key {}",
            self.name(),
            self.integration.consumer_key()
        );

        let callback_url = Self::callback_url(request, flow_execution_url);
        debug!(
            "[{}] Obtaining request token with callback URL {}",
            self.name(),
            callback_url
        );

        let request_token = client.request_token(&callback_url).await.inspect_err(|e| {
            error!(
                "[{}] Error obtaining request token from Twitter: {}",
                self.name(),
                e
            )
        })?;
        debug!("[{}] Obtained request token", self.name());

        Ok(HandshakeContext::new(
            self.integration.clone(),
            client,
            request_token,
        ))
    }
}

#[async_trait]
impl AuthenticationStep for InitializeTwitterContext {
    fn name(&self) -> &'static str {
        "InitializeTwitterContext"
    }

    async fn execute(&self, attempt: &mut AttemptState) -> Event {
        attempt.handshake = None;

        let Some(request) = attempt.request.as_ref() else {
            debug!("[{}] Profile action does not contain an inbound request", self.name());
            return attempt.fail(authn_error(
                AuthnErrorKind::NoCredentials,
                "No inbound request available",
            ));
        };

        match self.begin(request, &attempt.flow_execution_url).await {
            Ok(handshake) => {
                attempt.handshake = Some(handshake);
                Event::Proceed
            }
            Err(e) => attempt.fail(authn_error_from(AuthnErrorKind::NoCredentials, e)),
        }
    }
}
