//! Per-attempt state of the OAuth1 handshake with Twitter.

use std::fmt;
use std::sync::Arc;

use crate::integration::TwitterIntegration;
use crate::oauth::{AccessToken, OAuth1Client, RequestToken};

/// Handshake state for one authentication attempt.
///
/// Only ever built once a request token has been obtained, and owned by the
/// attempt that built it. The access token is filled in by the callback.
#[derive(Clone)]
pub struct HandshakeContext {
    integration: TwitterIntegration,
    client: Arc<dyn OAuth1Client>,
    request_token: RequestToken,
    access_token: Option<AccessToken>,
}

impl HandshakeContext {
    pub fn new(
        integration: TwitterIntegration,
        client: Arc<dyn OAuth1Client>,
        request_token: RequestToken,
    ) -> Self {
        Self {
            integration,
            client,
            request_token,
            access_token: None,
        }
    }

    pub fn integration(&self) -> &TwitterIntegration {
        &self.integration
    }

    pub fn client(&self) -> &dyn OAuth1Client {
        self.client.as_ref()
    }

    pub fn request_token(&self) -> &RequestToken {
        &self.request_token
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn set_access_token(&mut self, token: AccessToken) {
        self.access_token = Some(token);
    }

    /// Twitter URL to send the browser to for authorization.
    pub fn login_url(&self) -> String {
        self.client.authentication_url(&self.request_token)
    }
}

impl fmt::Debug for HandshakeContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HandshakeContext")
            .field("consumer_key", &self.integration.consumer_key())
            .field("request_token", &self.request_token)
            .field("access_token", &self.access_token)
            .finish()
    }
}
