//! OAuth1 client trait.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AccessToken, RequestToken};
use crate::error::Error;
use crate::integration::TwitterIntegration;

/// Twitter's user authentication endpoint ("Sign in with Twitter").
pub const AUTHENTICATE_URL: &str = "https://api.twitter.com/oauth/authenticate";

/// Trait for a signed OAuth 1.0a client bound to one consumer key/secret.
///
/// Implementations own the network I/O and request signing against the
/// provider's token endpoints. Both exchanges may block on the network and
/// are expected to enforce their own connect and read timeouts.
#[async_trait]
pub trait OAuth1Client: Send + Sync {
    /// Obtain a request token, registering the URL the provider redirects back to.
    ///
    /// # Arguments
    ///
    /// * `callback_url` - The `oauth_callback` value sent to the provider
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken, Error>;

    /// Exchange an authorized request token and its verifier for an access token.
    ///
    /// # Arguments
    ///
    /// * `request_token` - The request token obtained at the start of the handshake
    /// * `verifier` - The `oauth_verifier` returned on the redirect
    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, Error>;

    /// URL the user's browser is sent to in order to authorize the request token.
    fn authentication_url(&self, request_token: &RequestToken) -> String {
        format!(
            "{}?oauth_token={}",
            AUTHENTICATE_URL,
            urlencoding::encode(&request_token.token)
        )
    }
}

/// Creates a fresh OAuth1 client per authentication attempt.
pub trait OAuth1ClientFactory: Send + Sync {
    /// Build a client authenticated with the integration's consumer credentials.
    fn create(&self, integration: &TwitterIntegration) -> Arc<dyn OAuth1Client>;
}
