//! Stub collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::integration::TwitterIntegration;
use crate::oauth::{AccessToken, OAuth1Client, OAuth1ClientFactory, RequestToken};

pub(crate) fn integration() -> TwitterIntegration {
    TwitterIntegration::new("K".to_string(), SecretString::new("S".to_string())).unwrap()
}

/// OAuth1 client answering from canned tokens and counting its calls.
pub(crate) struct StubClient {
    request_token_error: Option<String>,
    access_tokens: HashMap<(String, String), u64>,
    pub request_token_calls: AtomicUsize,
    pub access_token_calls: AtomicUsize,
    pub last_callback: Mutex<Option<String>>,
}

impl StubClient {
    /// Hands out request token `RT1`; every verifier is rejected until registered.
    pub fn new() -> Self {
        Self {
            request_token_error: None,
            access_tokens: HashMap::new(),
            request_token_calls: AtomicUsize::new(0),
            access_token_calls: AtomicUsize::new(0),
            last_callback: Mutex::new(None),
        }
    }

    pub fn with_request_token_error(mut self, message: &str) -> Self {
        self.request_token_error = Some(message.to_string());
        self
    }

    pub fn with_access_token(mut self, request_token: &str, verifier: &str, user_id: u64) -> Self {
        self.access_tokens
            .insert((request_token.to_string(), verifier.to_string()), user_id);
        self
    }

    pub fn access_token_calls(&self) -> usize {
        self.access_token_calls.load(Ordering::SeqCst)
    }

    pub fn request_token_calls(&self) -> usize {
        self.request_token_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuth1Client for StubClient {
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken, Error> {
        self.request_token_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_callback.lock().unwrap() = Some(callback_url.to_string());

        match &self.request_token_error {
            Some(message) => Err(oauth_error(OAuthErrorKind::RequestToken, message)),
            None => Ok(RequestToken::new("RT1", "RT1-secret")),
        }
    }

    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, Error> {
        self.access_token_calls.fetch_add(1, Ordering::SeqCst);

        self.access_tokens
            .get(&(request_token.token.clone(), verifier.to_string()))
            .map(|user_id| AccessToken::new("AT1", "AT1-secret", *user_id))
            .ok_or_else(|| oauth_error(OAuthErrorKind::AccessToken, "Invalid or expired token."))
    }
}

/// Factory handing out one shared stub client and remembering the consumer key used.
pub(crate) struct StubFactory {
    pub client: Arc<StubClient>,
    pub consumer_keys: Mutex<Vec<String>>,
}

impl StubFactory {
    pub fn new(client: StubClient) -> Self {
        Self {
            client: Arc::new(client),
            consumer_keys: Mutex::new(Vec::new()),
        }
    }
}

impl OAuth1ClientFactory for StubFactory {
    fn create(&self, integration: &TwitterIntegration) -> Arc<dyn OAuth1Client> {
        self.consumer_keys
            .lock()
            .unwrap()
            .push(integration.consumer_key().to_string());
        self.client.clone()
    }
}
