//! Twitter application credentials.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{config_error, ConfigErrorKind, Error};

/// Consumer credentials of the Twitter application this IdP is registered as.
#[derive(Debug, Clone)]
pub struct TwitterIntegration {
    consumer_key: String,
    consumer_secret: SecretString,
}

impl TwitterIntegration {
    /// Create a new integration, rejecting blank credentials.
    ///
    /// # Arguments
    ///
    /// * `consumer_key` - Twitter OAuth consumer key
    /// * `consumer_secret` - Twitter OAuth consumer secret
    pub fn new(consumer_key: String, consumer_secret: SecretString) -> Result<Self, Error> {
        if consumer_key.trim().is_empty() {
            return Err(config_error(
                ConfigErrorKind::MissingConsumerKey,
                "Twitter consumer key must not be empty",
            ));
        }
        if consumer_secret.expose_secret().trim().is_empty() {
            return Err(config_error(
                ConfigErrorKind::MissingConsumerSecret,
                "Twitter consumer secret must not be empty",
            ));
        }

        Ok(Self {
            consumer_key,
            consumer_secret,
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &SecretString {
        &self.consumer_secret
    }
}
