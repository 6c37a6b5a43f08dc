//! OAuth1 token types.

use secrecy::SecretString;

/// Temporary credentials identifying an in-progress authorization request.
#[derive(Debug, Clone)]
pub struct RequestToken {
    /// The `oauth_token` value.
    pub token: String,
    /// The `oauth_token_secret` value.
    pub token_secret: SecretString,
}

impl RequestToken {
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_secret: SecretString::new(token_secret.into()),
        }
    }
}

/// Token credentials granted once the user has authorized the application.
///
/// Twitter returns the numeric id of the authorizing user alongside the token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The `oauth_token` value.
    pub token: String,
    /// The `oauth_token_secret` value.
    pub token_secret: SecretString,
    /// Twitter's numeric user identifier.
    pub user_id: u64,
    /// The user's screen name, when returned.
    pub screen_name: Option<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>, user_id: u64) -> Self {
        Self {
            token: token.into(),
            token_secret: SecretString::new(token_secret.into()),
            user_id,
            screen_name: None,
        }
    }

    /// Set the screen name returned with the token.
    pub fn with_screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_request_token_keeps_secret() {
        let token = RequestToken::new("RT1", "s3cr3t");
        assert_eq!(token.token, "RT1");
        assert_eq!(token.token_secret.expose_secret(), "s3cr3t");
        assert!(!format!("{:?}", token).contains("s3cr3t"));
    }

    #[test]
    fn test_access_token_screen_name() {
        let token = AccessToken::new("AT1", "secret", 42).with_screen_name("jack");
        assert_eq!(token.user_id, 42);
        assert_eq!(token.screen_name.as_deref(), Some("jack"));
    }
}
