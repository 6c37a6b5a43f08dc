//! The Twitter login flow as the IdP runs it.
//!
//! One attempt spans two requests: `start` sends the browser to Twitter, and
//! `resume` handles the redirect back. Between the two the attempt is parked in
//! the attempt store under an id the host carries in the flow execution URL.

use std::sync::Arc;

use chrono::Duration;
use log::*;
use secrecy::SecretString;
use service::config::{Config, DEFAULT_ATTEMPT_TTL_SECONDS};
use twitter_auth::attempt::{
    AttemptState, AttemptStore, AuthenticationResult, CanonicalizationContext, InboundRequest,
};
use twitter_auth::error::{config_error, ConfigErrorKind};
use twitter_auth::oauth::OAuth1ClientFactory;
use twitter_auth::principal::{PrincipalSerializer, Subject, TwitterIdPrincipalSerializer};
use twitter_auth::step::{
    AuthenticationStep, InitializeTwitterContext, ProcessRedirectFromTwitter,
    TwitterSubjectCanonicalization,
};
use twitter_auth::{Event, TwitterIntegration};

use crate::error::Error;

/// Where to send the browser to start the Twitter login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub attempt_id: String,
    pub url: String,
}

/// A completed login: the canonical principal name and how it was established.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSubject {
    pub principal_name: String,
    pub result: AuthenticationResult,
}

/// Read the Twitter consumer credentials from the service configuration.
///
/// A missing or blank key or secret is a configuration error.
pub fn integration_from_config(config: &Config) -> Result<TwitterIntegration, Error> {
    let consumer_key = config.twitter_consumer_key().ok_or_else(|| {
        config_error(
            ConfigErrorKind::MissingConsumerKey,
            "TWITTER_CONSUMER_KEY is not set",
        )
    })?;
    let consumer_secret = config.twitter_consumer_secret().ok_or_else(|| {
        config_error(
            ConfigErrorKind::MissingConsumerSecret,
            "TWITTER_CONSUMER_SECRET is not set",
        )
    })?;
    Ok(TwitterIntegration::new(
        consumer_key,
        SecretString::new(consumer_secret),
    )?)
}

/// Lifetime of a parked attempt; out-of-range values fall back to the default.
pub fn attempt_ttl(config: &Config) -> Duration {
    i64::try_from(config.attempt_ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or_else(|| Duration::seconds(DEFAULT_ATTEMPT_TTL_SECONDS as i64))
}

/// Runs the Twitter login steps over attempt-scoped state.
pub struct TwitterLoginFlow {
    flow_id: String,
    store: AttemptStore,
    initialize: InitializeTwitterContext,
    process: ProcessRedirectFromTwitter,
    canonicalize: TwitterSubjectCanonicalization,
    serializer: TwitterIdPrincipalSerializer,
}

impl TwitterLoginFlow {
    pub fn new(
        flow_id: impl Into<String>,
        integration: TwitterIntegration,
        client_factory: Arc<dyn OAuth1ClientFactory>,
        attempt_ttl: Duration,
    ) -> Self {
        Self {
            flow_id: flow_id.into(),
            store: AttemptStore::with_ttl(attempt_ttl),
            initialize: InitializeTwitterContext::new(integration, client_factory),
            process: ProcessRedirectFromTwitter::new(),
            canonicalize: TwitterSubjectCanonicalization::new(),
            serializer: TwitterIdPrincipalSerializer::new(),
        }
    }

    /// Build the flow from the service configuration.
    pub fn from_config(
        config: &Config,
        client_factory: Arc<dyn OAuth1ClientFactory>,
    ) -> Result<Self, Error> {
        let integration = integration_from_config(config)?;

        info!(
            "Twitter login configured for flow {} with consumer key {}",
            config.twitter_flow_id,
            integration.consumer_key()
        );

        Ok(Self::new(
            config.twitter_flow_id.clone(),
            integration,
            client_factory,
            attempt_ttl(config),
        ))
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn store(&self) -> &AttemptStore {
        &self.store
    }

    /// Begin an attempt and park it until Twitter redirects back.
    ///
    /// # Arguments
    ///
    /// * `request` - The request that triggered the login
    /// * `flow_execution_url` - Path and query the browser must return to
    ///
    /// # Returns
    ///
    /// The attempt id and the Twitter login URL. On failure nothing is stored.
    pub async fn start(
        &self,
        request: InboundRequest,
        flow_execution_url: &str,
    ) -> Result<LoginRedirect, Error> {
        let mut attempt = AttemptState::new(AttemptStore::generate_id())
            .with_attempted_flow(self.flow_id.as_str())
            .with_request(request)
            .with_flow_execution_url(flow_execution_url);

        let event = self.initialize.execute(&mut attempt).await;
        if !event.is_proceed() {
            return Err(Self::failure(event, attempt));
        }

        let Some(url) = attempt.handshake.as_ref().map(|h| h.login_url()) else {
            return Err(Error::authn(Event::NoCredentials, None));
        };
        let attempt_id = attempt.id.clone();

        // The request is only meaningful for this leg of the handshake.
        attempt.request = None;
        self.store.put(attempt);

        debug!("Attempt {} redirecting to Twitter", attempt_id);
        Ok(LoginRedirect { attempt_id, url })
    }

    /// Handle the redirect back from Twitter and canonicalize the subject.
    ///
    /// The attempt concludes here whatever the outcome: its handshake state is
    /// discarded and a retry has to `start` again. An unknown or expired attempt
    /// has no handshake and fails with `NoCredentials`.
    pub async fn resume(
        &self,
        attempt_id: &str,
        request: InboundRequest,
    ) -> Result<CanonicalSubject, Error> {
        let mut attempt = self.store.take(attempt_id).unwrap_or_else(|| {
            debug!("No stored attempt {}", attempt_id);
            AttemptState::new(attempt_id).with_attempted_flow(self.flow_id.as_str())
        });
        attempt.request = Some(request);

        let event = self.process.execute(&mut attempt).await;
        attempt.conclude();
        if !event.is_proceed() {
            return Err(Self::failure(event, attempt));
        }

        attempt.c14n = attempt.result.as_ref().map(CanonicalizationContext::from);
        let event = self.canonicalize.execute(&mut attempt).await;
        if !event.is_proceed() {
            return Err(Self::failure(event, attempt));
        }

        let principal_name = attempt.c14n.and_then(|c14n| c14n.principal_name);
        match (principal_name, attempt.result) {
            (Some(principal_name), Some(result)) => Ok(CanonicalSubject {
                principal_name,
                result,
            }),
            _ => Err(Error::authn(Event::InvalidSubject, None)),
        }
    }

    /// Encode the subject's Twitter principals for the session layer.
    pub fn persist(&self, subject: &Subject) -> Result<Vec<String>, Error> {
        subject
            .principals()
            .filter(|p| self.serializer.supports(p))
            .map(|p| self.serializer.serialize(p).map_err(Error::from))
            .collect()
    }

    /// Rebuild a subject from persisted values.
    ///
    /// Values in a shape this flow does not recognize belong to other
    /// serializers and are skipped; malformed Twitter values are an error.
    pub fn restore(&self, encoded: &[String]) -> Result<Subject, Error> {
        let mut subject = Subject::new();
        for value in encoded {
            if !self.serializer.supports_encoded(value) {
                trace!("Skipping principal not handled by the Twitter serializer");
                continue;
            }
            if let Some(principal) = self.serializer.deserialize(value)? {
                subject.add_principal(principal);
            }
        }
        Ok(subject)
    }

    fn failure(event: Event, attempt: AttemptState) -> Error {
        let source = attempt.error.map(|context| context.error);
        warn!("Attempt {} ended with {}", attempt.id, event);
        Error::authn(event, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use clap::Parser;
    use twitter_auth::error::{oauth_error, Error as TwitterAuthError, OAuthErrorKind};
    use twitter_auth::oauth::{AccessToken, OAuth1Client, RequestToken};
    use twitter_auth::principal::{TwitterIdPrincipal, UsernamePrincipal};

    use crate::error::FlowErrorKind;

    /// Issues request tokens RT1, RT2, ... and accepts registered verifiers.
    struct StubClient {
        issued: AtomicUsize,
        fail_request_token: bool,
        users: HashMap<(String, String), u64>,
        access_token_calls: AtomicUsize,
    }

    impl StubClient {
        fn new(users: &[(&str, &str, u64)]) -> Self {
            Self {
                issued: AtomicUsize::new(0),
                fail_request_token: false,
                users: users
                    .iter()
                    .map(|(rt, v, id)| ((rt.to_string(), v.to_string()), *id))
                    .collect(),
                access_token_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OAuth1Client for StubClient {
        async fn request_token(&self, _callback_url: &str) -> Result<RequestToken, TwitterAuthError> {
            if self.fail_request_token {
                return Err(oauth_error(OAuthErrorKind::Network, "connect timed out"));
            }
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(RequestToken::new(format!("RT{}", n), "secret"))
        }

        async fn access_token(
            &self,
            request_token: &RequestToken,
            verifier: &str,
        ) -> Result<AccessToken, TwitterAuthError> {
            self.access_token_calls.fetch_add(1, Ordering::SeqCst);
            self.users
                .get(&(request_token.token.clone(), verifier.to_string()))
                .map(|id| AccessToken::new("AT", "secret", *id))
                .ok_or_else(|| oauth_error(OAuthErrorKind::AccessToken, "Invalid or expired token."))
        }
    }

    struct StubFactory(Arc<StubClient>);

    impl OAuth1ClientFactory for StubFactory {
        fn create(&self, _integration: &TwitterIntegration) -> Arc<dyn OAuth1Client> {
            self.0.clone()
        }
    }

    fn flow_with(client: StubClient) -> (TwitterLoginFlow, Arc<StubClient>) {
        let client = Arc::new(client);
        let integration =
            TwitterIntegration::new("K".to_string(), SecretString::new("S".to_string())).unwrap();
        let flow = TwitterLoginFlow::new(
            "authn/Twitter",
            integration,
            Arc::new(StubFactory(client.clone())),
            Duration::minutes(10),
        );
        (flow, client)
    }

    fn login_request() -> InboundRequest {
        InboundRequest::new("https", "idp.example.org")
    }

    fn callback(verifier: &str) -> InboundRequest {
        InboundRequest::from_url(&format!(
            "https://idp.example.org/flow/abc?_eventId=proceed&oauth_verifier={}",
            verifier
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_happy_path() {
        let (flow, _) = flow_with(StubClient::new(&[("RT1", "V1", 42)]));

        let redirect = flow.start(login_request(), "/flow/abc").await.unwrap();
        assert_eq!(
            redirect.url,
            "https://api.twitter.com/oauth/authenticate?oauth_token=RT1"
        );
        assert!(flow.store().contains(&redirect.attempt_id));

        let subject = flow.resume(&redirect.attempt_id, callback("V1")).await.unwrap();
        assert_eq!(subject.principal_name, "42");
        assert_eq!(subject.result.flow_id, "authn/Twitter");
        assert!(!flow.store().contains(&redirect.attempt_id));
    }

    #[tokio::test]
    async fn test_provider_rejects_verifier() {
        let (flow, client) = flow_with(StubClient::new(&[("RT1", "V1", 42)]));

        let redirect = flow.start(login_request(), "/flow/abc").await.unwrap();
        let err = flow
            .resume(&redirect.attempt_id, callback("forged"))
            .await
            .unwrap_err();

        assert_eq!(err.event(), Some(Event::NoCredentials));
        assert!(err.to_string().contains("Invalid or expired token."));
        assert_eq!(client.access_token_calls.load(Ordering::SeqCst), 1);

        // The attempt concluded; replaying the callback finds no handshake.
        let err = flow
            .resume(&redirect.attempt_id, callback("V1"))
            .await
            .unwrap_err();
        assert_eq!(err.event(), Some(Event::NoCredentials));
        assert_eq!(client.access_token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_request_token_failure_stores_nothing() {
        let mut client = StubClient::new(&[]);
        client.fail_request_token = true;
        let (flow, _) = flow_with(client);

        let err = flow.start(login_request(), "/flow/abc").await.unwrap_err();

        assert_eq!(err.error_kind, FlowErrorKind::Authn(Event::NoCredentials));
        assert!(err.to_string().contains("connect timed out"));
        assert!(flow.store().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_attempt_is_no_credentials() {
        let (flow, client) = flow_with(StubClient::new(&[("RT1", "V1", 42)]));

        let err = flow.resume("unknown", callback("V1")).await.unwrap_err();

        assert_eq!(err.event(), Some(Event::NoCredentials));
        assert_eq!(client.access_token_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_attempt_is_no_credentials() {
        let client = Arc::new(StubClient::new(&[("RT1", "V1", 42)]));
        let integration =
            TwitterIntegration::new("K".to_string(), SecretString::new("S".to_string())).unwrap();
        let flow = TwitterLoginFlow::new(
            "authn/Twitter",
            integration,
            Arc::new(StubFactory(client)),
            Duration::seconds(-1),
        );

        let redirect = flow.start(login_request(), "/flow/abc").await.unwrap();
        let err = flow
            .resume(&redirect.attempt_id, callback("V1"))
            .await
            .unwrap_err();

        assert_eq!(err.event(), Some(Event::NoCredentials));
    }

    #[tokio::test]
    async fn test_abandoned_attempts_do_not_accumulate() {
        let client = Arc::new(StubClient::new(&[]));
        let integration =
            TwitterIntegration::new("K".to_string(), SecretString::new("S".to_string())).unwrap();
        let flow = TwitterLoginFlow::new(
            "authn/Twitter",
            integration,
            Arc::new(StubFactory(client)),
            Duration::seconds(-1),
        );

        for _ in 0..1000 {
            flow.start(login_request(), "/flow/abc").await.unwrap();
        }

        // Only the attempt parked last survives, and it has already expired.
        assert_eq!(flow.store().len(), 1);
        flow.store().cleanup_expired();
        assert!(flow.store().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_attempts_are_independent() {
        let (flow, _) = flow_with(StubClient::new(&[("RT1", "V1", 1), ("RT2", "V2", 2)]));

        let first = flow.start(login_request(), "/flow/one").await.unwrap();
        let second = flow.start(login_request(), "/flow/two").await.unwrap();
        assert_ne!(first.attempt_id, second.attempt_id);

        let (a, b) = tokio::join!(
            flow.resume(&second.attempt_id, callback("V2")),
            flow.resume(&first.attempt_id, callback("V1")),
        );
        assert_eq!(a.unwrap().principal_name, "2");
        assert_eq!(b.unwrap().principal_name, "1");
    }

    #[test]
    fn test_persist_and_restore() {
        let (flow, _) = flow_with(StubClient::new(&[]));
        let mut subject = Subject::new();
        subject.add_principal(TwitterIdPrincipal::new("42"));
        subject.add_principal(UsernamePrincipal::new("jdoe"));

        let encoded = flow.persist(&subject).unwrap();
        assert_eq!(encoded, vec![r#"{"Twitter":"{\"userId\":\"42\"}"}"#.to_string()]);

        let mut stored = encoded.clone();
        stored.push("jdoe".to_string());
        stored.push(r#"{"Twitter":""}"#.to_string());

        let restored = flow.restore(&stored).unwrap();
        assert_eq!(
            restored.twitter_id_principals(),
            vec![&TwitterIdPrincipal::new("42")]
        );
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_restore_malformed_value_is_session_error() {
        let (flow, _) = flow_with(StubClient::new(&[]));

        let err = flow
            .restore(&[r#"{"Twitter":"{not json}"}"#.to_string()])
            .unwrap_err();

        assert_eq!(err.error_kind, FlowErrorKind::Session);
    }

    #[test]
    fn test_from_config() {
        let config = Config::parse_from([
            "idp",
            "--twitter-consumer-key",
            "K",
            "--twitter-consumer-secret",
            "S",
        ]);
        let factory = Arc::new(StubFactory(Arc::new(StubClient::new(&[]))));

        let flow = TwitterLoginFlow::from_config(&config, factory).unwrap();
        assert_eq!(flow.flow_id(), "authn/Twitter");
    }

    #[test]
    fn test_integration_from_config_requires_key() {
        let config = Config::parse_from(["idp", "--twitter-consumer-secret", "S"]);

        let err = integration_from_config(&config).unwrap_err();
        assert_eq!(err.error_kind, FlowErrorKind::Config);
        assert!(err.to_string().contains("TWITTER_CONSUMER_KEY"));
    }

    #[test]
    fn test_attempt_ttl_out_of_range_falls_back() {
        let config = Config::parse_from(["idp", "--attempt-ttl-seconds", "18446744073709551615"]);
        assert_eq!(
            attempt_ttl(&config),
            Duration::seconds(DEFAULT_ATTEMPT_TTL_SECONDS as i64)
        );

        let config = Config::parse_from(["idp", "--attempt-ttl-seconds", "60"]);
        assert_eq!(attempt_ttl(&config), Duration::seconds(60));
    }

    #[test]
    fn test_from_config_rejects_blank_secret() {
        let config = Config::parse_from(["idp", "--twitter-consumer-key", "K"])
            .set_twitter_consumer_secret(String::new());
        let factory = Arc::new(StubFactory(Arc::new(StubClient::new(&[]))));

        let err = TwitterLoginFlow::from_config(&config, factory)
            .err()
            .unwrap();
        assert_eq!(err.error_kind, FlowErrorKind::Config);
    }
}
