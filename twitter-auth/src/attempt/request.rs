//! The inbound HTTP request, as far as the handshake needs it.

use std::collections::HashMap;

use url::Url;

/// Scheme, server name and query parameters of the request being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub scheme: String,
    pub host: String,
    query: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            query: HashMap::new(),
        }
    }

    /// Build from the full request URL. Only the first value of a repeated
    /// query parameter is kept. The port is not part of `host`.
    pub fn from_url(request_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(request_url)?;
        let host = url.host_str().ok_or(url::ParseError::EmptyHost)?.to_string();

        let mut query = HashMap::new();
        for (name, value) in url.query_pairs() {
            query
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            query,
        })
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Value of a query parameter, if present.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}
