//! # twitter-auth
//!
//! "Sign in with Twitter" for the identity provider's authentication pipeline:
//! - OAuth 1.0a three-legged handshake (request token, user redirect, verifier exchange)
//! - Per-attempt handshake state, carried across the browser redirect
//! - `TwitterIdPrincipal` and its serializer for the session layer
//! - Subject canonicalization down to a single principal name
//!
//! ## Architecture
//!
//! The flow is three [`step::AuthenticationStep`]s run in order by an orchestrator:
//! [`step::InitializeTwitterContext`], then (after the browser returns)
//! [`step::ProcessRedirectFromTwitter`], then [`step::TwitterSubjectCanonicalization`].
//! Request signing and HTTP transport live behind [`oauth::OAuth1Client`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use twitter_auth::{
//!     attempt::{AttemptState, AttemptStore, InboundRequest},
//!     step::{AuthenticationStep, Event, InitializeTwitterContext},
//! };
//! ```

pub mod attempt;
pub mod error;
pub mod handshake;
pub mod integration;
pub mod oauth;
pub mod principal;
pub mod step;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use integration::TwitterIntegration;
pub use step::Event;
