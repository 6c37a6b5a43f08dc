//! OAuth 1.0a client seam.
//!
//! Signing and transport are left to the client implementation; this module only
//! fixes the operations the handshake needs and the token shapes it carries.

mod client;
mod tokens;

pub use client::{OAuth1Client, OAuth1ClientFactory, AUTHENTICATE_URL};
pub use tokens::{AccessToken, RequestToken};
