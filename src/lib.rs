//! Twitter login for an identity provider.
//!
//! Wires the steps from `twitter-auth` into a [`flow::TwitterLoginFlow`] that a
//! host drives with two calls per attempt, and translates their outcomes into
//! this crate's [`Error`].

pub mod error;
pub mod flow;

pub use error::{Error, FlowErrorKind};
pub use flow::{CanonicalSubject, LoginRedirect, TwitterLoginFlow};
