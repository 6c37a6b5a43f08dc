//! Principals asserted about an authentication subject.

mod serializer;
mod twitter;

pub use serializer::{PrincipalSerializer, TwitterIdPrincipalSerializer, TWITTER_FIELD};
pub use twitter::TwitterIdPrincipal;

use std::collections::HashSet;
use std::fmt;

/// Kinds of principal a subject can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    TwitterId,
    Username,
}

/// A plain username asserted by some other login flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsernamePrincipal(String);

impl UsernamePrincipal {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A named fact asserted about the authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    TwitterId(TwitterIdPrincipal),
    Username(UsernamePrincipal),
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::TwitterId(_) => PrincipalKind::TwitterId,
            Principal::Username(_) => PrincipalKind::Username,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Principal::TwitterId(p) => p.name(),
            Principal::Username(p) => p.name(),
        }
    }

    pub fn as_twitter_id(&self) -> Option<&TwitterIdPrincipal> {
        match self {
            Principal::TwitterId(p) => Some(p),
            _ => None,
        }
    }
}

impl From<TwitterIdPrincipal> for Principal {
    fn from(principal: TwitterIdPrincipal) -> Self {
        Principal::TwitterId(principal)
    }
}

impl From<UsernamePrincipal> for Principal {
    fn from(principal: UsernamePrincipal) -> Self {
        Principal::Username(principal)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Principal::TwitterId(p) => write!(f, "{}", p),
            Principal::Username(p) => write!(f, "UsernamePrincipal{{username={}}}", p.name()),
        }
    }
}

/// The subject being authenticated and the set of principals asserted about it.
///
/// Principals have set semantics: adding an equal principal twice keeps one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    principals: HashSet<Principal>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a principal, returning false if an equal one was already present.
    pub fn add_principal(&mut self, principal: impl Into<Principal>) -> bool {
        self.principals.insert(principal.into())
    }

    pub fn principals(&self) -> impl Iterator<Item = &Principal> {
        self.principals.iter()
    }

    /// All principals of the given kind.
    pub fn principals_of(&self, kind: PrincipalKind) -> Vec<&Principal> {
        self.principals.iter().filter(|p| p.kind() == kind).collect()
    }

    /// All Twitter id principals, sorted by user id.
    pub fn twitter_id_principals(&self) -> Vec<&TwitterIdPrincipal> {
        let mut found: Vec<_> = self
            .principals
            .iter()
            .filter_map(Principal::as_twitter_id)
            .collect();
        found.sort_by(|a, b| a.user_id().cmp(b.user_id()));
        found
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}
