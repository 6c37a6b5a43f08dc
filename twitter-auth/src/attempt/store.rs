//! Attempt-scoped state storage between the two halves of the handshake.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::*;
use rand::Rng;

use super::AttemptState;

/// An attempt parked while the browser is away at Twitter.
#[derive(Debug)]
struct StoredAttempt {
    state: AttemptState,
    expires_at: DateTime<Utc>,
}

/// Store for in-flight authentication attempts with expiration.
///
/// Each attempt is stored under its own id, so concurrent attempts, including
/// two by the same user, never see each other's handshake state.
#[derive(Debug)]
pub struct AttemptStore {
    attempts: DashMap<String, StoredAttempt>,
    ttl: Duration,
}

impl AttemptStore {
    /// Create a new attempt store with default TTL of 10 minutes.
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(10))
    }

    /// Create a new attempt store with custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            ttl,
        }
    }

    /// Generate a cryptographically random attempt id.
    pub fn generate_id() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        hex::encode(random_bytes)
    }

    /// Park an attempt under its id, replacing any previous state for that id.
    ///
    /// Attempts whose user never came back from Twitter are evicted here, so the
    /// store stays bounded by the attempts started within one TTL.
    pub fn put(&self, state: AttemptState) {
        self.cleanup_expired();
        let expires_at = Utc::now() + self.ttl;
        self.attempts
            .insert(state.id.clone(), StoredAttempt { state, expires_at });
    }

    /// Remove and return an attempt.
    ///
    /// # Returns
    ///
    /// `Some(AttemptState)` if present, `None` if unknown or expired.
    pub fn take(&self, id: &str) -> Option<AttemptState> {
        let (_, stored) = self.attempts.remove(id)?;
        if Utc::now() > stored.expires_at {
            debug!("Attempt {} expired before it was resumed", id);
            return None;
        }
        Some(stored.state)
    }

    /// Whether a live attempt is stored under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.attempts
            .get(id)
            .map(|stored| stored.expires_at >= Utc::now())
            .unwrap_or(false)
    }

    /// Drop every expired attempt.
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.attempts.retain(|_, stored| stored.expires_at > now);
    }

    /// Number of stored attempts, expired ones included until cleaned up.
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl Default for AttemptStore {
    fn default() -> Self {
        Self::new()
    }
}
