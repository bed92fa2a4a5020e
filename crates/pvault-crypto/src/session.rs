//! Session key lifetime: the derived key lives exactly as long as one
//! authenticated session and is destroyed on lock or inactivity expiry.

use std::time::{Duration, Instant};

use crate::kdf::DerivedKey;

/// Default inactivity timeout before a session locks itself.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// An authenticated session owning the derived key.
///
/// The key is dropped (and zeroized) on [`lock`](Session::lock) or when the
/// inactivity timeout elapses; it cannot be recovered afterwards, only
/// re-derived by authenticating again.
pub struct Session {
    key: Option<DerivedKey>,
    timeout: Duration,
    last_activity: Instant,
}

impl Session {
    pub fn new(key: DerivedKey, timeout: Duration) -> Self {
        Session {
            key: Some(key),
            timeout,
            last_activity: Instant::now(),
        }
    }

    pub fn with_default_timeout(key: DerivedKey) -> Self {
        Self::new(key, DEFAULT_TIMEOUT)
    }

    /// Access the session key, refreshing the activity clock.
    ///
    /// Returns `None` if the session has expired or was locked; an expired
    /// session locks itself on first access.
    pub fn key(&mut self) -> Option<&DerivedKey> {
        if self.is_expired() {
            self.lock();
        }
        if self.key.is_some() {
            self.last_activity = Instant::now();
        }
        self.key.as_ref()
    }

    /// Record user activity without touching the key.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_expired(&self) -> bool {
        self.key.is_some() && self.last_activity.elapsed() > self.timeout
    }

    pub fn is_locked(&self) -> bool {
        self.key.is_none()
    }

    /// Destroy the session key. Dropping the key zeroizes it.
    pub fn lock(&mut self) {
        self.key = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("locked", &self.is_locked())
            .field("timeout", &self.timeout)
            .finish()
    }
}
