use crate::models::{Role, User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A signed-in binding between a client and a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    /// User record as of sign-in; authorization re-reads the store
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(session) => Some(session),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

impl From<Session> for SessionState {
    fn from(session: Session) -> Self {
        SessionState::Authenticated(session)
    }
}

/// What a protected view or action demands of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in, non-suspended user
    Dashboard,
    /// Exactly this role
    Role(Role),
}

impl Access {
    pub const ADMIN: Access = Access::Role(Role::Admin);

    pub fn admits(&self, user: &User) -> bool {
        if user.is_suspended() {
            return false;
        }
        match self {
            Access::Dashboard => true,
            Access::Role(role) => user.role == *role,
        }
    }
}

/// Wire form of a session kept by the client between page loads.
///
/// Carries its own lifetime so a restarted registry can readmit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionToken {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token,
            user_id: session.user.id.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
struct LiveSession {
    user_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Server-side record of which tokens are still valid
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    live: HashMap<Uuid, LiveSession>,
    /// Signed-out tokens, kept until they would have expired anyway
    revoked: HashMap<Uuid, DateTime<Utc>>,
    /// Tokens issued to a user at or before this instant are dead
    revoked_before: HashMap<String, DateTime<Utc>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            live: HashMap::new(),
            revoked: HashMap::new(),
            revoked_before: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn open(&mut self, user: &User) -> Session {
        self.open_at(user, Utc::now())
    }

    pub fn open_at(&mut self, user: &User, now: DateTime<Utc>) -> Session {
        self.purge_expired(now);

        let token = Uuid::new_v4();
        let expires_at = self.expiry_for(now);
        self.live.insert(
            token,
            LiveSession {
                user_id: user.id.clone(),
                created_at: now,
                expires_at,
            },
        );
        Session {
            token,
            user: user.clone(),
            created_at: now,
            expires_at,
        }
    }

    /// Token is known, unrevoked and unexpired at `now`
    pub fn is_live(&self, token: &Uuid, now: DateTime<Utc>) -> bool {
        self.live.get(token).is_some_and(|s| now < s.expires_at)
    }

    /// Take back a token the client kept across a restart.
    ///
    /// The stored expiry is trusted only up to `created_at + ttl`. Tokens
    /// revoked here, or issued before the user's sessions were revoked, stay
    /// dead. Returns the token's creation and effective expiry.
    pub fn readmit(
        &mut self,
        stored: &SessionToken,
        now: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if let Some(live) = self.live.get(&stored.token) {
            return (live.user_id == stored.user_id && now < live.expires_at)
                .then_some((live.created_at, live.expires_at));
        }
        if self.revoked.contains_key(&stored.token) || stored.created_at > now {
            return None;
        }
        if self
            .revoked_before
            .get(&stored.user_id)
            .is_some_and(|cutoff| stored.created_at <= *cutoff)
        {
            return None;
        }

        let expires_at = stored.expires_at.min(self.expiry_for(stored.created_at));
        if now >= expires_at {
            return None;
        }
        self.live.insert(
            stored.token,
            LiveSession {
                user_id: stored.user_id.clone(),
                created_at: stored.created_at,
                expires_at,
            },
        );
        Some((stored.created_at, expires_at))
    }

    pub fn revoke(&mut self, token: &Uuid) -> bool {
        match self.live.remove(token) {
            Some(session) => {
                self.revoked.insert(*token, session.expires_at);
                true
            }
            None => false,
        }
    }

    /// Drop every token held by `user_id`, returning how many were live
    pub fn revoke_user(&mut self, user_id: &str) -> usize {
        self.revoked_before.insert(user_id.to_string(), Utc::now());
        let before = self.live.len();
        self.live.retain(|_, s| s.user_id != user_id);
        before - self.live.len()
    }

    /// Forget expired tokens, returning how many live ones were dropped
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        self.revoked.retain(|_, expires_at| now < *expires_at);
        let before = self.live.len();
        self.live.retain(|_, s| now < s.expires_at);
        before - self.live.len()
    }

    fn expiry_for(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
