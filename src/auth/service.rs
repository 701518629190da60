//! Sign-in, sign-up, sign-out and authorization against a `UserStore`.
//!
//! Passwords are only checked for presence. There is no credential store
//! yet, so any non-blank password is accepted for an existing, active
//! account.

use super::session::{Access, Session, SessionRegistry, SessionState, SessionToken};
use crate::error::{MarketError, Result};
use crate::models::{NewUser, Role, User};
use crate::sources::traits::{SessionPersistence, UserStore};
use chrono::Utc;
use tracing::{debug, info, warn};

pub fn sign_in<S: UserStore>(
    store: &S,
    sessions: &mut SessionRegistry,
    email: &str,
    password: &str,
) -> Result<Session> {
    require("email", email)?;
    require("password", password)?;

    let user = store
        .find_user_by_email(email)
        .ok_or(MarketError::InvalidCredentials)?;

    if user.is_suspended() {
        warn!("Rejected sign-in for suspended account {}", user.id);
        return Err(MarketError::AccountSuspended(user.email));
    }

    let session = sessions.open(&user);
    info!("User {} signed in as {}", user.id, user.role);
    Ok(session)
}

pub fn sign_up<S: UserStore>(
    store: &mut S,
    sessions: &mut SessionRegistry,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<Session> {
    require("name", name)?;
    require("password", password)?;
    if !email.contains('@') {
        return Err(MarketError::Validation(format!(
            "'{}' is not an email address",
            email
        )));
    }
    let role: Role = role.parse()?;

    let user = store.create_user(NewUser {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        role,
    })?;

    let session = sessions.open(&user);
    info!("Registered user {} as {}", user.id, user.role);
    Ok(session)
}

/// Always leaves `state` anonymous; revokes the token if there was one.
pub fn sign_out(sessions: &mut SessionRegistry, state: &mut SessionState) {
    if let SessionState::Authenticated(session) = std::mem::take(state) {
        sessions.revoke(&session.token);
        info!("User {} signed out", session.user.id);
    }
}

/// Resolve the caller behind `state` using the current store record.
///
/// Fails with `Forbidden` for anonymous callers, dead tokens and suspended
/// accounts.
pub fn current_user<S: UserStore>(
    store: &S,
    sessions: &SessionRegistry,
    state: &SessionState,
) -> Result<User> {
    let session = state
        .session()
        .ok_or_else(|| MarketError::Forbidden("sign in required".to_string()))?;

    if !sessions.is_live(&session.token, Utc::now()) {
        return Err(MarketError::Forbidden("session expired".to_string()));
    }

    let user = store
        .find_user(&session.user.id)
        .ok_or_else(|| MarketError::Forbidden("account no longer exists".to_string()))?;

    if user.is_suspended() {
        return Err(MarketError::Forbidden(format!("account {} is suspended", user.id)));
    }
    Ok(user)
}

pub fn authorize<S: UserStore>(
    store: &S,
    sessions: &SessionRegistry,
    state: &SessionState,
    access: Access,
) -> bool {
    let allowed = current_user(store, sessions, state)
        .map(|user| access.admits(&user))
        .unwrap_or(false);
    if !allowed {
        debug!("Denied {:?} for {:?}", access, state.user().map(|u| &u.id));
    }
    allowed
}

/// Store the session token so a later `restore` can resume it.
pub fn persist(state: &SessionState, persistence: &mut dyn SessionPersistence) -> anyhow::Result<()> {
    match state.session() {
        Some(session) => {
            let token = serde_json::to_string(&SessionToken::from(session))?;
            persistence.set(&token)
        }
        None => persistence.clear(),
    }
}

/// Rebuild the session state from whatever the client kept.
///
/// The token is readmitted into `sessions`, so a restarted process resumes
/// it. Anything that does not resolve to a live, non-suspended account
/// yields `Anonymous` and the stale value is cleared.
pub fn restore<S: UserStore>(
    store: &S,
    sessions: &mut SessionRegistry,
    persistence: &mut dyn SessionPersistence,
) -> SessionState {
    let raw = match persistence.get() {
        Ok(Some(raw)) => raw,
        Ok(None) => return SessionState::Anonymous,
        Err(e) => {
            warn!("Could not read stored session: {:#}", e);
            return SessionState::Anonymous;
        }
    };

    let restored = serde_json::from_str::<SessionToken>(&raw)
        .ok()
        .and_then(|stored| {
            let user = store.find_user(&stored.user_id).filter(|u| !u.is_suspended())?;
            let (created_at, expires_at) = sessions.readmit(&stored, Utc::now())?;
            Some(Session {
                token: stored.token,
                user,
                created_at,
                expires_at,
            })
        });

    match restored {
        Some(session) => {
            debug!("Restored session for user {}", session.user.id);
            SessionState::Authenticated(session)
        }
        None => {
            debug!("Discarding stale stored session");
            if let Err(e) = persistence.clear() {
                warn!("Could not clear stored session: {:#}", e);
            }
            SessionState::Anonymous
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MarketError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
