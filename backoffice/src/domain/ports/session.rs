//! Port for the gateway's auth/session API.

use async_trait::async_trait;

use crate::domain::auth::SessionUser;

use super::define_port_error;

define_port_error! {
    /// Failures raised by session adapters.
    pub enum SessionError {
        /// The auth endpoint could not be reached.
        Transport { message: String } => "session transport failed: {message}",
        /// No valid session token was presented.
        Unauthorized { message: String } => "session is not authenticated: {message}",
    }
}

/// Outbound port returning the currently authenticated user, if any.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Fetch the current session's user and role claim.
    async fn current_user(&self) -> Result<SessionUser, SessionError>;
}

/// Deterministic session gateway for tests: always the same admin user.
#[derive(Debug, Clone)]
pub struct FixtureSessionGateway {
    user: SessionUser,
}

impl FixtureSessionGateway {
    /// Create a fixture that answers with `user`.
    pub fn new(user: SessionUser) -> Self {
        Self { user }
    }
}

#[async_trait]
impl SessionGateway for FixtureSessionGateway {
    async fn current_user(&self) -> Result<SessionUser, SessionError> {
        Ok(self.user.clone())
    }
}
