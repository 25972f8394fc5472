//! Session state shared across back-office screens.
//!
//! Instead of an ambient singleton, auth state is an explicit value:
//! screens hold an [`AuthState`] handle, read the current
//! [`AuthSnapshot`], and subscribe for change notification through a
//! watch channel. Stores and executors under test receive a fixture
//! snapshot rather than global state.

use tokio::sync::watch;
use tracing::warn;

use super::entity::EntityId;
use super::ports::{SessionError, SessionGateway};
use super::user::{Email, UserRole};

/// The authenticated principal as reported by the gateway's auth API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Gateway-assigned user id.
    pub id: EntityId,
    /// Sign-in email address.
    pub email: Email,
    /// Role claim attached to the session token.
    pub role: UserRole,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// The signed-in user, or `None` when signed out.
    pub user: Option<SessionUser>,
    /// `true` while a refresh is in flight.
    pub loading: bool,
}

impl AuthSnapshot {
    /// Snapshot representing a signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    /// Role claim of the signed-in user, if any.
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|user| user.role)
    }

    /// `true` when the signed-in user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self::signed_out()
    }
}

/// Publisher of session snapshots.
///
/// Cloning shares the underlying channel, so all handles observe the
/// same session. Subscribers see every refresh transition, including the
/// intermediate `loading` state.
#[derive(Debug, Clone)]
pub struct AuthState {
    sender: watch::Sender<AuthSnapshot>,
}

impl AuthState {
    /// Create a signed-out auth state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(AuthSnapshot::signed_out());
        Self { sender }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.sender.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.sender.subscribe()
    }

    /// Re-fetch the session from the gateway and publish the result.
    ///
    /// A failed refresh publishes a signed-out snapshot; an unauthorised
    /// answer is the expected signed-out case and is not logged as an
    /// error.
    pub async fn refresh<G: SessionGateway>(&self, gateway: &G) -> AuthSnapshot {
        let retained = self.sender.borrow().user.clone();
        self.sender.send_replace(AuthSnapshot {
            user: retained,
            loading: true,
        });

        let snapshot = match gateway.current_user().await {
            Ok(user) => AuthSnapshot {
                user: Some(user),
                loading: false,
            },
            Err(SessionError::Unauthorized { .. }) => AuthSnapshot::signed_out(),
            Err(error) => {
                warn!(%error, "session refresh failed");
                AuthSnapshot::signed_out()
            }
        };

        self.sender.send_replace(snapshot.clone());
        snapshot
    }

    /// Publish a signed-out snapshot (local sign-out).
    pub fn sign_out(&self) {
        self.sender.send_replace(AuthSnapshot::signed_out());
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureSessionGateway, MockSessionGateway};

    fn admin_user() -> SessionUser {
        SessionUser {
            id: EntityId::random(),
            email: Email::new("ops@example.com").expect("valid email"),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn refresh_publishes_the_signed_in_snapshot() {
        let state = AuthState::new();
        let mut changes = state.subscribe();
        let gateway = FixtureSessionGateway::new(admin_user());

        let snapshot = state.refresh(&gateway).await;
        assert!(snapshot.is_admin());
        assert!(!snapshot.loading);

        changes.changed().await.expect("sender alive");
        assert_eq!(changes.borrow_and_update().role(), Some(UserRole::Admin));
    }

    #[tokio::test]
    async fn unauthorized_refresh_signs_out_quietly() {
        let state = AuthState::new();
        let mut gateway = MockSessionGateway::new();
        gateway
            .expect_current_user()
            .times(1)
            .return_once(|| Err(SessionError::unauthorized("no token")));

        let snapshot = state.refresh(&gateway).await;
        assert_eq!(snapshot, AuthSnapshot::signed_out());
        assert_eq!(state.snapshot().role(), None);
    }

    #[tokio::test]
    async fn transport_failures_sign_out_rather_than_crash() {
        let state = AuthState::new();
        let gateway = FixtureSessionGateway::new(admin_user());
        state.refresh(&gateway).await;

        let mut transport_failure = MockSessionGateway::new();
        transport_failure
            .expect_current_user()
            .times(1)
            .return_once(|| Err(SessionError::transport("socket closed")));

        let snapshot = state.refresh(&transport_failure).await;
        assert_eq!(snapshot, AuthSnapshot::signed_out());
        assert_eq!(state.snapshot(), AuthSnapshot::signed_out());
    }
}
