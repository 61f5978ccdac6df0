use async_trait::async_trait;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use plugandtest_portal::auth::{
    AuthError, DemoIdentityProvider, DemoProviderConfig, IdentityProvider, Role, SessionConfig,
    SessionManager, TokenProblem, User,
};
use plugandtest_portal::routing::{route_for, route_for_role, Destination};

fn demo_session() -> Arc<SessionManager> {
    let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig::instant()));
    SessionManager::new(provider, SessionConfig::default())
}

async fn restored_demo_session() -> Arc<SessionManager> {
    let session = demo_session();
    session.restore().await;
    session
}

#[tokio::test]
async fn initializing_until_restore_completes() {
    let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig {
        restore_delay: Duration::from_millis(100),
        latency: Duration::ZERO,
    }));
    let session = SessionManager::start(provider, SessionConfig::default());

    let snapshot = session.snapshot();
    assert!(snapshot.is_initializing);
    assert!(!snapshot.is_authenticated());
    assert_eq!(route_for(&snapshot), Destination::Splash);

    let settled = session.wait_until_initialized().await;
    assert!(!settled.is_initializing);
    assert!(settled.identity.is_none());
    assert_eq!(route_for(&settled), Destination::Login);
}

#[tokio::test]
async fn login_replaces_any_prior_identity() {
    let session = restored_demo_session().await;

    session.login("first@company.com", "pw").await.unwrap();
    let first = session.current_user().unwrap();
    assert!(session.is_authenticated());

    session.login("second@company.com", "pw").await.unwrap();
    let second = session.current_user().unwrap();
    assert_eq!(second.email, "second@company.com");
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let session = restored_demo_session().await;
    let mut changes = session.subscribe();

    assert!(session.logout().await.is_ok());
    assert!(session.logout().await.is_ok());
    assert!(session.snapshot().identity.is_none());
    assert!(!changes.borrow_and_update().is_authenticated());
}

#[tokio::test]
async fn failed_login_keeps_previous_identity() {
    let session = restored_demo_session().await;

    session.login("client@plugandtest.com", "pw").await.unwrap();
    let before = session.snapshot();

    let err = session.login("", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Authentication(_)));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn role_routing_is_exhaustive() {
    assert_eq!(route_for_role(Role::from_str("admin").unwrap()), Destination::AdminDashboard);
    assert_eq!(route_for_role(Role::from_str("client").unwrap()), Destination::ClientTabs);

    let unknown = Role::from_str("superuser").unwrap_err();
    assert_eq!(unknown.0, "superuser");
}

#[tokio::test]
async fn plain_address_signs_in_as_client() {
    let session = restored_demo_session().await;
    session.login("user@company.com", "anypassword").await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.user().map(|u| u.role), Some(Role::Client));
    assert_eq!(route_for(&snapshot), Destination::ClientTabs);
}

#[tokio::test]
async fn admin_address_signs_in_as_admin() {
    let session = restored_demo_session().await;
    session.login("admin@company.com", "anypassword").await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.user().map(|u| u.role), Some(Role::Admin));
    assert!(snapshot.user().is_some_and(|u| u.is_admin()));
    assert_eq!(route_for(&snapshot), Destination::AdminDashboard);
}

#[tokio::test]
async fn invitation_password_then_login() {
    let session = restored_demo_session().await;
    let before = session.snapshot();

    session.create_password("validtoken123", "longenoughpw").await.unwrap();
    // Redeeming a token never signs anyone in
    assert_eq!(session.snapshot(), before);

    session
        .login("newclient@plugandtest.com", "longenoughpw")
        .await
        .unwrap();
    assert_eq!(session.current_user().unwrap().email, "newclient@plugandtest.com");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let session = restored_demo_session().await;
    let err = session
        .create_password("expiredtoken", "longenoughpw")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Token(TokenProblem::Expired));
}

#[tokio::test]
async fn login_then_logout_leaves_nobody_signed_in() {
    let session = restored_demo_session().await;
    session.login("user@company.com", "anypassword").await.unwrap();
    session.logout().await.unwrap();

    let snapshot = session.snapshot();
    assert!(snapshot.identity.is_none());
    assert!(!snapshot.is_authenticated());
}

#[tokio::test]
async fn subscribers_see_login_before_it_resolves() {
    let session = restored_demo_session().await;
    let mut changes = session.subscribe();
    assert!(!changes.has_changed().unwrap());

    session.login("user@company.com", "pw").await.unwrap();
    assert!(changes.has_changed().unwrap());
    assert!(changes.borrow_and_update().is_authenticated());
}

#[tokio::test]
async fn slow_provider_times_out_without_changing_state() {
    let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig {
        restore_delay: Duration::ZERO,
        latency: Duration::from_millis(500),
    }));
    let session = SessionManager::new(
        provider,
        SessionConfig {
            provider_timeout: Duration::from_millis(50),
        },
    );
    session.restore().await;

    let err = session.login("user@company.com", "pw").await.unwrap_err();
    assert!(err.is_timeout());
    assert!(!session.is_authenticated());
}

/// Answers each email after its own delay.
struct StaggeredProvider;

#[async_trait]
impl IdentityProvider for StaggeredProvider {
    async fn verify_credentials(&self, email: &str, _password: &str) -> Result<User, AuthError> {
        let delay = if email.starts_with("slow") { 150 } else { 10 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(User {
            id: email.to_string(),
            email: email.to_string(),
            role: Role::Client,
            name: email.to_string(),
            company: None,
            phone: None,
            created_at: Utc::now(),
        })
    }

    async fn invalidate_session(&self, _user: &User) -> Result<(), AuthError> {
        Ok(())
    }

    async fn redeem_token(&self, _token: &str, _new_password: &str) -> Result<(), AuthError> {
        Err(AuthError::Token(TokenProblem::Invalid))
    }

    async fn restore_session(&self) -> Result<Option<User>, AuthError> {
        Ok(None)
    }
}

#[tokio::test]
async fn racing_logins_apply_in_resolution_order() {
    let session = SessionManager::new(Arc::new(StaggeredProvider), SessionConfig::default());
    session.restore().await;

    let (slow, fast) = tokio::join!(
        session.login("slow@company.com", "pw"),
        session.login("fast@company.com", "pw"),
    );
    assert!(slow.is_ok() && fast.is_ok());

    // The slow call was issued first but resolved last, so it wins
    assert_eq!(session.current_user().unwrap().email, "slow@company.com");
}
