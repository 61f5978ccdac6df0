use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::{AuthError, TokenProblem};
use super::models::{Role, User};
use super::provider::IdentityProvider;

pub const DEMO_CLIENT_ID: &str = "client-001";
pub const DEMO_CLIENT_EMAIL: &str = "client@plugandtest.com";
pub const DEMO_INVITE_TOKEN: &str = "validtoken123";
pub const DEMO_INVITE_EMAIL: &str = "newclient@plugandtest.com";
pub const DEMO_EXPIRED_TOKEN: &str = "expiredtoken";
pub const INVITATION_LIFETIME_DAYS: i64 = 7;

const DEMO_NAME: &str = "Demo User";
const DEMO_COMPANY: &str = "Demo Company Ltd";
const DEMO_PHONE: &str = "+44 123 456 7890";

#[derive(Debug, Clone)]
pub struct DemoProviderConfig {
    /// How long the start-up session check takes before reporting no session.
    pub restore_delay: Duration,
    /// Added to every other call.
    pub latency: Duration,
}

impl Default for DemoProviderConfig {
    fn default() -> Self {
        Self {
            restore_delay: Duration::from_millis(1000),
            latency: Duration::from_millis(300),
        }
    }
}

impl DemoProviderConfig {
    pub fn instant() -> Self {
        Self {
            restore_delay: Duration::ZERO,
            latency: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: Option<String>,
}

#[derive(Debug, Clone)]
struct Invitation {
    email: String,
    name: String,
    company: Option<String>,
    expires_at: DateTime<Utc>,
    redeemed: bool,
}

#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    invitations: HashMap<String, Invitation>,
}

/// Stand-in identity provider used until a hosted one exists. Any non-empty
/// credential pair signs in; addresses containing "admin" get the admin role.
pub struct DemoIdentityProvider {
    config: DemoProviderConfig,
    directory: Mutex<Directory>,
}

impl DemoIdentityProvider {
    pub fn new(config: DemoProviderConfig) -> Self {
        let now = Utc::now();
        let mut directory = Directory::default();

        directory.accounts.insert(
            DEMO_CLIENT_EMAIL.to_string(),
            Account {
                user: User {
                    id: DEMO_CLIENT_ID.to_string(),
                    email: DEMO_CLIENT_EMAIL.to_string(),
                    role: Role::Client,
                    name: DEMO_NAME.to_string(),
                    company: Some(DEMO_COMPANY.to_string()),
                    phone: Some(DEMO_PHONE.to_string()),
                    created_at: now,
                },
                password: None,
            },
        );

        directory.invitations.insert(
            DEMO_INVITE_TOKEN.to_string(),
            Invitation {
                email: DEMO_INVITE_EMAIL.to_string(),
                name: "New Client".to_string(),
                company: Some(DEMO_COMPANY.to_string()),
                expires_at: now + chrono::Duration::days(INVITATION_LIFETIME_DAYS),
                redeemed: false,
            },
        );
        directory.invitations.insert(
            DEMO_EXPIRED_TOKEN.to_string(),
            Invitation {
                email: "lapsed@plugandtest.com".to_string(),
                name: "Lapsed Client".to_string(),
                company: None,
                expires_at: now - chrono::Duration::days(1),
                redeemed: false,
            },
        );

        Self {
            config,
            directory: Mutex::new(directory),
        }
    }

    /// Issue a fresh invitation and return its token.
    pub async fn issue_invitation(
        &self,
        email: &str,
        name: &str,
        valid_for: chrono::Duration,
    ) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut directory = self.directory.lock().await;
        directory.invitations.insert(
            token.clone(),
            Invitation {
                email: email.trim().to_string(),
                name: name.to_string(),
                company: None,
                expires_at: Utc::now() + valid_for,
                redeemed: false,
            },
        );
        log::info!("Issued invitation for {}", email);
        token
    }

    async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    fn role_for(email: &str) -> Role {
        if email.contains("admin") {
            Role::Admin
        } else {
            Role::Client
        }
    }

    fn enroll(email: &str, name: &str, company: Option<String>) -> User {
        User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: Self::role_for(email),
            name: name.to_string(),
            company,
            phone: Some(DEMO_PHONE.to_string()),
            created_at: Utc::now(),
        }
    }
}

impl Default for DemoIdentityProvider {
    fn default() -> Self {
        Self::new(DemoProviderConfig::default())
    }
}

#[async_trait]
impl IdentityProvider for DemoIdentityProvider {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.simulate_latency().await;

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::authentication("email and password are required"));
        }

        let key = email.to_lowercase();
        let mut directory = self.directory.lock().await;

        if let Some(account) = directory.accounts.get(&key) {
            return match &account.password {
                Some(expected) if expected != password => {
                    Err(AuthError::authentication("invalid email or password"))
                }
                _ => Ok(account.user.clone()),
            };
        }

        let user = Self::enroll(email, DEMO_NAME, Some(DEMO_COMPANY.to_string()));
        log::debug!("Enrolled demo account {} as {}", user.email, user.role);
        directory.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: None,
            },
        );
        Ok(user)
    }

    async fn invalidate_session(&self, user: &User) -> Result<(), AuthError> {
        self.simulate_latency().await;
        log::debug!("Demo sign-out for {}", user.email);
        Ok(())
    }

    async fn redeem_token(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.simulate_latency().await;

        let mut directory = self.directory.lock().await;
        let invitation = directory
            .invitations
            .get_mut(token)
            .ok_or(AuthError::Token(TokenProblem::Invalid))?;

        if invitation.redeemed {
            return Err(AuthError::Token(TokenProblem::AlreadyUsed));
        }
        if invitation.expires_at <= Utc::now() {
            return Err(AuthError::Token(TokenProblem::Expired));
        }
        if new_password.is_empty() {
            return Err(AuthError::authentication("password was rejected"));
        }

        invitation.redeemed = true;
        let invitation = invitation.clone();
        let key = invitation.email.to_lowercase();

        match directory.accounts.get_mut(&key) {
            Some(account) => account.password = Some(new_password.to_string()),
            None => {
                let user = Self::enroll(&invitation.email, &invitation.name, invitation.company);
                directory.accounts.insert(
                    key,
                    Account {
                        user,
                        password: Some(new_password.to_string()),
                    },
                );
            }
        }

        log::info!("Password created for {}", invitation.email);
        Ok(())
    }

    async fn restore_session(&self) -> Result<Option<User>, AuthError> {
        if !self.config.restore_delay.is_zero() {
            tokio::time::sleep(self.config.restore_delay).await;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DemoIdentityProvider {
        DemoIdentityProvider::new(DemoProviderConfig::instant())
    }

    #[tokio::test]
    async fn role_follows_admin_substring() {
        let provider = provider();
        let client = provider.verify_credentials("user@company.com", "pw").await.unwrap();
        let admin = provider.verify_credentials("admin@company.com", "pw").await.unwrap();

        assert_eq!(client.role, Role::Client);
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(client.name, "Demo User");
        assert_eq!(client.company.as_deref(), Some("Demo Company Ltd"));
        assert_ne!(client.id, admin.id);
    }

    #[tokio::test]
    async fn repeated_login_keeps_the_same_id() {
        let provider = provider();
        let first = provider.verify_credentials("user@company.com", "a").await.unwrap();
        let second = provider.verify_credentials("USER@company.com", "b").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn seeded_client_owns_fixture_id() {
        let provider = provider();
        let user = provider.verify_credentials(DEMO_CLIENT_EMAIL, "whatever").await.unwrap();
        assert_eq!(user.id, DEMO_CLIENT_ID);
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let provider = provider();
        let err = provider.verify_credentials("", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Authentication(_)));
        let err = provider.verify_credentials("user@company.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Authentication(_)));
    }

    #[tokio::test]
    async fn redeemed_invitation_requires_its_password() {
        let provider = provider();
        provider.redeem_token(DEMO_INVITE_TOKEN, "longenoughpw").await.unwrap();

        let user = provider.verify_credentials(DEMO_INVITE_EMAIL, "longenoughpw").await.unwrap();
        assert_eq!(user.email, DEMO_INVITE_EMAIL);

        let err = provider.verify_credentials(DEMO_INVITE_EMAIL, "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::Authentication(_)));
    }

    #[tokio::test]
    async fn token_problems_are_distinguished() {
        let provider = provider();

        let err = provider.redeem_token("nope", "longenoughpw").await.unwrap_err();
        assert_eq!(err, AuthError::Token(TokenProblem::Invalid));

        let err = provider.redeem_token(DEMO_EXPIRED_TOKEN, "longenoughpw").await.unwrap_err();
        assert_eq!(err, AuthError::Token(TokenProblem::Expired));

        provider.redeem_token(DEMO_INVITE_TOKEN, "longenoughpw").await.unwrap();
        let err = provider.redeem_token(DEMO_INVITE_TOKEN, "longenoughpw").await.unwrap_err();
        assert_eq!(err, AuthError::Token(TokenProblem::AlreadyUsed));
    }

    #[tokio::test]
    async fn issued_invitation_enrolls_admin_by_address() {
        let provider = provider();
        let token = provider
            .issue_invitation("site-admin@plugandtest.com", "Site Admin", chrono::Duration::hours(1))
            .await;
        provider.redeem_token(&token, "correct-horse").await.unwrap();

        let user = provider
            .verify_credentials("site-admin@plugandtest.com", "correct-horse")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.name, "Site Admin");
    }

    #[tokio::test]
    async fn restore_finds_nothing() {
        let provider = provider();
        assert_eq!(provider.restore_session().await.unwrap(), None);
    }
}
