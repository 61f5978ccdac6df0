use async_trait::async_trait;

use super::error::AuthError;
use super::models::User;

/// External collaborator responsible for credential verification, sign-out,
/// invitation redemption and session restore.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for an identity. Rejections are reported as
    /// `AuthError::Authentication`.
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Tear down the remote side of the session held by `user`.
    async fn invalidate_session(&self, user: &User) -> Result<(), AuthError>;

    /// Turn an out-of-band invitation token into a permanent password.
    async fn redeem_token(&self, token: &str, new_password: &str) -> Result<(), AuthError>;

    /// Look for a session left over from a previous run.
    async fn restore_session(&self) -> Result<Option<User>, AuthError>;
}
