use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::AuthError;
use super::models::{SessionSnapshot, User};
use super::provider::IdentityProvider;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound for any single identity provider call.
    pub provider_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
        }
    }
}

/// Owns the authenticated identity and publishes every change of it.
///
/// State lives in a watch channel whose sender only this type holds, so views
/// can read and subscribe but never write. Provider calls are awaited without
/// any lock held; each completion lands as one atomic write, which means racing
/// logins are applied in the order they resolve.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    config: SessionConfig,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionManager {
    /// Build a manager in the initializing state without starting restore.
    pub fn new(provider: Arc<dyn IdentityProvider>, config: SessionConfig) -> Arc<Self> {
        let (state, _) = watch::channel(SessionSnapshot::initializing());
        Arc::new(Self {
            provider,
            config,
            state,
        })
    }

    /// Build a manager and kick off the session restore in the background.
    pub fn start(provider: Arc<dyn IdentityProvider>, config: SessionConfig) -> Arc<Self> {
        let manager = Self::new(provider, config);
        manager.spawn_restore();
        manager
    }

    pub fn spawn_restore(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.restore().await })
    }

    /// Ask the provider for a leftover session and leave the initializing state.
    /// Restore problems are not fatal: the session simply starts logged out.
    pub async fn restore(&self) {
        let restored = match self
            .call("restore_session", self.provider.restore_session())
            .await
        {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Session restore failed, starting logged out: {}", e);
                None
            }
        };

        match &restored {
            Some(user) => log::info!("Restored session for {}", user.email),
            None => log::debug!("No existing session to restore"),
        }

        self.state.send_modify(|snapshot| {
            if restored.is_some() && snapshot.identity.is_none() {
                snapshot.identity = restored;
            }
            snapshot.is_initializing = false;
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().identity.clone()
    }

    /// Resolve once restore has finished and return the snapshot at that point.
    pub async fn wait_until_initialized(&self) -> SessionSnapshot {
        let mut receiver = self.state.subscribe();
        let settled = match receiver.wait_for(|snapshot| !snapshot.is_initializing).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives as long as `self`, so this arm is unreachable in
            // practice; report whatever state is current.
            Err(_) => self.snapshot(),
        };
        settled
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        log::info!("Login attempt: {}", email);

        let user = self
            .call(
                "verify_credentials",
                self.provider.verify_credentials(email, password),
            )
            .await
            .map_err(|e| {
                let e = e.for_login();
                log::warn!("Login failed for {}: {}", email, e);
                e
            })?;

        log::info!("Signed in {} as {}", user.email, user.role);
        self.state.send_modify(|snapshot| snapshot.identity = Some(user));
        Ok(())
    }

    /// Clear the session. Local state is always cleared, even when the remote
    /// sign-out fails; the failure is still returned to the caller.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let current = self.current_user();

        let remote = match &current {
            Some(user) => self
                .call("invalidate_session", self.provider.invalidate_session(user))
                .await
                .map_err(AuthError::for_logout),
            None => Ok(()),
        };

        self.state.send_modify(|snapshot| snapshot.identity = None);

        match &remote {
            Ok(()) => {
                if let Some(user) = &current {
                    log::info!("Signed out {}", user.email);
                }
            }
            Err(e) => log::error!("Logout error: {}", e),
        }
        remote
    }

    /// Redeem an invitation token for a permanent password. Does not sign in.
    pub async fn create_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        log::info!("Creating password from invitation token");

        self.call("redeem_token", self.provider.redeem_token(token, new_password))
            .await
            .map_err(|e| {
                let e = e.for_token_redemption();
                log::warn!("Create password error: {}", e);
                e
            })
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        let after = self.config.provider_timeout;
        match tokio::time::timeout(after, request).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::Timeout { operation, after }),
        }
    }
}
