pub mod demo_provider;
pub mod error;
pub mod forms;
pub mod models;
pub mod provider;
pub mod session;

pub use demo_provider::{DemoIdentityProvider, DemoProviderConfig, INVITATION_LIFETIME_DAYS};
pub use error::{AuthError, TokenProblem};
pub use forms::{FormError, LoginForm, PasswordForm, MIN_PASSWORD_LENGTH};
pub use models::*;
pub use provider::IdentityProvider;
pub use session::{SessionConfig, SessionManager};
