use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter both email and password")]
    MissingCredentials,

    #[error("Please enter the token from your invitation email")]
    MissingToken,

    #[error("Password must be at least {} characters long", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl FormError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingCredentials | Self::MissingToken => "Error",
            Self::PasswordTooShort => "Weak Password",
            Self::PasswordMismatch => "Password Mismatch",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed email and the password ready for `SessionManager::login`.
    pub fn validate(&self) -> Result<(&str, &str), FormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok((email, &self.password))
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub token: String,
    pub password: String,
    pub confirmation: String,
}

impl PasswordForm {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn is_long_enough(&self) -> bool {
        self.password.chars().count() >= MIN_PASSWORD_LENGTH
    }

    pub fn passwords_match(&self) -> bool {
        !self.password.is_empty() && self.password == self.confirmation
    }

    pub fn validate(&self) -> Result<(&str, &str), FormError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(FormError::MissingToken);
        }
        if !self.is_long_enough() {
            return Err(FormError::PasswordTooShort);
        }
        if self.password != self.confirmation {
            return Err(FormError::PasswordMismatch);
        }
        Ok((token, &self.password))
    }
}
