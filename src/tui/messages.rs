use crate::auth::{AuthError, FormError, TokenProblem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A dismissable message box. The session core never presents anything
/// itself; screens turn its errors into one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn coming_soon() -> Self {
        Self::info("Coming Soon", "This feature will be available soon")
    }
}

impl From<&FormError> for Notice {
    fn from(err: &FormError) -> Self {
        Notice::error(err.title(), err.to_string())
    }
}

fn timeout_notice() -> Notice {
    Notice::error(
        "Connection Problem",
        "The server took too long to respond. Please try again.",
    )
}

pub fn login_failure(err: &AuthError) -> Notice {
    match err {
        AuthError::Timeout { .. } => timeout_notice(),
        _ => Notice::error(
            "Login Failed",
            "Invalid email or password. Please try again.",
        ),
    }
}

pub fn create_password_failure(err: &AuthError) -> Notice {
    match err {
        AuthError::Token(TokenProblem::Invalid) => Notice::error(
            "Invalid Link",
            "This setup link is not valid. Please check the link in your email.",
        ),
        AuthError::Token(TokenProblem::Expired) => Notice::error(
            "Link Expired",
            "This setup link has expired. Please contact Plug And Test for a new one.",
        ),
        AuthError::Token(TokenProblem::AlreadyUsed) => Notice::error(
            "Link Already Used",
            "This setup link has already been used. Sign in with your password instead.",
        ),
        AuthError::Timeout { .. } => timeout_notice(),
        _ => Notice::error("Error", "Failed to create password. Please try again."),
    }
}

pub fn logout_failure(err: &AuthError) -> Notice {
    match err {
        AuthError::Timeout { .. } => Notice::error(
            "Signed Out",
            "You have been signed out on this device, but the server did not respond in time.",
        ),
        _ => Notice::error(
            "Signed Out",
            "You have been signed out on this device, but the server could not be reached.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn every_token_problem_gets_its_own_message() {
        let titles: Vec<String> = [
            TokenProblem::Invalid,
            TokenProblem::Expired,
            TokenProblem::AlreadyUsed,
        ]
        .into_iter()
        .map(|p| create_password_failure(&AuthError::Token(p)).title)
        .collect();
        assert_eq!(titles, ["Invalid Link", "Link Expired", "Link Already Used"]);
    }

    #[test]
    fn timeouts_are_reported_as_connection_problems() {
        let err = AuthError::Timeout {
            operation: "verify_credentials",
            after: Duration::from_secs(10),
        };
        assert_eq!(login_failure(&err).title, "Connection Problem");
        assert_eq!(
            login_failure(&AuthError::authentication("nope")).text,
            "Invalid email or password. Please try again."
        );
    }

    #[test]
    fn form_errors_keep_their_titles() {
        let notice = Notice::from(&FormError::PasswordTooShort);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Weak Password");
    }
}
