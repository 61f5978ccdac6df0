use crate::auth::{Role, SessionSnapshot};

/// Top-level screen a session snapshot leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Splash,
    Login,
    AdminDashboard,
    ClientTabs,
}

pub fn route_for(snapshot: &SessionSnapshot) -> Destination {
    if snapshot.is_initializing {
        return Destination::Splash;
    }
    match snapshot.user() {
        None => Destination::Login,
        Some(user) => route_for_role(user.role),
    }
}

pub fn route_for_role(role: Role) -> Destination {
    match role {
        Role::Admin => Destination::AdminDashboard,
        Role::Client => Destination::ClientTabs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use chrono::Utc;

    fn snapshot(role: Option<Role>, is_initializing: bool) -> SessionSnapshot {
        SessionSnapshot {
            identity: role.map(|role| User {
                id: "u1".to_string(),
                email: "someone@company.com".to_string(),
                role,
                name: "Someone".to_string(),
                company: None,
                phone: None,
                created_at: Utc::now(),
            }),
            is_initializing,
        }
    }

    #[test]
    fn initializing_always_shows_splash() {
        assert_eq!(route_for(&snapshot(None, true)), Destination::Splash);
        // a restored identity is not acted on until restore has finished
        assert_eq!(route_for(&snapshot(Some(Role::Admin), true)), Destination::Splash);
    }

    #[test]
    fn roles_map_to_exactly_one_destination() {
        assert_eq!(route_for(&snapshot(None, false)), Destination::Login);
        assert_eq!(
            route_for(&snapshot(Some(Role::Admin), false)),
            Destination::AdminDashboard
        );
        assert_eq!(
            route_for(&snapshot(Some(Role::Client), false)),
            Destination::ClientTabs
        );
    }

    #[test]
    fn unknown_role_never_reaches_routing() {
        assert!("auditor".parse::<Role>().is_err());
    }
}
