use serde::{Deserialize, Serialize};

/// Which form the auth page is showing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    /// Flip in place.
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Login => "LOGIN",
            AuthMode::Signup => "SIGNUP",
        }
    }
}

/// Authenticated user info (safe to send to the client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}

/// Signup request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct RegisterRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Name is required"))
    )]
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_login() {
        assert_eq!(AuthMode::default(), AuthMode::Login);
    }

    #[test]
    fn toggled_flips_between_modes() {
        assert_eq!(AuthMode::Login.toggled(), AuthMode::Signup);
        assert_eq!(AuthMode::Signup.toggled(), AuthMode::Login);
    }

    #[test]
    fn each_toggle_flips_exactly_once() {
        let mut mode = AuthMode::Login;
        mode.toggle();
        assert_eq!(mode, AuthMode::Signup);
        mode.toggle();
        assert_eq!(mode, AuthMode::Login);
    }

    #[test]
    fn as_str_matches_wire_names() {
        assert_eq!(AuthMode::Login.as_str(), "LOGIN");
        assert_eq!(AuthMode::Signup.as_str(), "SIGNUP");
    }
}
