//! Login for the single shared household account.

mod session;

pub use session::{AuthSession, SESSION_KEY, SessionState, SessionStorage};

use serde::{Deserialize, Serialize};

use crate::config::GezinConfig;
use crate::error::{GezinError, GezinResult};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be filled in before anything is verified.
    pub fn validate(&self) -> GezinResult<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(GezinError::Validation("Please fill in all fields".into()));
        }
        Ok(())
    }
}

/// The persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub is_authenticated: bool,
}

/// Decides whether a credential pair may log in.
pub trait Authenticator {
    fn verify(&self, credentials: &Credentials) -> GezinResult<User>;
}

/// Accepts exactly one configured username/password pair. Without a
/// configured pair every login fails.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    account: Option<(String, String)>,
}

impl StaticAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        StaticAuthenticator {
            account: Some((username.into(), password.into())),
        }
    }

    pub fn from_config(config: &GezinConfig) -> Self {
        match (&config.username, &config.password) {
            (Some(username), Some(password)) => Self::new(username, password),
            _ => Self::default(),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, credentials: &Credentials) -> GezinResult<User> {
        let Some((username, password)) = &self.account else {
            return Err(GezinError::Config(
                "No login configured. Set `username` and `password` in the config file.".into(),
            ));
        };
        if credentials.username.trim() != username.as_str() || &credentials.password != password {
            return Err(GezinError::InvalidCredentials);
        }
        Ok(User {
            username: username.clone(),
            is_authenticated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        assert!(matches!(
            Credentials::new("admin", "").validate(),
            Err(GezinError::Validation(_))
        ));
        assert!(Credentials::new(" ", "secret").validate().is_err());
        assert!(Credentials::new("admin", "secret").validate().is_ok());
    }

    #[test]
    fn static_authenticator_checks_both_fields() {
        let auth = StaticAuthenticator::new("admin", "secret");

        let user = auth.verify(&Credentials::new("admin", "secret")).unwrap();
        assert!(user.is_authenticated);

        assert!(matches!(
            auth.verify(&Credentials::new("admin", "Secret")),
            Err(GezinError::InvalidCredentials)
        ));
        assert!(auth.verify(&Credentials::new("root", "secret")).is_err());
    }

    #[test]
    fn unconfigured_login_is_a_config_error() {
        let auth = StaticAuthenticator::from_config(&GezinConfig::default());
        assert!(matches!(
            auth.verify(&Credentials::new("admin", "secret")),
            Err(GezinError::Config(_))
        ));
    }

    #[test]
    fn user_record_is_camel_case() {
        let user = User {
            username: "admin".into(),
            is_authenticated: true,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            serde_json::json!({"username": "admin", "isAuthenticated": true})
        );
    }
}
