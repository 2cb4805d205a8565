use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Authenticator, Credentials, User};
use crate::error::{GezinError, GezinResult};

/// Key the session record is stored under.
pub const SESSION_KEY: &str = "gezin-app-user";

const STORAGE_FILE: &str = "storage.json";

/// Small key/value JSON file in the platform data directory.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        SessionStorage {
            path: dir.as_ref().join(STORAGE_FILE),
        }
    }

    /// `~/.local/share/gezin/storage.json` on Linux.
    pub fn default_location() -> GezinResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| GezinError::Config("Could not determine data directory".into()))?
            .join("gezin");
        Ok(Self::new(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> GezinResult<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable storage file");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> GezinResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| GezinError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn load_user(&self) -> GezinResult<Option<User>> {
        let Some(value) = self.read_all()?.remove(SESSION_KEY) else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed session record");
                Ok(None)
            }
        }
    }

    pub fn save_user(&self, user: &User) -> GezinResult<()> {
        let mut entries = self.read_all()?;
        let value =
            serde_json::to_value(user).map_err(|e| GezinError::Serialization(e.to_string()))?;
        entries.insert(SESSION_KEY.to_string(), value);
        self.write_all(&entries)
    }

    pub fn clear_user(&self) -> GezinResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(SESSION_KEY).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(User),
}

/// Current login state, persisted across runs.
pub struct AuthSession<A> {
    authenticator: A,
    storage: SessionStorage,
    state: SessionState,
}

impl<A: Authenticator> AuthSession<A> {
    /// Pick up a session saved by an earlier run, if any.
    pub fn restore(authenticator: A, storage: SessionStorage) -> GezinResult<Self> {
        let state = match storage.load_user()? {
            Some(user) if user.is_authenticated => SessionState::Authenticated(user),
            _ => SessionState::Anonymous,
        };
        Ok(AuthSession {
            authenticator,
            storage,
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn require_user(&self) -> GezinResult<&User> {
        self.current_user().ok_or(GezinError::NotAuthenticated)
    }

    /// Verify credentials and persist the session. On failure the state is
    /// left as it was and the error is returned.
    pub fn login(&mut self, credentials: &Credentials) -> GezinResult<&User> {
        credentials.validate()?;
        let user = self.authenticator.verify(credentials).inspect_err(|e| {
            tracing::warn!(username = %credentials.username, error = %e, "login rejected")
        })?;

        self.storage.save_user(&user)?;
        tracing::info!(username = %user.username, "logged in");
        self.state = SessionState::Authenticated(user);
        self.require_user()
    }

    pub fn logout(&mut self) -> GezinResult<()> {
        self.storage.clear_user()?;
        if let SessionState::Authenticated(user) = &self.state {
            tracing::info!(username = %user.username, "logged out");
        }
        self.state = SessionState::Anonymous;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuthenticator;

    fn session(dir: &Path) -> AuthSession<StaticAuthenticator> {
        AuthSession::restore(
            StaticAuthenticator::new("admin", "secret"),
            SessionStorage::new(dir),
        )
        .unwrap()
    }

    #[test]
    fn starts_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path());
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(matches!(
            session.require_user(),
            Err(GezinError::NotAuthenticated)
        ));
    }

    #[test]
    fn wrong_credentials_stay_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        let err = session
            .login(&Credentials::new("admin", "wrong"))
            .unwrap_err();

        assert!(matches!(err, GezinError::InvalidCredentials));
        assert!(!session.is_authenticated());
        assert!(!SessionStorage::new(dir.path()).path().exists());
    }

    #[test]
    fn login_survives_restart_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = session(dir.path());
        first.login(&Credentials::new("admin", "secret")).unwrap();

        let mut second = session(dir.path());
        assert_eq!(second.current_user().unwrap().username, "admin");

        second.logout().unwrap();
        assert!(!second.is_authenticated());
        assert!(!session(dir.path()).is_authenticated());
    }

    #[test]
    fn session_record_uses_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.login(&Credentials::new("admin", "secret")).unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(STORAGE_FILE)).unwrap())
                .unwrap();
        assert_eq!(
            raw[SESSION_KEY],
            serde_json::json!({"username": "admin", "isAuthenticated": true})
        );
    }

    #[test]
    fn unreadable_storage_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "not json").unwrap();
        assert!(!session(dir.path()).is_authenticated());
    }
}
