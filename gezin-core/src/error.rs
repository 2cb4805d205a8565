//! Error types for the gezin data layer.

use thiserror::Error;

use crate::entity::Collection;

/// Errors that can occur in gezin operations.
#[derive(Error, Debug)]
pub enum GezinError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not reach the remote store: {0}")]
    Transport(String),

    #[error("Remote store responded with status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Could not decode {collection} record: {message}")]
    Decode {
        collection: Collection,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Not logged in. Run `gezin login` first.")]
    NotAuthenticated,

    #[error("Loading {0} failed")]
    Load(Collection, #[source] Box<GezinError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for GezinError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return GezinError::Serialization(err.to_string());
        }
        match err.status() {
            Some(status) => GezinError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => GezinError::Transport(err.to_string()),
        }
    }
}

/// Result type alias for gezin operations.
pub type GezinResult<T> = Result<T, GezinError>;
