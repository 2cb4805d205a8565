//! Remote store clients.
//!
//! A [`RemoteStore`] knows how to list, insert, update and delete raw JSON
//! records in a named [`Collection`]. Each call maps onto exactly one
//! request; there is no batching, paging or retrying here.

mod memory;
mod rest;
mod supabase;

#[cfg(test)]
pub(crate) mod stub;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Backend, GezinConfig};
use crate::entity::Collection;
use crate::error::{GezinError, GezinResult};

/// Outcome of a connectivity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Health {
    pub fn ok() -> Self {
        Health {
            ok: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Health {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every record in the collection.
    async fn get_data(&self, collection: Collection) -> GezinResult<Vec<Value>>;

    /// Insert one record. Returns the stored representation when the
    /// backend sends one back.
    async fn insert_data(&self, collection: Collection, record: &Value)
    -> GezinResult<Option<Value>>;

    /// Overwrite the record with `id` using `fields`.
    async fn update_data(
        &self,
        collection: Collection,
        id: &str,
        fields: &Value,
    ) -> GezinResult<Option<Value>>;

    async fn delete_data(&self, collection: Collection, id: &str) -> GezinResult<()>;

    /// Whether the backend answers at all.
    async fn health_check(&self) -> Health;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    async fn get_data(&self, collection: Collection) -> GezinResult<Vec<Value>> {
        (**self).get_data(collection).await
    }

    async fn insert_data(
        &self,
        collection: Collection,
        record: &Value,
    ) -> GezinResult<Option<Value>> {
        (**self).insert_data(collection, record).await
    }

    async fn update_data(
        &self,
        collection: Collection,
        id: &str,
        fields: &Value,
    ) -> GezinResult<Option<Value>> {
        (**self).update_data(collection, id, fields).await
    }

    async fn delete_data(&self, collection: Collection, id: &str) -> GezinResult<()> {
        (**self).delete_data(collection, id).await
    }

    async fn health_check(&self) -> Health {
        (**self).health_check().await
    }
}

/// Build the store selected by the configuration.
pub fn connect(config: &GezinConfig) -> GezinResult<Box<dyn RemoteStore>> {
    match config.backend {
        Backend::Rest => Ok(Box::new(RestStore::new(&config.api_url, config.timeout())?)),
        Backend::Supabase => {
            let url = config.supabase_url.as_deref().ok_or_else(|| {
                GezinError::Config("backend is 'supabase' but supabase_url is not set".into())
            })?;
            let key = config.supabase_key.as_deref().ok_or_else(|| {
                GezinError::Config("backend is 'supabase' but supabase_key is not set".into())
            })?;
            Ok(Box::new(SupabaseStore::new(url, key, config.timeout())?))
        }
    }
}

/// Turn a non-success response into [`GezinError::Remote`], preferring the
/// backend's own error message when the body carries one.
pub(crate) async fn check_response(response: reqwest::Response) -> GezinResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GezinError::Remote {
        status: status.as_u16(),
        message: error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    })
}

/// Pull a readable message out of a JSON error body (`detail` from FastAPI,
/// `message` from PostgREST) or fall back to the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(Value::String(msg)) = map.get(key) {
                return Some(msg.clone());
            }
        }
    }
    Some(body.to_string())
}

/// Read a JSON body. An empty body means the backend sent no representation.
pub(crate) async fn read_json(
    collection: Collection,
    response: reqwest::Response,
) -> GezinResult<Option<Value>> {
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| GezinError::Decode {
            collection,
            message: e.to_string(),
        })
}

/// Read a JSON array of records.
pub(crate) async fn read_rows(
    collection: Collection,
    response: reqwest::Response,
) -> GezinResult<Vec<Value>> {
    match read_json(collection, response).await? {
        Some(Value::Array(rows)) => Ok(rows),
        _ => Err(GezinError::Decode {
            collection,
            message: "expected a list of records".into(),
        }),
    }
}

/// Explain a transport-level failure for the connectivity check.
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out. The backend may be down or unreachable.".to_string()
    } else if err.is_connect() {
        "Could not reach the backend. The server may be down, or the host/port is unreachable."
            .to_string()
    } else {
        format!("Request error: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"Task not found"}"#).as_deref(),
            Some("Task not found")
        );
        assert_eq!(
            error_message(r#"{"code":"42P01","message":"relation does not exist"}"#).as_deref(),
            Some("relation does not exist")
        );
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("  "), None);
    }
}
