//! Client for a Supabase project, talking to its PostgREST table API.
//!
//! Columns in the Supabase schema are lowercase (`iscompleted`,
//! `addeddate`, ...). Records are lowercased on the way out; entity decoding
//! accepts both spellings on the way back in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

use super::{Health, RemoteStore, check_response, describe_transport_error, read_json, read_rows};
use crate::entity::Collection;
use crate::error::{GezinError, GezinResult};

const REST_PATH: [&str; 2] = ["rest", "v1"];
const HEALTH_TABLE: Collection = Collection::FamilyMembers;

pub struct SupabaseStore {
    http: reqwest::Client,
    project_url: Url,
}

impl SupabaseStore {
    pub fn new(project_url: &str, api_key: &str, timeout: Duration) -> GezinResult<Self> {
        let project_url = Url::parse(project_url).map_err(|e| {
            GezinError::Config(format!("invalid supabase_url '{project_url}': {e}"))
        })?;

        let key = HeaderValue::from_str(api_key)
            .map_err(|_| GezinError::Config("supabase_key contains invalid characters".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| GezinError::Config("supabase_key contains invalid characters".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GezinError::Config(e.to_string()))?;

        Ok(SupabaseStore { http, project_url })
    }

    /// `<project>/rest/v1/<table>`
    fn table_url(&self, collection: Collection) -> GezinResult<Url> {
        let mut url = self.project_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GezinError::Config(format!("supabase_url '{}' cannot be a base", self.project_url))
            })?
            .pop_if_empty()
            .extend(REST_PATH)
            .push(collection.table_name());
        Ok(url)
    }

    fn row_url(&self, collection: Collection, id: &str) -> GezinResult<Url> {
        let mut url = self.table_url(collection)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }
}

/// Lowercase the top-level keys of a record to match the table columns.
fn to_columns(record: &Value) -> Value {
    match record {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// PostgREST answers writes with an array of affected rows.
fn first_row(body: Value) -> Option<Value> {
    match body {
        Value::Array(rows) => rows.into_iter().next(),
        Value::Null => None,
        row => Some(row),
    }
}

#[async_trait]
impl RemoteStore for SupabaseStore {
    async fn get_data(&self, collection: Collection) -> GezinResult<Vec<Value>> {
        let mut url = self.table_url(collection)?;
        url.query_pairs_mut().append_pair("select", "*");
        tracing::debug!(%url, "select");

        let response = check_response(self.http.get(url).send().await?).await?;
        read_rows(collection, response).await
    }

    async fn insert_data(
        &self,
        collection: Collection,
        record: &Value,
    ) -> GezinResult<Option<Value>> {
        let url = self.table_url(collection)?;
        tracing::debug!(%url, "insert");

        let response = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(&[to_columns(record)])
            .send()
            .await?;
        let response = check_response(response).await?;
        Ok(read_json(collection, response).await?.and_then(first_row))
    }

    async fn update_data(
        &self,
        collection: Collection,
        id: &str,
        fields: &Value,
    ) -> GezinResult<Option<Value>> {
        let url = self.row_url(collection, id)?;
        tracing::debug!(%url, "update");

        let response = self
            .http
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&to_columns(fields))
            .send()
            .await?;
        let response = check_response(response).await?;
        Ok(read_json(collection, response).await?.and_then(first_row))
    }

    async fn delete_data(&self, collection: Collection, id: &str) -> GezinResult<()> {
        let url = self.row_url(collection, id)?;
        tracing::debug!(%url, "delete");

        check_response(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn health_check(&self) -> Health {
        let mut url = match self.table_url(HEALTH_TABLE) {
            Ok(url) => url,
            Err(e) => return Health::failed(e.to_string()),
        };
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("limit", "1");

        match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => Health::ok(),
            Ok(response) => Health::failed(format!(
                "Supabase responded with status {}",
                response.status()
            )),
            Err(e) => Health::failed(describe_transport_error(&e)),
        }
    }
}
