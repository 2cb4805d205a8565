//! Client for the REST backend (`/api/<resource>` with GET/POST/PUT/DELETE).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{Health, RemoteStore, check_response, describe_transport_error, read_json, read_rows};
use crate::entity::Collection;
use crate::error::{GezinError, GezinResult};

pub struct RestStore {
    http: reqwest::Client,
    base_url: Url,
}

impl RestStore {
    pub fn new(base_url: &str, timeout: Duration) -> GezinResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GezinError::Config(format!("invalid api_url '{base_url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GezinError::Config(e.to_string()))?;

        Ok(RestStore { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/api/<resource>[/<id>]`
    fn url(&self, collection: Collection, id: Option<&str>) -> GezinResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GezinError::Config(format!("api_url '{}' cannot be a base", self.base_url)))?;
            segments.pop_if_empty().extend(["api", collection.resource_path()]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn get_data(&self, collection: Collection) -> GezinResult<Vec<Value>> {
        let url = self.url(collection, None)?;
        tracing::debug!(%url, "GET");

        let response = check_response(self.http.get(url).send().await?).await?;
        read_rows(collection, response).await
    }

    async fn insert_data(
        &self,
        collection: Collection,
        record: &Value,
    ) -> GezinResult<Option<Value>> {
        let url = self.url(collection, None)?;
        tracing::debug!(%url, "POST");

        let response = check_response(self.http.post(url).json(record).send().await?).await?;
        read_json(collection, response).await
    }

    async fn update_data(
        &self,
        collection: Collection,
        id: &str,
        fields: &Value,
    ) -> GezinResult<Option<Value>> {
        let url = self.url(collection, Some(id))?;
        tracing::debug!(%url, "PUT");

        let response = check_response(self.http.put(url).json(fields).send().await?).await?;
        read_json(collection, response).await
    }

    async fn delete_data(&self, collection: Collection, id: &str) -> GezinResult<()> {
        let url = self.url(collection, Some(id))?;
        tracing::debug!(%url, "DELETE");

        check_response(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn health_check(&self) -> Health {
        match self.http.get(self.base_url.clone()).send().await {
            Ok(response) if response.status().is_success() => Health::ok(),
            Ok(response) => Health::failed(format!(
                "Server responded with status {}",
                response.status()
            )),
            Err(e) => Health::failed(describe_transport_error(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_data::AppData;
    use crate::entity::{FamilyMember, MemberType, NewFamilyMember};
    use crate::store::stub::{respond, serve};

    fn store(base: &str) -> RestStore {
        RestStore::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn builds_resource_urls() {
        let store = store("http://localhost:8000");
        assert_eq!(
            store.url(Collection::FamilyMembers, None).unwrap().as_str(),
            "http://localhost:8000/api/family-members"
        );
        assert_eq!(
            store.url(Collection::Tasks, Some("42")).unwrap().as_str(),
            "http://localhost:8000/api/tasks/42"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let store = store("http://nas.local:8000/gezin/");
        assert_eq!(
            store.url(Collection::ShoppingItems, Some("a b")).unwrap().as_str(),
            "http://nas.local:8000/gezin/api/shopping-items/a%20b"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            RestStore::new("not a url", Duration::from_secs(1)),
            Err(GezinError::Config(_))
        ));
    }

    #[tokio::test]
    async fn create_answered_with_no_content_keeps_local_record() {
        let (base, server) = serve(vec![respond("204 No Content", "")]).await;
        let mut app = AppData::new(store(&base));

        let anna = app
            .add::<FamilyMember>(NewFamilyMember::new("Anna", MemberType::Child))
            .await
            .unwrap();

        assert_eq!(app.records::<FamilyMember>(), [anna.clone()]);
        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/api/family-members");
        assert_eq!(requests[0].json()["id"], anna.id.as_str());
        assert_eq!(requests[0].json()["name"], "Anna");
    }

    #[tokio::test]
    async fn insert_returns_server_representation() {
        let body = r#"{"id":"srv-1","name":"Milk"}"#;
        let (base, server) = serve(vec![respond("201 Created", body)]).await;

        let stored = store(&base)
            .insert_data(Collection::ShoppingItems, &serde_json::json!({"name": "Milk"}))
            .await
            .unwrap();

        assert_eq!(stored, Some(serde_json::json!({"id": "srv-1", "name": "Milk"})));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn update_with_empty_body_has_no_representation() {
        let (base, server) = serve(vec![respond("200 OK", "")]).await;

        let stored = store(&base)
            .update_data(Collection::Tasks, "42", &serde_json::json!({"title": "Dishes"}))
            .await
            .unwrap();

        assert_eq!(stored, None);
        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].target, "/api/tasks/42");
        assert_eq!(requests[0].json()["title"], "Dishes");
    }

    #[tokio::test]
    async fn error_status_carries_backend_detail() {
        let body = r#"{"detail":"Task not found"}"#;
        let (base, server) = serve(vec![respond("404 Not Found", body)]).await;

        let err = store(&base)
            .delete_data(Collection::Tasks, "42")
            .await
            .unwrap_err();

        match err {
            GezinError::Remote { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Task not found");
            }
            other => panic!("expected a remote error, got {other:?}"),
        }
        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].target, "/api/tasks/42");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base, server) = serve(vec![
            respond("200 OK", "<html>oops</html>"),
            respond("200 OK", r#"{"items":[]}"#),
        ])
        .await;
        let store = store(&base);

        let err = store
            .insert_data(Collection::Meals, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GezinError::Decode { collection: Collection::Meals, .. }));

        let err = store.get_data(Collection::Meals).await.unwrap_err();
        assert!(matches!(err, GezinError::Decode { collection: Collection::Meals, .. }));
        server.await.unwrap();
    }
}
