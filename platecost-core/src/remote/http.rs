//! HTTP client for the remote document store.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Document, MergeMode, RemoteError, RemoteStore};

/// REST client for the document-store API.
///
/// Conventions: `GET collection/id` reads, `POST collection` creates and
/// returns `{"id": ...}`, `PATCH` merges, `PUT` replaces, `POST batchDelete`
/// removes many. Bearer-token auth on every request. Connection failures,
/// auth rejections, and 5xx responses all surface as
/// [`RemoteError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct AddResponse {
    id: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Auth rejections and server-side failures mean "fall back to
        // offline"; everything else is a caller error worth surfacing.
        if status.as_u16() == 401 || status.as_u16() == 403 || status.is_server_error() {
            return Err(RemoteError::Unavailable(format!("status {}", status)));
        }

        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl RemoteStore for HttpRemote {
    async fn get(&self, path: &str) -> Result<Option<Document>, RemoteError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 || status.is_server_error() {
            return Err(RemoteError::Unavailable(format!("status {}", status)));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let doc = response
            .json::<Document>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(Some(doc))
    }

    async fn add(&self, collection: &str, document: &Document) -> Result<String, RemoteError> {
        let response = self
            .send(self.request(reqwest::Method::POST, collection).json(document))
            .await?;

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        debug!(collection, id = %added.id, "added remote document");
        Ok(added.id)
    }

    async fn set(
        &self,
        path: &str,
        document: &Document,
        mode: MergeMode,
    ) -> Result<(), RemoteError> {
        let method = match mode {
            MergeMode::Merge => reqwest::Method::PATCH,
            MergeMode::Replace => reqwest::Method::PUT,
        };
        self.send(self.request(method, path).json(document)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), RemoteError> {
        self.send(self.request(reqwest::Method::DELETE, path)).await?;
        Ok(())
    }

    async fn delete_batch(&self, paths: &[String]) -> Result<(), RemoteError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.send(
            self.request(reqwest::Method::POST, "batchDelete")
                .json(&json!({ "paths": paths })),
        )
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Document>, RemoteError> {
        let mut builder = self.request(reqwest::Method::GET, collection);
        if let Some((field, value)) = filter {
            builder = builder.query(&[(field, value)]);
        }

        let response = self.send(builder).await?;
        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let remote = HttpRemote::new("https://api.example.com/", "key");
        assert_eq!(
            remote.url("/recipes/abc"),
            "https://api.example.com/recipes/abc"
        );
        assert_eq!(
            remote.url("restaurants/r1/ingredients"),
            "https://api.example.com/restaurants/r1/ingredients"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // Discard port on localhost; nothing listens there.
        let remote = HttpRemote::new("http://127.0.0.1:9", "key");
        let err = remote.get("meta/health").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_empty_batch_delete_skips_network() {
        let remote = HttpRemote::new("http://127.0.0.1:9", "key");
        remote.delete_batch(&[]).await.unwrap();
    }
}
