//! OMDb API provider
//!
//! Looks titles up by IMDb id: `GET {api_url}/?i={imdb_id}&apikey={key}`.
//! Every call is bounded by the client timeout and is never retried.

use crate::{
    error::MetadataError,
    models::{ExternalId, MovieMetadata, OmdbResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    /// Creates a new OMDb provider whose requests time out after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, MetadataError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn lookup_url(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }
}

/// Decodes a response body, which must be a JSON object
///
/// Derived `Deserialize` also fills structs from sequences by position, so
/// the shape is checked before the fields are read.
fn decode_response(body: &str) -> Result<OmdbResponse, MetadataError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| MetadataError::Malformed(e.to_string()))?;

    if !value.is_object() {
        return Err(MetadataError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| MetadataError::Malformed(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn fetch_metadata(&self, id: &ExternalId) -> Result<MovieMetadata, MetadataError> {
        let response = self
            .http_client
            .get(self.lookup_url())
            .query(&[("i", id.as_str()), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status()));
        }

        let response_text = response.text().await?;
        tracing::trace!(response = %response_text, "Raw OMDb API response");

        let parsed = decode_response(&response_text).inspect_err(|e| {
            tracing::debug!(
                error = %e,
                external_id = %id,
                "Failed to deserialize OMDb response"
            );
        })?;

        let metadata = MovieMetadata::try_from(parsed)?;

        tracing::debug!(
            external_id = %id,
            has_poster = metadata.poster_url.is_some(),
            provider = "omdb",
            "Metadata fetched"
        );

        Ok(metadata)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves a fake OMDb on an ephemeral port and returns its base URL
    async fn spawn_fake_omdb() -> String {
        async fn lookup(
            Query(params): Query<HashMap<String, String>>,
        ) -> Result<Json<Value>, StatusCode> {
            if params.get("apikey").map(String::as_str) != Some("test_key") {
                return Err(StatusCode::UNAUTHORIZED);
            }

            let body = match params.get("i").map(String::as_str) {
                Some("tt0133093") => json!({
                    "Title": "The Matrix",
                    "Poster": "https://img.example/matrix.jpg",
                    "imdbRating": "8.7",
                    "Response": "True"
                }),
                Some("tt0000001") => json!({ "Title": "Carmencita", "Poster": "N/A", "Response": "True" }),
                Some("tt_garbled") => json!(["not", "an", "object"]),
                _ => json!({ "Response": "False", "Error": "Incorrect IMDb ID." }),
            };
            Ok(Json(body))
        }

        let app = Router::new().route("/", get(lookup));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(api_url: String, api_key: &str) -> OmdbProvider {
        OmdbProvider::new(api_key.to_string(), api_url, Duration::from_secs(5)).unwrap()
    }

    fn id(raw: &str) -> ExternalId {
        ExternalId::parse(raw).unwrap()
    }

    #[test]
    fn test_lookup_url_normalizes_trailing_slash() {
        let p = provider("http://www.omdbapi.com/".to_string(), "k");
        assert_eq!(p.lookup_url(), "http://www.omdbapi.com/");
        assert_eq!(p.name(), "omdb");
    }

    #[tokio::test]
    async fn test_fetch_with_poster() {
        let p = provider(spawn_fake_omdb().await, "test_key");
        let metadata = p.fetch_metadata(&id("tt0133093")).await.unwrap();
        assert_eq!(
            metadata.poster_url.as_deref(),
            Some("https://img.example/matrix.jpg")
        );
    }

    #[tokio::test]
    async fn test_fetch_without_poster() {
        let p = provider(spawn_fake_omdb().await, "test_key");
        let metadata = p.fetch_metadata(&id("tt0000001")).await.unwrap();
        assert_eq!(metadata.poster_url, None);
    }

    #[tokio::test]
    async fn test_rejected_lookup() {
        let p = provider(spawn_fake_omdb().await, "test_key");
        let err = tokio_test::assert_err!(p.fetch_metadata(&id("tt404")).await);
        assert!(matches!(err, MetadataError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let p = provider(spawn_fake_omdb().await, "test_key");
        let err = tokio_test::assert_err!(p.fetch_metadata(&id("tt_garbled")).await);
        assert!(matches!(err, MetadataError::Malformed(_)));
    }

    #[test]
    fn test_positional_array_is_not_a_response() {
        let err = decode_response(r#"["True", "The Matrix", "https://img.example/fake.jpg"]"#)
            .unwrap_err();
        assert!(matches!(err, MetadataError::Malformed(_)));

        let err = decode_response("null").unwrap_err();
        assert!(matches!(err, MetadataError::Malformed(_)));

        let err = decode_response("<html>busy</html>").unwrap_err();
        assert!(matches!(err, MetadataError::Malformed(_)));
    }

    #[test]
    fn test_object_body_decodes() {
        let parsed = decode_response(r#"{"Poster": "https://img.example/a.jpg", "Response": "True"}"#)
            .unwrap();
        assert_eq!(parsed.response, "True");
        assert_eq!(parsed.poster.as_deref(), Some("https://img.example/a.jpg"));
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let p = provider(spawn_fake_omdb().await, "wrong_key");
        match p.fetch_metadata(&id("tt0133093")).await {
            Err(MetadataError::Status(status)) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let p = provider(format!("http://{}", addr), "test_key");
        let result = p.fetch_metadata(&id("tt0133093")).await;
        assert!(matches!(result, Err(MetadataError::Http(_))));
    }
}
