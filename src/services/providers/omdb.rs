//! OMDb API provider
//!
//! One request per title: `GET {api_url}/?t={title}&apikey={key}`. OMDb
//! answers 200 for unknown titles too, with `"Response": "False"`.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{MovieLookup, OmdbResponse},
    services::providers::MetadataProvider,
};

const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

/// Failure of a single attempt
enum AttemptError {
    Retryable(AppError),
    Fatal(AppError),
}

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    max_retries: u32,
    backoff: Duration,
}

impl OmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
        max_retries: u32,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            max_retries,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Base delay between attempts; attempt n waits n times this
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn attempt(&self, title: &str) -> Result<MovieLookup, AttemptError> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = AppError::ExternalApi(format!("OMDb API returned status {}: {}", status, body));
            return Err(if status.is_server_error() {
                AttemptError::Retryable(err)
            } else {
                AttemptError::Fatal(err)
            });
        }

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(e.into()))?;

        if let Some(error) = body.error.as_deref() {
            tracing::debug!(title = %title, error = %error, "OMDb returned no match");
        }

        Ok(MovieLookup::from(body))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, title: &str) -> AppResult<MovieLookup> {
        let mut attempt = 0;
        loop {
            match self.attempt(title).await {
                Ok(lookup) => {
                    tracing::info!(
                        title = %title,
                        found = matches!(lookup, MovieLookup::Found(_)),
                        "Fetched metadata from OMDb"
                    );
                    return Ok(lookup);
                }
                Err(AttemptError::Retryable(e)) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "OMDb request failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(AttemptError::Retryable(e)) | Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    /// Serves `app` on an ephemeral local port and returns its base URL
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(url: String, max_retries: u32) -> OmdbProvider {
        OmdbProvider::new("test-key".to_string(), url, Duration::from_secs(2), max_retries)
            .unwrap()
            .with_backoff(Duration::ZERO)
    }

    async fn fake_omdb(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("apikey").map(String::as_str) != Some("test-key") {
            return Json(json!({"Response": "False", "Error": "Invalid API key!"}));
        }
        match params.get("t").map(String::as_str) {
            Some("Inception") => Json(json!({
                "Title": "Inception",
                "Year": "2010",
                "Genre": "Action, Adventure, Sci-Fi",
                "Director": "Christopher Nolan",
                "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt",
                "Plot": "A thief who steals corporate secrets.",
                "Poster": "N/A",
                "Response": "True"
            })),
            _ => Json(json!({"Response": "False", "Error": "Movie not found!"})),
        }
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let url = serve(Router::new().route("/", get(fake_omdb))).await;
        let lookup = provider(url, 0).fetch("Inception").await.unwrap();

        let info = lookup.into_info().unwrap();
        assert_eq!(info.year, "2010");
        assert_eq!(info.director, "Christopher Nolan");
        assert_eq!(info.poster, None);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let url = serve(Router::new().route("/", get(fake_omdb))).await;
        let lookup = provider(url, 0).fetch("Nothing Like This").await.unwrap();
        assert_eq!(lookup, MovieLookup::NotFound);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StatusCode::SERVICE_UNAVAILABLE)
                    } else {
                        Ok(Json(json!({"Response": "False", "Error": "Movie not found!"})))
                    }
                }
            }),
        );
        let url = serve(app).await;

        let lookup = provider(url, 2).fetch("Heat").await.unwrap();
        assert_eq!(lookup, MovieLookup::NotFound);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        );
        let url = serve(app).await;

        let err = provider(url, 1).fetch("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
        let url = serve(app).await;

        let err = provider(url, 3).fetch("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_client_error() {
        // nothing listens on the discard port
        let err = provider("http://127.0.0.1:9".to_string(), 0)
            .fetch("Heat")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }
}
