use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Parse error in {field} of '{title}': {message}")]
    Parse {
        title: String,
        field: &'static str,
        message: String,
    },

    #[error("Schema error in {field} of '{title}': {message}")]
    Schema {
        title: String,
        field: &'static str,
        message: String,
    },

    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("no such title: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::HttpClient(_) | AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Parse { .. }
            | AppError::Schema { .. }
            | AppError::EmptyCorpus
            | AppError::Dataset(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_title() {
        let err = AppError::NotFound("Avatar 3".to_string());
        assert_eq!(err.to_string(), "no such title: Avatar 3");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_build_errors_are_server_errors() {
        let schema = AppError::Schema {
            title: "Heat".to_string(),
            field: "crew",
            message: "entry 0 is missing \"job\"".to_string(),
        };
        assert!(schema.status_code().is_server_error());
        assert!(AppError::EmptyCorpus.status_code().is_server_error());
    }

    #[test]
    fn test_query_rejection_is_invalid_input() {
        use axum::extract::Query;
        use std::collections::HashMap;

        let uri: axum::http::Uri = "/recommendations?k=abc".parse().unwrap();
        let rejection = Query::<HashMap<String, usize>>::try_from_uri(&uri).unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid input: "));
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = AppError::Unavailable("enrichment disabled".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
