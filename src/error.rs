use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkinError {
    #[error("Failed to fetch '{weapon}': {reason}")]
    Fetch { weapon: String, reason: String },
    #[error("Malformed skin card: {0}")]
    Extract(String),
    #[error("Cannot cover {target} VP: remainder {remaining} exceeds every denomination")]
    Coverage { target: u32, remaining: u32 },
    #[error("Invalid denomination table: {0}")]
    InvalidTable(String),
    #[error("Invalid dataset name: '{0}'")]
    InvalidName(String),
    #[error("Weapon not found: {0}")]
    DatasetNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl axum::response::IntoResponse for SkinError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let (status, message) = match &self {
            SkinError::DatasetNotFound(_) => (StatusCode::NOT_FOUND, "Weapon not found".to_string()),
            SkinError::Coverage { .. } | SkinError::InvalidTable(_) | SkinError::InvalidName(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SkinError>;
