use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("No text found in image")]
    NoTextFound,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O failed on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Stored document is corrupt: {message}")]
    Corrupt { message: String },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Gemini API errors
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("No candidates returned from Gemini API")]
    EmptyCandidates,

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Shorthand for a field validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::validation("text", "too short");
        assert_eq!(err.to_string(), "Validation failed: text - too short");

        assert_eq!(AppError::NoTextFound.to_string(), "No text found in image");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Io {
            path: "/tmp/data.json".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "I/O failed on /tmp/data.json: permission denied"
        );

        let err = StorageError::Corrupt {
            message: "expected value at line 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stored document is corrupt: expected value at line 1"
        );
    }

    #[test]
    fn test_gemini_error_display() {
        let err = GeminiError::Unavailable {
            message: "server down".to_string(),
            retries: 3,
        };
        assert_eq!(err.to_string(), "Gemini unavailable: server down (retries: 3)");

        let err = GeminiError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = GeminiError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");

        assert_eq!(
            GeminiError::EmptyCandidates.to_string(),
            "No candidates returned from Gemini API"
        );
    }

    #[test]
    fn test_storage_error_conversion_to_app_error() {
        let storage_err = StorageError::Corrupt {
            message: "bad".to_string(),
        };
        let app_err: AppError = storage_err.into();
        assert!(matches!(app_err, AppError::Storage(_)));
    }

    #[test]
    fn test_gemini_error_conversion_to_app_error() {
        let gemini_err = GeminiError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = gemini_err.into();
        assert!(matches!(app_err, AppError::Gemini(_)));
    }
}
