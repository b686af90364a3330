use http::StatusCode;
use thiserror::Error;

/// Everything the remote API can fail with, as seen by the console.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("{message}")]
    Server {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Validation { status: StatusCode, message: String },
    #[error("{message}")]
    Conflict { message: String },
}

impl ApiError {
    /// Text shown to the user in a notification.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Network(err) => err.status(),
            ApiError::Server { status, .. } => *status,
            ApiError::Validation { status, .. } => Some(*status),
            ApiError::NotFound { .. } | ApiError::Conflict { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Server {
                status: None,
                message: format!("Malformed response from server: {err}"),
            }
        } else {
            ApiError::Network(err)
        }
    }
}

/// How a non-success response is reported for a given operation.
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Server(String),
    NotFound(String),
    Validation(String),
    Conflict(String),
}

impl Failure {
    /// `message` is the server-supplied one, if the body had a usable one.
    pub(crate) fn into_error(self, status: StatusCode, message: Option<String>) -> ApiError {
        match self {
            Failure::Server(fallback) => ApiError::Server {
                status: Some(status),
                message: message.unwrap_or(fallback),
            },
            Failure::NotFound(fallback) => ApiError::NotFound {
                message: message.unwrap_or(fallback),
            },
            Failure::Validation(fallback) => match message {
                Some(message) => ApiError::Validation { status, message },
                None => ApiError::Server {
                    status: Some(status),
                    message: fallback,
                },
            },
            Failure::Conflict(fallback) => ApiError::Conflict {
                message: message.unwrap_or(fallback),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_without_message_is_server_error() {
        let err = Failure::Validation("Failed to create enrollment".into())
            .into_error(StatusCode::BAD_REQUEST, None);
        assert!(matches!(
            err,
            ApiError::Server {
                status: Some(StatusCode::BAD_REQUEST),
                ..
            }
        ));
        assert_eq!(err.message(), "Failed to create enrollment");
    }

    #[test]
    fn test_validation_with_message() {
        let err = Failure::Validation("fallback".into())
            .into_error(StatusCode::BAD_REQUEST, Some("Class 99 not found".into()));
        assert!(matches!(err, ApiError::Validation { .. }));
        assert_eq!(err.message(), "Class 99 not found");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_conflict_falls_back() {
        let err = Failure::Conflict("Failed to delete cultural class".into())
            .into_error(StatusCode::CONFLICT, None);
        assert!(matches!(err, ApiError::Conflict { .. }));
        assert_eq!(err.message(), "Failed to delete cultural class");
    }

    #[test]
    fn test_not_found_prefers_server_message() {
        let err = Failure::NotFound("fallback".into())
            .into_error(StatusCode::NOT_FOUND, Some("No class with id 4".into()));
        assert_eq!(err.message(), "No class with id 4");
    }
}
