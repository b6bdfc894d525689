use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unauthorized - credentials rejected or token expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication response carried no Set-Cookie header")]
    MissingToken,

    #[error("Invalid device URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("An IPD update is already in flight")]
    Busy,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True when the HTTP exchange itself failed (refused, DNS, TLS, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ApiError::Busy)
    }

    /// Message plus every underlying cause, e.g. the OS-level
    /// "Connection refused" behind a failed send.
    pub fn description(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !text.contains(&cause_text) {
                text.push_str(": ");
                text.push_str(&cause_text);
            }
            source = cause.source();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_auth_rejection() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "bad token"),
            ApiError::AccessDenied(ref body) if body == "bad token"
        ));
    }

    #[test]
    fn test_from_status_server_and_other() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "down"),
            ApiError::ServerError(_)
        ));
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(err.to_string(), "Invalid response: Status 400 Bad Request: nope");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        match ApiError::from_status(StatusCode::NOT_FOUND, &body) {
            ApiError::NotFound(msg) => {
                assert!(msg.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
                assert!(msg.ends_with("(truncated, 520 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_description_without_cause_is_display() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "down");
        assert_eq!(err.description(), err.to_string());
        assert_eq!(ApiError::Unauthorized.description(), ApiError::Unauthorized.to_string());
    }

    #[test]
    fn test_busy_is_not_transport() {
        assert!(ApiError::Busy.is_busy());
        assert!(!ApiError::Busy.is_transport());
        assert!(!ApiError::Unauthorized.is_transport());
    }
}
