use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Build the value of an `Authorization` header for HTTP Basic auth.
/// Empty username or password are encoded as-is, never skipped.
pub fn authorization_header(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}

/// Device portal login, immutable once constructed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Authorization` header value for these credentials
    pub fn authorization(&self) -> String {
        authorization_header(&self.username, &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        assert_eq!(authorization_header("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_authorization_header_empty_credentials() {
        assert_eq!(authorization_header("", ""), "Basic Og==");
    }

    #[test]
    fn test_credentials_authorization_matches_helper() {
        let creds = Credentials::new("admin", "secret");
        assert_eq!(creds.authorization(), authorization_header("admin", "secret"));
        assert_eq!(creds.username(), "admin");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
