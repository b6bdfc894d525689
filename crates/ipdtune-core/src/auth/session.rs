use std::fmt;
use std::sync::RwLock;

/// Cookie name prefix the portal puts in front of the token value
const CSRF_COOKIE_PREFIX: &str = "CSRF-Token=";

/// Opaque token taken verbatim from the portal's `Set-Cookie` header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `X-CSRF-Token` request header: the stored token with a
    /// leading `CSRF-Token=` removed, if there is one.
    pub fn header_value(&self) -> &str {
        self.0.strip_prefix(CSRF_COOKIE_PREFIX).unwrap_or(&self.0)
    }

    /// True if this looks like the portal's CSRF cookie
    pub fn is_csrf_cookie(raw: &str) -> bool {
        raw.starts_with(CSRF_COOKIE_PREFIX)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SessionToken(<empty>)")
        } else {
            f.write_str("SessionToken(<redacted>)")
        }
    }
}

/// Single in-memory holder of the current session token.
/// Empty until an authentication succeeds.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<SessionToken>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current token (empty if never authenticated)
    pub fn token(&self) -> SessionToken {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the stored token
    pub fn store(&self, token: SessionToken) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn clear(&self) {
        self.store(SessionToken::empty());
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_strips_csrf_prefix() {
        assert_eq!(SessionToken::new("CSRF-Token=abc123").header_value(), "abc123");
    }

    #[test]
    fn test_header_value_without_prefix_is_unchanged() {
        assert_eq!(SessionToken::new("xyz").header_value(), "xyz");
        assert_eq!(SessionToken::empty().header_value(), "");
    }

    #[test]
    fn test_header_value_only_strips_leading_prefix() {
        let token = SessionToken::new("a CSRF-Token=b");
        assert_eq!(token.header_value(), "a CSRF-Token=b");
    }

    #[test]
    fn test_session_starts_empty_and_stores() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.token().is_empty());

        session.store(SessionToken::new("CSRF-Token=tok1"));
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_str(), "CSRF-Token=tok1");

        session.store(SessionToken::new("CSRF-Token=tok2"));
        assert_eq!(session.token().header_value(), "tok2");

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", SessionToken::new("CSRF-Token=secret"));
        assert!(!rendered.contains("secret"));
    }
}
