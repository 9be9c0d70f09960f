//! Credentials and session state.
//!
//! The server never sees the plaintext password: it expects the MD5 digest
//! rendered as upper-case hex. The session is the value of the
//! `cb-session-id` cookie, owned by a single client instance.

use md5::{Digest, Md5};

/// Name of the cookie carrying the server-issued session id.
pub const SESSION_COOKIE: &str = "cb-session-id";

/// Hash a plaintext password into the wire credential: MD5, upper-case hex.
pub fn hash_password(password: &str) -> String {
    hex::encode_upper(Md5::digest(password.as_bytes()))
}

/// Username plus hashed password, fixed at client construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password_hash: String,
}

impl Credentials {
    /// Hashes `password` immediately; the plaintext is not retained.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash: hash_password(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password_hash.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// The current session token. Empty until a login succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Replace the stored token. Empty candidates are ignored so a response
    /// without a cookie never clears an established session.
    pub fn renew(&mut self, candidate: &str) -> bool {
        if candidate.is_empty() || candidate == self.token {
            return false;
        }
        self.token = candidate.to_string();
        true
    }

    /// `Cookie` header value for the stored token, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.is_authenticated()
            .then(|| format!("{SESSION_COOKIE}={}", self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_uppercase_md5_hex() {
        // md5("secret") = 5ebe2294ecd0e0f08eab7690d2a6ee69
        assert_eq!(hash_password("secret"), "5EBE2294ECD0E0F08EAB7690D2A6EE69");
    }

    #[test]
    fn hash_is_deterministic_and_fixed_length() {
        for password in ["", "a", "correct horse battery staple", "ünïcödé"] {
            let first = hash_password(password);
            let second = hash_password(password);
            assert_eq!(first, second);
            assert_eq!(first.len(), 32);
            assert!(first
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[test]
    fn credentials_hash_on_construction() {
        let creds = Credentials::new("alice", "secret");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password_hash(), hash_password("secret"));
        assert!(creds.is_complete());
    }

    #[test]
    fn credentials_debug_hides_hash() {
        let creds = Credentials::new("alice", "secret");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("alice"));
        assert!(!dbg.contains(creds.password_hash()));
    }

    #[test]
    fn empty_session_has_no_cookie() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.cookie_header(), None);
    }

    #[test]
    fn renew_replaces_token() {
        let mut session = Session::default();
        assert!(session.renew("abc123"));
        assert_eq!(session.cookie_header().as_deref(), Some("cb-session-id=abc123"));
        assert!(!session.renew("abc123"));
        assert!(session.renew("def456"));
        assert_eq!(session.token(), "def456");
    }

    #[test]
    fn renew_ignores_empty_candidate() {
        let mut session = Session::new("abc123");
        assert!(!session.renew(""));
        assert_eq!(session.token(), "abc123");
    }
}
