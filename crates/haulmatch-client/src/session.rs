//! Explicit session state for backend authentication
//!
//! Single source of truth for the auth token: components never read
//! credentials ad hoc. A 401 from the backend invalidates the session, and
//! subsequent calls fail fast until a new token is installed.

#[derive(Debug, Default, Clone)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: String) -> Self {
        Self { token: Some(token) }
    }

    /// Install a fresh token, replacing any previous one
    pub fn install(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the token; called on any 401 response
    pub fn invalidate(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
