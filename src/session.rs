//! Authentication context shared with the fetch layer.
//!
//! The access token lives in an explicit [`AuthContext`] handle that is
//! passed to the HTTP client instead of ambient global storage. A session
//! is started with a token and ended on sign-out or application exit.

use crate::crm::CrmError;
use chrono::{DateTime, Utc};
use log::*;
use std::sync::{Arc, RwLock};

#[derive(Clone, Debug)]
struct Session {
    token: String,
    started_at: DateTime<Utc>,
}

/// Cloneable handle to the current session, if any.
///
#[derive(Clone, Debug, Default)]
pub struct AuthContext {
    session: Arc<RwLock<Option<Session>>>,
}

impl AuthContext {
    /// Return a context with no active session.
    ///
    pub fn new() -> Self {
        AuthContext::default()
    }

    /// Return a context with a session already started for the token.
    ///
    pub fn with_token(token: &str) -> Self {
        let auth = AuthContext::new();
        auth.start(token);
        auth
    }

    /// Start a session, replacing any previous one. A blank token ends the
    /// session instead.
    ///
    pub fn start(&self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            self.end();
            return;
        }
        debug!("Starting session with access token {}...", mask_token(token));
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *session = Some(Session {
            token: token.to_owned(),
            started_at: Utc::now(),
        });
    }

    /// End the current session.
    ///
    pub fn end(&self) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        if let Some(ended) = session.take() {
            info!(
                "Session started at {} ended after {} min.",
                ended.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
                (Utc::now() - ended.started_at).num_minutes()
            );
        }
    }

    /// Return the token for the active session.
    ///
    pub fn token(&self) -> Result<String, CrmError> {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(CrmError::MissingToken)
    }

    pub fn is_active(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

/// Return the token with everything but the last four characters hidden.
///
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
