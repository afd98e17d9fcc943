//! CRM API-specific error types.

/// Errors that can occur while fetching from the CRM API.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// No session has been started
    #[error("Not signed in: no access token is configured")]
    MissingToken,

    /// Token rejected by the API
    #[error("Session expired or access denied (status {status}); update the access token")]
    Unauthorized { status: u16 },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// API answered with `status: false`
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response is missing an expected field
    #[error("API response is missing '{0}'")]
    MissingField(String),
}

impl CrmError {
    /// Whether the error needs user action on the session rather than a retry.
    ///
    pub fn is_blocking(&self) -> bool {
        matches!(self, CrmError::MissingToken | CrmError::Unauthorized { .. })
    }
}
