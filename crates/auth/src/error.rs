use marches_core::error::CoreError;

pub const BAD_CREDENTIALS_MESSAGE: &str = "Email ou mot de passe incorrect";

/// Errors from the auth service REST layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Auth service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx body did not have the expected shape.
    #[error("Unexpected auth service response: {0}")]
    Decode(String),
}

impl AuthApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthApiError::Api { status, .. } => Some(*status),
            AuthApiError::Request(e) => e.status().map(|s| s.as_u16()),
            AuthApiError::Decode(_) => None,
        }
    }

    /// Build an [`AuthApiError::Api`] from a raw error body.
    ///
    /// The service reports messages under several keys depending on the
    /// endpoint (`msg`, `message`, `error_description`, `error`).
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["msg", "message", "error_description", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());
        AuthApiError::Api { status, message }
    }

    /// Map a failed sign-in or refresh. Rejected credentials and rejected
    /// refresh tokens both come back as 400/401 and are reported as one
    /// generic message.
    pub fn into_credentials_error(self) -> CoreError {
        match self.status() {
            Some(400) | Some(401) => CoreError::Unauthorized(BAD_CREDENTIALS_MESSAGE.into()),
            _ => CoreError::from(self),
        }
    }
}

impl From<AuthApiError> for CoreError {
    fn from(err: AuthApiError) -> Self {
        match &err {
            AuthApiError::Api { status, message } => match status {
                401 | 403 => CoreError::Unauthorized(message.clone()),
                400 | 422 => CoreError::Validation(message.clone()),
                409 => CoreError::Conflict(message.clone()),
                _ => CoreError::Upstream(err.to_string()),
            },
            _ => CoreError::Upstream(err.to_string()),
        }
    }
}
