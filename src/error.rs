// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent user-facing messages.

/// Client error type that converts to a displayable message.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required field is missing. Raised before any request is sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Login or registration was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// An authenticated action was attempted without a session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a failure.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered with a body we could not interpret.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The durable session store could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub const NETWORK_MESSAGE: &'static str = "Network error. Please try again.";
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong. Please try again.";
    pub const LOGIN_REQUIRED_MESSAGE: &'static str = "Please log in to continue.";

    /// Text to show the user for this error.
    ///
    /// Server-supplied messages are surfaced verbatim; everything else gets a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::Auth(msg) => msg.clone(),
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Api { .. } | ClientError::Decode(_) | ClientError::Storage(_) => {
                Self::GENERIC_MESSAGE.to_string()
            }
            ClientError::NotAuthenticated => Self::LOGIN_REQUIRED_MESSAGE.to_string(),
            ClientError::Network(_) => Self::NETWORK_MESSAGE.to_string(),
        }
    }

    /// Re-label a server rejection from an auth endpoint.
    ///
    /// Transport failures stay `Network`; anything else the server said
    /// becomes `Auth` with its message, or `fallback` when it said nothing.
    pub fn into_auth(self, fallback: &str) -> Self {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => ClientError::Auth(message),
            ClientError::Api { .. } | ClientError::Decode(_) => {
                ClientError::Auth(fallback.to_string())
            }
            other => other,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
