// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single entry point for every HTTP call to the social API.
//!
//! Handles:
//! - Bearer auth and JSON content type on every request
//! - Multipart uploads (content type left to the transport for the boundary)
//! - `204 No Content` from delete endpoints
//! - Response envelope unwrapping and server error messages
//!
//! There are no retries and no timeout: a hung request stays hung.

use crate::config::Envelope;
use crate::error::{ClientError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Request body.
#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Normalized successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// Unwrapped payload (`data` for wrapped envelopes)
    Json(Value),
    /// Raw body, for calls made with `as_json = false`
    Text(String),
    /// 204, or an empty body
    NoContent,
}

impl ParsedBody {
    /// Deserialize the payload. `NoContent` decodes as JSON `null`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let decoded = match self {
            ParsedBody::Json(value) => serde_json::from_value(value),
            ParsedBody::Text(text) => serde_json::from_str(&text),
            ParsedBody::NoContent => serde_json::from_value(Value::Null),
        };
        decoded.map_err(|e| ClientError::Decode(format!("JSON parse error: {}", e)))
    }

    /// Deserialize a list; a missing payload is an empty list.
    pub fn decode_list<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        Ok(self.decode::<Option<Vec<T>>>()?.unwrap_or_default())
    }
}

/// Low-level API client.
#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    envelope: Envelope,
}

impl ApiGateway {
    /// Create a gateway for the given base URL.
    pub fn new(base_url: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            envelope,
        }
    }

    /// Send one request and normalize the response.
    ///
    /// `path` is appended to the base URL and may carry a query string.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Payload,
        as_json: bool,
    ) -> Result<ParsedBody> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path, "API request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::Empty => request.header(CONTENT_TYPE, "application/json"),
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(method = %method, path, error = %e, "API request failed");
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(ParsedBody::NoContent);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_default();
            tracing::debug!(status = %status, path, message = %message, "API rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if !as_json {
            return Ok(ParsedBody::Text(body));
        }
        if body.trim().is_empty() {
            return Ok(ParsedBody::NoContent);
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("JSON parse error: {}", e)))?;
        unwrap_envelope(value, self.envelope, status)
    }
}

/// Strip the response envelope, turning `success: false` into an error.
///
/// The flag is honored even for bare envelopes, since error bodies keep the
/// wrapped shape on every backend version.
pub fn unwrap_envelope(value: Value, envelope: Envelope, status: StatusCode) -> Result<ParsedBody> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message_from_value(&value).unwrap_or_default(),
        });
    }

    match envelope {
        Envelope::Wrapped => match value {
            Value::Object(mut map) if map.contains_key("success") => Ok(ParsedBody::Json(
                map.remove("data").unwrap_or(Value::Null),
            )),
            other => Ok(ParsedBody::Json(other)),
        },
        Envelope::Bare => Ok(ParsedBody::Json(value)),
    }
}

/// Extract a server message from an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    error_message_from_value(&value)
}

fn error_message_from_value(value: &Value) -> Option<String> {
    if let Some(msg) = value.get("message").and_then(Value::as_str) {
        return Some(msg.to_string());
    }

    // FastAPI puts errors under `detail`: a string, an envelope, or a list
    // of validation errors.
    match value.get("detail")? {
        Value::String(msg) => Some(msg.clone()),
        detail @ Value::Object(_) => error_message_from_value(detail),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
