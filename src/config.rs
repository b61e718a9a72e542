// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! The backends this client talks to differ in a handful of wire details
//! (response envelope, post upload encoding, id placement). Those are
//! collected in [`ApiProfile`] so one client covers all of them.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// File holding the persisted session entries
    pub session_file: PathBuf,
    /// How long a banner stays visible before it is dismissed
    pub banner_dismiss_after: Duration,
    /// Wire-level differences between backend versions
    pub api: ApiProfile,
    /// What to do with toggle responses that arrive out of order
    pub toggle_sequencing: ToggleSequencing,
}

/// Backend wire format switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiProfile {
    pub envelope: Envelope,
    pub post_upload: PostUpload,
    pub register_requires_dob: bool,
    pub post_delete_id: IdPlacement,
    pub comment_like_id: IdPlacement,
}

impl Default for ApiProfile {
    fn default() -> Self {
        Self {
            envelope: Envelope::Wrapped,
            post_upload: PostUpload::Json,
            register_requires_dob: true,
            post_delete_id: IdPlacement::Path,
            comment_like_id: IdPlacement::Path,
        }
    }
}

/// Shape of successful response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{ "success": bool, "data": ..., "message": "..." }`
    Wrapped,
    /// The payload itself.
    Bare,
}

/// Encoding used when creating posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostUpload {
    Json,
    Multipart,
}

/// Where an entity id goes in endpoints that exist in both forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPlacement {
    /// `/resource/{id}`
    Path,
    /// `/resource?x_id={id}`
    Query,
}

/// Handling of toggle responses for the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleSequencing {
    /// Every response is applied; whichever arrives last wins.
    #[default]
    LastResponse,
    /// Only the response to the most recently issued request is applied.
    LatestRequest,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            session_file: PathBuf::from(".social-client/session.json"),
            banner_dismiss_after: Duration::from_secs(5),
            api: ApiProfile::default(),
            toggle_sequencing: ToggleSequencing::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset values fall back to a local
    /// development backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api = ApiProfile {
            envelope: parse_var("API_ENVELOPE", Envelope::Wrapped, |v| match v {
                "wrapped" => Some(Envelope::Wrapped),
                "bare" => Some(Envelope::Bare),
                _ => None,
            })?,
            post_upload: parse_var("POST_UPLOAD", PostUpload::Json, |v| match v {
                "json" => Some(PostUpload::Json),
                "multipart" => Some(PostUpload::Multipart),
                _ => None,
            })?,
            register_requires_dob: parse_var("REGISTER_REQUIRES_DOB", true, parse_bool)?,
            post_delete_id: parse_var("POST_DELETE_ID", IdPlacement::Path, parse_placement)?,
            comment_like_id: parse_var("COMMENT_LIKE_ID", IdPlacement::Path, parse_placement)?,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".social-client/session.json")),
            banner_dismiss_after: Duration::from_secs(parse_var(
                "BANNER_DISMISS_SECS",
                5,
                |v| v.parse().ok(),
            )?),
            api,
            toggle_sequencing: parse_var(
                "TOGGLE_SEQUENCING",
                ToggleSequencing::LastResponse,
                |v| match v {
                    "last-response" => Some(ToggleSequencing::LastResponse),
                    "latest-request" => Some(ToggleSequencing::LatestRequest),
                    _ => None,
                },
            )?,
        })
    }
}

/// Read an optional variable, rejecting values the parser does not accept.
fn parse_var<T>(
    var: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let value = raw.trim().to_ascii_lowercase();
            parse(&value).ok_or(ConfigError::Invalid { var, value: raw })
        }
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_placement(value: &str) -> Option<IdPlacement> {
    match value {
        "path" => Some(IdPlacement::Path),
        "query" => Some(IdPlacement::Query),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
