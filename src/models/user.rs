// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User models for the session snapshot and API.

use super::{empty_as_none, null_as_zero, Upload, UserId, PLACEHOLDER_AVATAR};
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// User profile snapshot as returned by login, profile and list endpoints.
///
/// Login responses only carry the id, username, email and picture; the
/// counters then default to zero until a profile fetch replaces the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<String>,
    #[serde(
        default,
        alias = "profile_picture_url",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub posts_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub followers_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub following_count: u32,
    /// Whether the viewer follows this user (profile endpoint only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl UserSummary {
    /// Name to show: the username, or the email for accounts without one.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            self.email.as_deref().unwrap_or("Unknown")
        } else {
            &self.username
        }
    }

    /// Profile picture, or the placeholder avatar.
    pub fn avatar(&self) -> &str {
        self.profile_picture.as_deref().unwrap_or(PLACEHOLDER_AVATAR)
    }
}

/// Fields submitted to `/auth/register`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl RegistrationForm {
    /// Check required fields before anything is sent.
    pub fn validate(&self, require_dob: bool) -> Result<()> {
        let dob_missing = self
            .date_of_birth
            .as_deref()
            .map_or(true, |d| d.trim().is_empty());

        if self.email.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
            || (require_dob && dob_missing)
        {
            return Err(ClientError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }
        Ok(())
    }
}

/// New profile picture: a hosted URL or an uploaded image.
#[derive(Debug, Clone)]
pub enum ProfilePicture {
    Url(String),
    File(Upload),
}
