// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the social API.

pub mod comment;
pub mod ids;
pub mod post;
pub mod responses;
pub mod user;

pub use comment::CommentView;
pub use ids::{CommentId, PostId, UserId};
pub use post::{NewPost, PostMedia, PostView, Upload};
pub use responses::{FollowToggle, LikeToggle, LoginData, OneOrMany};
pub use user::{ProfilePicture, RegistrationForm, UserSummary};

/// Avatar shown for users without a profile picture.
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/40";

/// Treat empty strings from the server as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Accept `null` for counters.
pub(crate) fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Accept `null` for flags.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
