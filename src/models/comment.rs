// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment model.

use super::{empty_as_none, null_as_false, null_as_zero, CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// A comment in an expanded post's comment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub comment_id: CommentId,
    pub post_id: PostId,
    #[serde(alias = "user_id")]
    pub author_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
    #[serde(default, alias = "comment_payload")]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, alias = "likes_nbr", deserialize_with = "null_as_zero")]
    pub likes_count: u32,
    #[serde(
        default,
        alias = "is_liked_by_me",
        alias = "is_liked",
        deserialize_with = "null_as_false"
    )]
    pub is_liked_by_viewer: bool,
}

impl CommentView {
    /// "1 Like" / "3 Likes"
    pub fn likes_label(&self) -> String {
        if self.likes_count == 1 {
            "1 Like".to_string()
        } else {
            format!("{} Likes", self.likes_count)
        }
    }
}
