// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post model for feed, explore and profile lists.

use super::{empty_as_none, null_as_false, null_as_zero, PostId, UserId, UserSummary};
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// A post as displayed in one of the lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: PostId,
    #[serde(alias = "user_id")]
    pub author_id: UserId,
    /// Author snapshot, when the list endpoint embeds one
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummary>,
    #[serde(default)]
    pub content: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, alias = "likes_nbr", deserialize_with = "null_as_zero")]
    pub likes_count: u32,
    #[serde(default, alias = "comments_nbr", deserialize_with = "null_as_zero")]
    pub comments_count: u32,
    #[serde(
        default,
        alias = "is_liked_by_me",
        alias = "is_liked",
        deserialize_with = "null_as_false"
    )]
    pub is_liked_by_viewer: bool,
}

impl PostView {
    /// Author name, or "Unknown" when the list did not embed the author.
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(UserSummary::display_name)
            .unwrap_or("Unknown")
    }
}

/// Raw file attached to a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Media attached to a new post.
#[derive(Debug, Clone)]
pub enum PostMedia {
    Url(String),
    File(Upload),
}

/// Contents of the post composer.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub content: String,
    pub media: Option<PostMedia>,
}

impl NewPost {
    /// Text-only post.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media: None,
        }
    }

    /// Trim the inputs; a blank media URL counts as no media.
    pub fn normalized(self) -> Self {
        let media = match self.media {
            Some(PostMedia::Url(url)) if url.trim().is_empty() => None,
            Some(PostMedia::Url(url)) => Some(PostMedia::Url(url.trim().to_string())),
            other => other,
        };
        Self {
            content: self.content.trim().to_string(),
            media,
        }
    }

    /// A post needs text, media, or both.
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() && self.media.is_none() {
            return Err(ClientError::Validation(
                "Please write something or attach an image".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_accepts_backend_field_names() {
        let post: PostView = serde_json::from_value(serde_json::json!({
            "post_id": 42,
            "user_id": 7,
            "content": "hello",
            "media_url": "",
            "created_at": "2024-01-15T10:00:00",
            "likes_nbr": 4,
            "comments_nbr": 2,
            "is_liked_by_me": true,
            "user": { "user_id": 7, "username": "sam" }
        }))
        .unwrap();

        assert_eq!(post.post_id, PostId::from(42));
        assert_eq!(post.author_id, UserId::from(7));
        assert_eq!(post.media_url, None);
        assert_eq!(post.likes_count, 4);
        assert_eq!(post.comments_count, 2);
        assert!(post.is_liked_by_viewer);
        assert_eq!(post.author_name(), "sam");
    }

    #[test]
    fn test_post_accepts_client_field_names() {
        let post: PostView = serde_json::from_value(serde_json::json!({
            "post_id": "p1",
            "author_id": "u1",
            "content": "hi",
            "likes_count": 1,
            "comments_count": null,
            "is_liked": false
        }))
        .unwrap();

        assert_eq!(post.likes_count, 1);
        assert_eq!(post.comments_count, 0);
        assert!(!post.is_liked_by_viewer);
        assert_eq!(post.author_name(), "Unknown");
    }

    #[test]
    fn test_new_post_validation() {
        assert!(NewPost::text("   ").normalized().validate().is_err());

        let empty_media = NewPost {
            content: String::new(),
            media: Some(PostMedia::Url("  ".to_string())),
        };
        assert!(empty_media.normalized().validate().is_err());

        let media_only = NewPost {
            content: String::new(),
            media: Some(PostMedia::Url("https://img.example/cat.png".to_string())),
        };
        assert!(media_only.normalized().validate().is_ok());

        assert!(NewPost::text("just words").normalized().validate().is_ok());
    }
}
