// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed wrappers for the social API endpoints.

use super::gateway::{ApiGateway, ParsedBody, Payload};
use crate::config::{ApiProfile, IdPlacement, PostUpload};
use crate::error::{ClientError, Result};
use crate::models::{
    CommentId, CommentView, FollowToggle, LikeToggle, LoginData, NewPost, OneOrMany, PostId,
    PostMedia, PostView, ProfilePicture, RegistrationForm, Upload, UserId, UserSummary,
};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;

/// Social API client.
#[derive(Clone)]
pub struct SocialApi {
    gateway: ApiGateway,
    profile: ApiProfile,
}

impl SocialApi {
    pub fn new(base_url: impl Into<String>, profile: ApiProfile) -> Self {
        Self {
            gateway: ApiGateway::new(base_url, profile.envelope),
            profile,
        }
    }

    pub fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    // ─── Auth ────────────────────────────────────────────────────────────────

    /// Exchange credentials for a bearer token and user snapshot.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        let body = json!({ "email": email, "password": password });
        self.gateway
            .call(Method::POST, "/auth/login", None, Payload::Json(body), true)
            .await
            .and_then(ParsedBody::decode::<LoginData>)
            .map_err(|e| e.into_auth("Login failed"))
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        let body = serde_json::to_value(form)
            .map_err(|e| ClientError::Validation(format!("Invalid registration: {}", e)))?;
        self.gateway
            .call(Method::POST, "/auth/register", None, Payload::Json(body), true)
            .await
            .map(|_| ())
            .map_err(|e| e.into_auth("Registration failed"))
    }

    /// Invalidate the token server-side.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.send(Method::POST, "/auth/logout", token, Payload::Empty)
            .await
            .map(|_| ())
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    /// Profile snapshot including counters and follow state.
    pub async fn user_profile(&self, token: &str, user_id: &UserId) -> Result<UserSummary> {
        let path = format!("/users/profile/{}", user_id.encoded());
        self.get(&path, token).await?.decode()
    }

    pub async fn update_bio(&self, token: &str, bio: &str) -> Result<()> {
        let body = json!({ "bio": bio });
        self.send(Method::PUT, "/users/update/bio", token, Payload::Json(body))
            .await
            .map(|_| ())
    }

    pub async fn update_profile_picture(&self, token: &str, picture: ProfilePicture) -> Result<()> {
        let payload = match picture {
            ProfilePicture::Url(url) => Payload::Json(json!({ "profile_picture": url })),
            ProfilePicture::File(upload) => {
                Payload::Multipart(Form::new().part("file", file_part(upload)?))
            }
        };
        self.send(Method::PUT, "/users/update/profile-picture", token, payload)
            .await
            .map(|_| ())
    }

    /// Users whose name matches `username`.
    pub async fn search_users(&self, token: &str, username: &str) -> Result<Vec<UserSummary>> {
        let path = format!("/users/search?username={}", urlencoding::encode(username));
        let found = self
            .get(&path, token)
            .await?
            .decode::<Option<OneOrMany<UserSummary>>>()?;
        Ok(found.map(OneOrMany::into_vec).unwrap_or_default())
    }

    /// Toggle the follow edge to `user_id`.
    pub async fn toggle_follow(&self, token: &str, user_id: &UserId) -> Result<FollowToggle> {
        let path = format!(
            "/users/follow-unfollow/?target_user_id={}",
            user_id.encoded()
        );
        self.send(Method::POST, &path, token, Payload::Empty)
            .await?
            .decode()
    }

    pub async fn followers(&self, token: &str, user_id: &UserId) -> Result<Vec<UserSummary>> {
        let path = format!("/users/followers?user_id={}", user_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    pub async fn followings(&self, token: &str, user_id: &UserId) -> Result<Vec<UserSummary>> {
        let path = format!("/users/followings?user_id={}", user_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    // ─── Feeds ───────────────────────────────────────────────────────────────

    /// Posts from followed users.
    pub async fn feed(&self, token: &str) -> Result<Vec<PostView>> {
        self.get("/feed/", token).await?.decode_list()
    }

    /// Recent posts from everyone else.
    pub async fn explore(&self, token: &str) -> Result<Vec<PostView>> {
        self.get("/feed/explore", token).await?.decode_list()
    }

    /// Posts authored by `user_id`.
    pub async fn user_posts(&self, token: &str, user_id: &UserId) -> Result<Vec<PostView>> {
        let path = format!("/posts/{}", user_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    // ─── Posts ───────────────────────────────────────────────────────────────

    /// Create a post. `post` must already be validated.
    pub async fn create_post(&self, token: &str, post: NewPost) -> Result<()> {
        let payload = match self.profile.post_upload {
            PostUpload::Json => {
                let mut body = json!({ "content": post.content });
                match post.media {
                    Some(PostMedia::Url(url)) => body["media_url"] = json!(url),
                    Some(PostMedia::File(_)) => {
                        return Err(ClientError::Validation(
                            "Image upload is not supported by this server".to_string(),
                        ))
                    }
                    None => {}
                }
                Payload::Json(body)
            }
            PostUpload::Multipart => {
                let form = Form::new().text("content", post.content);
                let form = match post.media {
                    Some(PostMedia::Url(url)) => form.text("media_url", url),
                    Some(PostMedia::File(upload)) => form.part("file", file_part(upload)?),
                    None => form,
                };
                Payload::Multipart(form)
            }
        };

        self.send(Method::POST, "/posts/create", token, payload)
            .await
            .map(|_| ())
    }

    /// Replace a post's text. Returns the server's copy when it sends one.
    pub async fn update_post(
        &self,
        token: &str,
        post_id: &PostId,
        content: &str,
    ) -> Result<Option<PostView>> {
        let path = format!("/posts/update/{}", post_id.encoded());
        let body = self
            .send(Method::PUT, &path, token, Payload::Json(json!({ "content": content })))
            .await?;
        Ok(body.decode::<Option<PostView>>().ok().flatten())
    }

    pub async fn delete_post(&self, token: &str, post_id: &PostId) -> Result<()> {
        let path = match self.profile.post_delete_id {
            IdPlacement::Path => format!("/posts/delete/{}", post_id.encoded()),
            IdPlacement::Query => format!("/posts/delete?post_id={}", post_id.encoded()),
        };
        self.send(Method::DELETE, &path, token, Payload::Empty)
            .await
            .map(|_| ())
    }

    pub async fn toggle_post_like(&self, token: &str, post_id: &PostId) -> Result<LikeToggle> {
        let path = format!("/posts/like-deslike/{}", post_id.encoded());
        self.send(Method::POST, &path, token, Payload::Empty)
            .await?
            .decode()
    }

    /// Users who liked a post.
    pub async fn post_likes(&self, token: &str, post_id: &PostId) -> Result<Vec<UserSummary>> {
        let path = format!("/posts/likes?post_id={}", post_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    // ─── Comments ────────────────────────────────────────────────────────────

    pub async fn create_comment(&self, token: &str, post_id: &PostId, content: &str) -> Result<()> {
        let path = format!("/posts/comments/create?post_id={}", post_id.encoded());
        self.send(Method::POST, &path, token, Payload::Json(json!({ "content": content })))
            .await
            .map(|_| ())
    }

    pub async fn comments(&self, token: &str, post_id: &PostId) -> Result<Vec<CommentView>> {
        let path = format!("/posts/comments/all?post_id={}", post_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    pub async fn delete_comment(
        &self,
        token: &str,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<()> {
        let path = format!(
            "/posts/comments/delete?comment_id={}&post_id={}",
            comment_id.encoded(),
            post_id.encoded()
        );
        self.send(Method::DELETE, &path, token, Payload::Empty)
            .await
            .map(|_| ())
    }

    pub async fn toggle_comment_like(
        &self,
        token: &str,
        comment_id: &CommentId,
    ) -> Result<LikeToggle> {
        let path = match self.profile.comment_like_id {
            IdPlacement::Path => format!("/posts/comments/like-deslike/{}", comment_id.encoded()),
            IdPlacement::Query => format!(
                "/posts/comments/like-deslike?comment_id={}",
                comment_id.encoded()
            ),
        };
        self.send(Method::POST, &path, token, Payload::Empty)
            .await?
            .decode()
    }

    /// Users who liked a comment.
    pub async fn comment_likes(
        &self,
        token: &str,
        comment_id: &CommentId,
    ) -> Result<Vec<UserSummary>> {
        let path = format!("/posts/comments/{}/likes", comment_id.encoded());
        self.get(&path, token).await?.decode_list()
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    async fn get(&self, path: &str, token: &str) -> Result<ParsedBody> {
        self.send(Method::GET, path, token, Payload::Empty).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        payload: Payload,
    ) -> Result<ParsedBody> {
        self.gateway
            .call(method, path, Some(token), payload, true)
            .await
    }
}

fn file_part(upload: Upload) -> Result<Part> {
    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.mime_type)
        .map_err(|_| {
            ClientError::Validation(format!("Unsupported file type: {}", upload.mime_type))
        })
}
