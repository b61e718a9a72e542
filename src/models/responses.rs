// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payloads of mutation responses.

use serde::Deserialize;
use serde_json::Value;

/// `/auth/login` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    /// Left raw so the session can persist it unchanged
    pub user: Value,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Server-confirmed state after a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeToggle {
    #[serde(alias = "is_liked_by_me", alias = "is_liked")]
    pub liked: bool,
    /// Authoritative count, when the backend reports one
    #[serde(default, alias = "likes_nbr", alias = "likes_count")]
    pub likes: Option<u32>,
}

/// Server-confirmed state after a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FollowToggle {
    pub is_following: bool,
    #[serde(default)]
    pub followers_count: Option<u32>,
}

/// Endpoints that answer with either a single item or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
