// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client session: bearer token plus current-user snapshot.

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, TOKEN_KEY, USER_KEY};

use crate::models::UserSummary;
use serde::Deserialize;
use serde_json::Value;

/// Authentication state.
///
/// The token and user are set together or not at all; the fields are private
/// so nothing can build a half-authenticated session. `snapshot` is the user
/// object exactly as the server sent it and is what gets persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    current_user: Option<UserSummary>,
    snapshot: Option<Value>,
}

impl Session {
    /// Unauthenticated session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Authenticated session from a raw user object, kept verbatim.
    ///
    /// Fails if the object does not describe a user. A blank token yields an
    /// empty session.
    pub fn from_snapshot(
        token: impl Into<String>,
        snapshot: Value,
    ) -> std::result::Result<Self, serde_json::Error> {
        let user = UserSummary::deserialize(&snapshot)?;
        let token = token.into();
        if token.trim().is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self {
            token: Some(token),
            current_user: Some(user),
            snapshot: Some(snapshot),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.current_user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn current_user(&self) -> Option<&UserSummary> {
        self.current_user.as_ref()
    }

    /// The user object to persist.
    pub fn snapshot(&self) -> Option<&Value> {
        self.snapshot.as_ref()
    }
}
