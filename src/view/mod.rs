// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory view state.
//!
//! This is what a renderer draws from: the active page, the post list shown
//! on it, the expanded comment panels and the profile counters. Mutations
//! after a server round trip go through [`reconcile`].

pub mod reconcile;
pub mod sequence;

pub use sequence::{RequestSequencer, Ticket, ToggleTarget};

use crate::models::{CommentView, PostId, PostView, UserId, UserSummary};
use std::collections::HashMap;

/// Logical page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Feed,
    Explore,
    Profile(UserId),
}

/// Which form the logged-out screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScreen {
    #[default]
    Login,
    Register,
}

/// Post composer inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub open: bool,
    pub content: String,
    pub media_url: String,
}

impl Composer {
    /// Close and clear the inputs.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything currently on screen.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub auth_screen: AuthScreen,
    pub page: Page,
    /// Posts of the active page
    pub posts: Vec<PostView>,
    /// Expanded comment panels. A post has at most one loaded list;
    /// collapsing drops it and expanding fetches it again.
    pub comments: HashMap<PostId, Vec<CommentView>>,
    /// Profile shown on a `Page::Profile`
    pub viewed_profile: Option<UserSummary>,
    /// Viewer's own profile counters (sidebar)
    pub viewer: Option<UserSummary>,
    pub composer: Composer,
}

impl ViewState {
    /// Switch page, dropping everything that belonged to the old one.
    pub fn enter(&mut self, page: Page) {
        self.page = page;
        self.posts.clear();
        self.comments.clear();
        self.viewed_profile = None;
    }

    /// Whether the "create post" affordance is shown: on the feeds and on the
    /// viewer's own profile.
    pub fn shows_composer(&self, viewer_id: Option<&UserId>) -> bool {
        match &self.page {
            Page::Feed | Page::Explore => true,
            Page::Profile(user_id) => viewer_id == Some(user_id),
        }
    }

    pub fn post(&self, post_id: &PostId) -> Option<&PostView> {
        self.posts.iter().find(|p| &p.post_id == post_id)
    }

    pub fn is_expanded(&self, post_id: &PostId) -> bool {
        self.comments.contains_key(post_id)
    }
}
