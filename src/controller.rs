// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The owning controller: session, view state and every user action.
//!
//! Handlers run on one task. Each suspends only at its network call; state is
//! borrowed and patched after the response arrives, never across an await.
//! Two handlers may therefore be in flight at once (a double click on a like
//! button), and [`ToggleSequencing`] decides what happens to their responses.

use crate::banner::Banner;
use crate::config::{Config, ToggleSequencing};
use crate::error::{ClientError, Result};
use crate::models::{
    CommentId, NewPost, PostId, PostMedia, ProfilePicture, RegistrationForm, UserId, UserSummary,
};
use crate::services::SocialApi;
use crate::session::{KeyValueStore, Session, SessionStore};
use crate::view::{reconcile, AuthScreen, Page, RequestSequencer, Ticket, ToggleTarget, ViewState};
use std::cell::RefCell;

/// A user action, as produced by a UI event.
#[derive(Debug, Clone)]
pub enum Action {
    Login { email: String, password: String },
    Register(RegistrationForm),
    Logout,
    ShowLogin,
    ShowRegister,
    Navigate(Page),
    TogglePostLike(PostId),
    ToggleCommentLike(CommentId),
    ToggleComments(PostId),
    PostComment { post_id: PostId, content: String },
    DeleteComment { post_id: PostId, comment_id: CommentId },
    OpenComposer,
    /// Composer inputs changed.
    EditComposer { content: String, media_url: String },
    CloseComposer,
    CreatePost(NewPost),
    SubmitComposer,
    EditPost { post_id: PostId, content: String },
    DeletePost(PostId),
    ToggleFollow(UserId),
    SearchUsers(String),
    Followers(UserId),
    Followings(UserId),
    PostLikers(PostId),
    CommentLikers(CommentId),
    UpdateBio(String),
    UpdateProfilePicture(ProfilePicture),
}

/// Result of a successfully handled action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Session(Session),
    Users(Vec<UserSummary>),
}

/// Client controller.
pub struct Controller<K: KeyValueStore> {
    api: SocialApi,
    sequencing: ToggleSequencing,
    session: RefCell<Session>,
    store: RefCell<SessionStore<K>>,
    view: RefCell<ViewState>,
    sequencer: RefCell<RequestSequencer>,
    banner: Banner,
}

impl<K: KeyValueStore> Controller<K> {
    /// Create a controller and restore any persisted session.
    pub fn new(config: &Config, kv: K) -> Self {
        let store = SessionStore::new(kv);
        let session = store.restore();
        tracing::info!(
            authenticated = session.is_authenticated(),
            api = %config.api_base_url,
            "Session restored"
        );

        Self {
            api: SocialApi::new(config.api_base_url.clone(), config.api),
            sequencing: config.toggle_sequencing,
            session: RefCell::new(session),
            store: RefCell::new(store),
            view: RefCell::new(ViewState::default()),
            sequencer: RefCell::new(RequestSequencer::new()),
            banner: Banner::new(config.banner_dismiss_after),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Snapshot of the view state.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn shows_composer(&self) -> bool {
        let session = self.session.borrow();
        let viewer_id = session.current_user().map(|u| &u.user_id);
        self.view.borrow().shows_composer(viewer_id)
    }

    fn token(&self) -> Result<String> {
        self.session
            .borrow()
            .token()
            .map(str::to_string)
            .ok_or(ClientError::NotAuthenticated)
    }

    fn viewer_id(&self) -> Result<UserId> {
        self.session
            .borrow()
            .current_user()
            .map(|u| u.user_id.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    // ─── Handler boundary ────────────────────────────────────────────────────

    /// Run one action. Errors never escape: they are logged and shown in the
    /// error banner, and `None` is returned.
    pub async fn dispatch(&self, action: Action) -> Option<Outcome> {
        let result = match action {
            Action::Login { email, password } => {
                self.login(&email, &password).await.map(Outcome::Session)
            }
            Action::Register(form) => self.register(form).await.map(|_| Outcome::Done),
            Action::Logout => {
                self.logout().await;
                Ok(Outcome::Done)
            }
            Action::ShowLogin => {
                self.view.borrow_mut().auth_screen = AuthScreen::Login;
                Ok(Outcome::Done)
            }
            Action::ShowRegister => {
                self.view.borrow_mut().auth_screen = AuthScreen::Register;
                Ok(Outcome::Done)
            }
            Action::Navigate(page) => self.navigate(page).await.map(|_| Outcome::Done),
            Action::TogglePostLike(post_id) => {
                self.toggle_post_like(&post_id).await.map(|_| Outcome::Done)
            }
            Action::ToggleCommentLike(comment_id) => self
                .toggle_comment_like(&comment_id)
                .await
                .map(|_| Outcome::Done),
            Action::ToggleComments(post_id) => {
                self.toggle_comments(&post_id).await.map(|_| Outcome::Done)
            }
            Action::PostComment { post_id, content } => self
                .post_comment(&post_id, &content)
                .await
                .map(|_| Outcome::Done),
            Action::DeleteComment {
                post_id,
                comment_id,
            } => self
                .delete_comment(&post_id, &comment_id)
                .await
                .map(|_| Outcome::Done),
            Action::OpenComposer => {
                self.view.borrow_mut().composer.open = true;
                Ok(Outcome::Done)
            }
            Action::EditComposer { content, media_url } => {
                let mut view = self.view.borrow_mut();
                view.composer.content = content;
                view.composer.media_url = media_url;
                Ok(Outcome::Done)
            }
            Action::CloseComposer => {
                self.view.borrow_mut().composer.reset();
                Ok(Outcome::Done)
            }
            Action::CreatePost(post) => self.create_post(post).await.map(|_| Outcome::Done),
            Action::SubmitComposer => self.submit_composer().await.map(|_| Outcome::Done),
            Action::EditPost { post_id, content } => self
                .edit_post(&post_id, &content)
                .await
                .map(|_| Outcome::Done),
            Action::DeletePost(post_id) => self.delete_post(&post_id).await.map(|_| Outcome::Done),
            Action::ToggleFollow(user_id) => {
                self.toggle_follow(&user_id).await.map(|_| Outcome::Done)
            }
            Action::SearchUsers(query) => self.search_users(&query).await.map(Outcome::Users),
            Action::Followers(user_id) => self.followers(&user_id).await.map(Outcome::Users),
            Action::Followings(user_id) => self.followings(&user_id).await.map(Outcome::Users),
            Action::PostLikers(post_id) => self.post_likers(&post_id).await.map(Outcome::Users),
            Action::CommentLikers(comment_id) => self
                .comment_likers(&comment_id)
                .await
                .map(Outcome::Users),
            Action::UpdateBio(bio) => self.update_bio(&bio).await.map(|_| Outcome::Done),
            Action::UpdateProfilePicture(picture) => self
                .update_profile_picture(picture)
                .await
                .map(|_| Outcome::Done),
        };

        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Log an error and show it to the user.
    pub fn report(&self, err: &ClientError) {
        tracing::warn!(error = %err, "Action failed");
        self.banner.error(err.user_message());
    }

    // ─── Session ─────────────────────────────────────────────────────────────

    /// Re-read the persisted session, as on a page reload.
    pub fn restore(&self) -> Session {
        let session = self.store.borrow().restore();
        *self.session.borrow_mut() = session.clone();
        session
    }

    /// Load the initial screen for a restored session.
    pub async fn start(&self) -> Result<()> {
        if !self.session.borrow().is_authenticated() {
            return Ok(());
        }
        self.load_home().await;
        Ok(())
    }

    /// Log in, persist the session and request the feed.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }

        let data = self.api.login(email, password).await?;
        let expires_in = data.expires_in;
        let session = Session::from_snapshot(data.access_token, data.user)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        if !session.is_authenticated() {
            return Err(ClientError::Auth("Login failed".to_string()));
        }

        if let Err(e) = self.store.borrow_mut().persist(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        *self.session.borrow_mut() = session.clone();
        *self.view.borrow_mut() = ViewState::default();

        tracing::info!(
            user_id = %session.current_user().map(|u| u.user_id.to_string()).unwrap_or_default(),
            expires_in = ?expires_in,
            "Logged in"
        );

        self.load_home().await;
        Ok(session)
    }

    /// Create an account and switch to the login form.
    pub async fn register(&self, form: RegistrationForm) -> Result<()> {
        form.validate(self.api.profile().register_requires_dob)?;
        self.api.register(&form).await?;

        tracing::info!(username = %form.username, "Registered");
        self.view.borrow_mut().auth_screen = AuthScreen::Login;
        self.banner.success("Registration successful! Please log in.");
        Ok(())
    }

    /// Log out. The server call is best effort; the local session is always
    /// cleared.
    pub async fn logout(&self) {
        let token = self.session.borrow().token().map(str::to_string);
        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "Logout request failed, clearing session anyway");
            }
        }

        *self.session.borrow_mut() = Session::empty();
        if let Err(e) = self.store.borrow_mut().clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        *self.view.borrow_mut() = ViewState::default();
        tracing::info!("Logged out");
    }

    async fn load_home(&self) {
        if let Err(e) = self.refresh_viewer().await {
            self.report(&e);
        }
        if let Err(e) = self.navigate(Page::Feed).await {
            self.report(&e);
        }
    }

    // ─── Pages ───────────────────────────────────────────────────────────────

    /// Switch to `page` and load its content.
    pub async fn navigate(&self, page: Page) -> Result<()> {
        let token = self.token()?;
        self.view.borrow_mut().enter(page.clone());

        let (posts, profile) = match &page {
            Page::Feed => (self.api.feed(&token).await?, None),
            Page::Explore => (self.api.explore(&token).await?, None),
            Page::Profile(user_id) => {
                let profile = self.api.user_profile(&token, user_id).await?;
                let posts = self.api.user_posts(&token, user_id).await?;
                (posts, Some(profile))
            }
        };

        let mut view = self.view.borrow_mut();
        if view.page != page {
            tracing::debug!(?page, "Page changed while loading, dropping result");
            return Ok(());
        }
        tracing::debug!(?page, count = posts.len(), "Page loaded");
        view.posts = posts;
        view.viewed_profile = profile;
        Ok(())
    }

    /// Reload the viewer's own counters.
    pub async fn refresh_viewer(&self) -> Result<()> {
        let token = self.token()?;
        let viewer_id = self.viewer_id()?;
        let profile = self.api.user_profile(&token, &viewer_id).await?;

        let mut view = self.view.borrow_mut();
        if matches!(&view.page, Page::Profile(id) if id == &viewer_id) {
            view.viewed_profile = Some(profile.clone());
        }
        view.viewer = Some(profile);
        Ok(())
    }

    /// Reload whatever list is on screen.
    async fn refresh_active_page(&self) {
        let page = self.view.borrow().page.clone();
        if let Err(e) = self.navigate(page).await {
            self.report(&e);
        }
    }

    // ─── Likes ───────────────────────────────────────────────────────────────

    /// Toggle the viewer's like on a post.
    ///
    /// Returns whether the response was applied to the visible post.
    pub async fn toggle_post_like(&self, post_id: &PostId) -> Result<bool> {
        let token = self.token()?;
        let ticket = self
            .sequencer
            .borrow_mut()
            .issue(ToggleTarget::PostLike(post_id.clone()));

        let toggle = self.api.toggle_post_like(&token, post_id).await?;

        if !self.accepts(&ticket) {
            tracing::debug!(post_id = %post_id, "Discarding stale like response");
            return Ok(false);
        }
        let applied = reconcile::apply_post_like(&mut self.view.borrow_mut(), post_id, toggle);
        if !applied {
            tracing::debug!(post_id = %post_id, "Liked post no longer visible");
        }
        Ok(applied)
    }

    /// Toggle the viewer's like on a comment.
    pub async fn toggle_comment_like(&self, comment_id: &CommentId) -> Result<bool> {
        let token = self.token()?;
        let ticket = self
            .sequencer
            .borrow_mut()
            .issue(ToggleTarget::CommentLike(comment_id.clone()));

        let toggle = self.api.toggle_comment_like(&token, comment_id).await?;

        if !self.accepts(&ticket) {
            tracing::debug!(comment_id = %comment_id, "Discarding stale like response");
            return Ok(false);
        }
        Ok(reconcile::apply_comment_like(
            &mut self.view.borrow_mut(),
            comment_id,
            toggle,
        ))
    }

    fn accepts(&self, ticket: &Ticket) -> bool {
        match self.sequencing {
            ToggleSequencing::LastResponse => true,
            ToggleSequencing::LatestRequest => self.sequencer.borrow().is_current(ticket),
        }
    }

    // ─── Comments ────────────────────────────────────────────────────────────

    /// Collapse an expanded comment panel, or expand and load a collapsed one.
    pub async fn toggle_comments(&self, post_id: &PostId) -> Result<()> {
        if self.view.borrow().is_expanded(post_id) {
            self.collapse_comments(post_id);
            Ok(())
        } else {
            self.expand_comments(post_id).await
        }
    }

    /// Fetch and show a post's comments. Always refetches.
    pub async fn expand_comments(&self, post_id: &PostId) -> Result<()> {
        let token = self.token()?;
        let comments = self.api.comments(&token, post_id).await?;
        if !reconcile::apply_comments_loaded(&mut self.view.borrow_mut(), post_id, comments) {
            tracing::debug!(post_id = %post_id, "Post no longer visible, comments dropped");
        }
        Ok(())
    }

    pub fn collapse_comments(&self, post_id: &PostId) {
        self.view.borrow_mut().comments.remove(post_id);
    }

    /// Add a comment, refresh the post's comment list and bump its counter.
    pub async fn post_comment(&self, post_id: &PostId, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(
                "Please write a comment".to_string(),
            ));
        }
        let token = self.token()?;
        self.api.create_comment(&token, post_id, content).await?;

        // The comment exists now; a failed refresh leaves the panel alone but
        // the counter still moves.
        let refreshed = match self.api.comments(&token, post_id).await {
            Ok(list) => Some(list),
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "Failed to reload comments");
                None
            }
        };
        reconcile::apply_comment_created(&mut self.view.borrow_mut(), post_id, refreshed);
        Ok(())
    }

    pub async fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> Result<()> {
        let token = self.token()?;
        self.api.delete_comment(&token, post_id, comment_id).await?;
        reconcile::apply_comment_deleted(&mut self.view.borrow_mut(), post_id, comment_id);
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    // ─── Posts ───────────────────────────────────────────────────────────────

    /// Create a post from the composer inputs.
    pub async fn submit_composer(&self) -> Result<()> {
        let post = {
            let view = self.view.borrow();
            NewPost {
                content: view.composer.content.clone(),
                media: Some(PostMedia::Url(view.composer.media_url.clone())),
            }
        };
        self.create_post(post).await
    }

    /// Create a post, then close the composer and refresh the active list and
    /// the viewer's counters.
    pub async fn create_post(&self, post: NewPost) -> Result<()> {
        let post = post.normalized();
        post.validate()?;
        let token = self.token()?;

        self.api.create_post(&token, post).await?;
        tracing::info!("Post created");

        self.view.borrow_mut().composer.reset();
        self.refresh_active_page().await;
        if let Err(e) = self.refresh_viewer().await {
            self.report(&e);
        }
        Ok(())
    }

    pub async fn edit_post(&self, post_id: &PostId, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(
                "Post content cannot be empty".to_string(),
            ));
        }
        let token = self.token()?;
        let server_copy = self.api.update_post(&token, post_id, content).await?;
        reconcile::apply_post_edited(&mut self.view.borrow_mut(), post_id, content, server_copy);
        Ok(())
    }

    /// Delete a post, drop it from the active list and refresh the viewer's
    /// counters.
    pub async fn delete_post(&self, post_id: &PostId) -> Result<()> {
        let token = self.token()?;
        self.api.delete_post(&token, post_id).await?;
        tracing::info!(post_id = %post_id, "Post deleted");

        reconcile::apply_post_deleted(&mut self.view.borrow_mut(), post_id);
        if let Err(e) = self.refresh_viewer().await {
            self.report(&e);
        }
        Ok(())
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    /// Follow or unfollow a user and patch the profile on screen.
    pub async fn toggle_follow(&self, user_id: &UserId) -> Result<bool> {
        let token = self.token()?;
        let ticket = self
            .sequencer
            .borrow_mut()
            .issue(ToggleTarget::Follow(user_id.clone()));

        let toggle = self.api.toggle_follow(&token, user_id).await?;

        if !self.accepts(&ticket) {
            tracing::debug!(user_id = %user_id, "Discarding stale follow response");
            return Ok(false);
        }
        Ok(reconcile::apply_follow(
            &mut self.view.borrow_mut(),
            user_id,
            toggle,
        ))
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::Validation(
                "Please enter a username".to_string(),
            ));
        }
        let token = self.token()?;
        self.api.search_users(&token, query).await
    }

    pub async fn followers(&self, user_id: &UserId) -> Result<Vec<UserSummary>> {
        let token = self.token()?;
        self.api.followers(&token, user_id).await
    }

    pub async fn followings(&self, user_id: &UserId) -> Result<Vec<UserSummary>> {
        let token = self.token()?;
        self.api.followings(&token, user_id).await
    }

    pub async fn post_likers(&self, post_id: &PostId) -> Result<Vec<UserSummary>> {
        let token = self.token()?;
        self.api.post_likes(&token, post_id).await
    }

    pub async fn comment_likers(&self, comment_id: &CommentId) -> Result<Vec<UserSummary>> {
        let token = self.token()?;
        self.api.comment_likes(&token, comment_id).await
    }

    pub async fn update_bio(&self, bio: &str) -> Result<()> {
        let token = self.token()?;
        self.api.update_bio(&token, bio.trim()).await?;
        self.banner.success("Profile updated");
        self.refresh_viewer().await
    }

    pub async fn update_profile_picture(&self, picture: ProfilePicture) -> Result<()> {
        if let ProfilePicture::Url(url) = &picture {
            if url.trim().is_empty() {
                return Err(ClientError::Validation(
                    "Please provide an image".to_string(),
                ));
            }
        }
        let token = self.token()?;
        self.api.update_profile_picture(&token, picture).await?;
        self.banner.success("Profile picture updated");
        self.refresh_viewer().await
    }
}
