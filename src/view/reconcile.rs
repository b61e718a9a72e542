// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! State transitions applied after a mutation succeeds.
//!
//! Each function patches exactly the entity the action targeted and returns
//! `false` when that entity is no longer on screen (the user navigated away
//! while the request was in flight), in which case nothing changes.
//!
//! Like and follow counts come from the server response. Comment counts are
//! adjusted locally by one, because the comment create/delete endpoints do
//! not report a count.

use super::ViewState;
use crate::models::{CommentId, CommentView, FollowToggle, LikeToggle, PostId, PostView, UserId};

/// Apply a confirmed post like toggle.
pub fn apply_post_like(view: &mut ViewState, post_id: &PostId, toggle: LikeToggle) -> bool {
    let Some(post) = view.posts.iter_mut().find(|p| &p.post_id == post_id) else {
        return false;
    };
    post.likes_count = confirmed_count(
        post.likes_count,
        post.is_liked_by_viewer,
        toggle.liked,
        toggle.likes,
    );
    post.is_liked_by_viewer = toggle.liked;
    true
}

/// Apply a confirmed comment like toggle to the one visible comment row.
pub fn apply_comment_like(view: &mut ViewState, comment_id: &CommentId, toggle: LikeToggle) -> bool {
    let Some(comment) = view
        .comments
        .values_mut()
        .flat_map(|list| list.iter_mut())
        .find(|c| &c.comment_id == comment_id)
    else {
        return false;
    };
    comment.likes_count = confirmed_count(
        comment.likes_count,
        comment.is_liked_by_viewer,
        toggle.liked,
        toggle.likes,
    );
    comment.is_liked_by_viewer = toggle.liked;
    true
}

/// Show a freshly fetched comment list under its post.
pub fn apply_comments_loaded(
    view: &mut ViewState,
    post_id: &PostId,
    comments: Vec<CommentView>,
) -> bool {
    if view.post(post_id).is_none() {
        return false;
    }
    view.comments.insert(post_id.clone(), comments);
    true
}

/// After posting a comment: bump the counter by one and show the refreshed
/// list. Without a list (the reload failed) the panel is left as it was.
pub fn apply_comment_created(
    view: &mut ViewState,
    post_id: &PostId,
    refreshed: Option<Vec<CommentView>>,
) -> bool {
    let Some(post) = find_post(&mut view.posts, post_id) else {
        return false;
    };
    post.comments_count += 1;
    if let Some(list) = refreshed {
        view.comments.insert(post_id.clone(), list);
    }
    true
}

/// After deleting a comment: drop its row and lower the counter by one.
pub fn apply_comment_deleted(
    view: &mut ViewState,
    post_id: &PostId,
    comment_id: &CommentId,
) -> bool {
    let Some(post) = find_post(&mut view.posts, post_id) else {
        return false;
    };
    post.comments_count = post.comments_count.saturating_sub(1);
    if let Some(list) = view.comments.get_mut(post_id) {
        list.retain(|c| &c.comment_id != comment_id);
    }
    true
}

/// Remove a deleted post from the active list.
pub fn apply_post_deleted(view: &mut ViewState, post_id: &PostId) -> bool {
    let before = view.posts.len();
    view.posts.retain(|p| &p.post_id != post_id);
    view.comments.remove(post_id);
    view.posts.len() != before
}

/// Replace a post's text after an edit.
///
/// Uses the server's copy of the post when the endpoint returned one.
pub fn apply_post_edited(
    view: &mut ViewState,
    post_id: &PostId,
    content: &str,
    server_copy: Option<PostView>,
) -> bool {
    let Some(post) = find_post(&mut view.posts, post_id) else {
        return false;
    };
    match server_copy {
        Some(updated) if &updated.post_id == post_id => post.content = updated.content,
        _ => post.content = content.to_string(),
    }
    true
}

/// Apply a confirmed follow toggle to the profile being viewed.
///
/// The follower count moves by one in the direction of the confirmed state,
/// and only when that state differs from what is displayed. A count reported
/// by the server replaces the displayed one.
pub fn apply_follow(view: &mut ViewState, user_id: &UserId, toggle: FollowToggle) -> bool {
    let Some(profile) = view
        .viewed_profile
        .as_mut()
        .filter(|p| &p.user_id == user_id)
    else {
        return false;
    };

    let was_following = profile.is_following.unwrap_or(false);
    profile.followers_count = match toggle.followers_count {
        Some(count) => count,
        None if toggle.is_following && !was_following => profile.followers_count + 1,
        None if !toggle.is_following && was_following => {
            profile.followers_count.saturating_sub(1)
        }
        None => profile.followers_count,
    };
    profile.is_following = Some(toggle.is_following);
    true
}

fn find_post<'a>(posts: &'a mut [PostView], post_id: &PostId) -> Option<&'a mut PostView> {
    posts.iter_mut().find(|p| &p.post_id == post_id)
}

/// Count to display after a like toggle.
///
/// The server count wins. Without one, move the displayed count by one when
/// the liked flag actually changed.
fn confirmed_count(displayed: u32, was_liked: bool, liked: bool, server: Option<u32>) -> u32 {
    match server {
        Some(count) => count,
        None if liked && !was_liked => displayed + 1,
        None if !liked && was_liked => displayed.saturating_sub(1),
        None => displayed,
    }
}
