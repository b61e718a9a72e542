// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlapping toggles on the same entity.
//!
//! The first request is answered slowly and the second quickly, so the
//! older response arrives last.

mod common;

use common::{logged_in, user_json, FakeBackend, Reply};
use serde_json::json;
use social_client::config::ToggleSequencing;
use social_client::models::{PostId, UserId};
use social_client::view::Page;
use std::time::Duration;

const SLOW: Duration = Duration::from_millis(300);
const STAGGER: Duration = Duration::from_millis(50);

fn script_out_of_order_likes(backend: &FakeBackend) {
    backend.on(
        "POST",
        "/posts/like-deslike/42",
        Reply::ok(json!({ "is_liked_by_me": true, "likes_nbr": 5 })).delayed(SLOW),
    );
    backend.on(
        "POST",
        "/posts/like-deslike/42",
        Reply::ok(json!({ "is_liked_by_me": false, "likes_nbr": 4 })),
    );
}

#[tokio::test]
async fn test_last_response_wins_by_default() {
    let backend = FakeBackend::start().await;
    let (controller, _) = logged_in(&backend, backend.config()).await;
    script_out_of_order_likes(&backend);
    let post_id = PostId::from(42);

    let (first, second) = tokio::join!(controller.toggle_post_like(&post_id), async {
        tokio::time::sleep(STAGGER).await;
        controller.toggle_post_like(&post_id).await
    });

    assert!(first.unwrap());
    assert!(second.unwrap());
    // The stale "liked" response landed last and stuck.
    let view = controller.view();
    let post = view.post(&post_id).unwrap();
    assert!(post.is_liked_by_viewer);
    assert_eq!(post.likes_count, 5);
}

#[tokio::test]
async fn test_latest_request_discards_stale_response() {
    let backend = FakeBackend::start().await;
    let mut config = backend.config();
    config.toggle_sequencing = ToggleSequencing::LatestRequest;
    let (controller, _) = logged_in(&backend, config).await;
    script_out_of_order_likes(&backend);
    let post_id = PostId::from(42);

    let (first, second) = tokio::join!(controller.toggle_post_like(&post_id), async {
        tokio::time::sleep(STAGGER).await;
        controller.toggle_post_like(&post_id).await
    });

    assert!(!first.unwrap());
    assert!(second.unwrap());
    let view = controller.view();
    let post = view.post(&post_id).unwrap();
    assert!(!post.is_liked_by_viewer);
    assert_eq!(post.likes_count, 4);
}

#[tokio::test]
async fn test_latest_request_tracks_entities_separately() {
    let backend = FakeBackend::start().await;
    let mut config = backend.config();
    config.toggle_sequencing = ToggleSequencing::LatestRequest;
    let (controller, _) = logged_in(&backend, config).await;
    let bob = UserId::from(2);
    backend.on("GET", "/users/profile/2", Reply::ok(user_json(2, "bob")));
    backend.on("GET", "/posts/2", Reply::ok(json!([])));
    backend.on(
        "POST",
        "/users/follow-unfollow/",
        Reply::ok(json!({ "is_following": true, "followers_count": 11 })).delayed(SLOW),
    );
    backend.on(
        "POST",
        "/posts/like-deslike/42",
        Reply::ok(json!({ "is_liked_by_me": true, "likes_nbr": 5 })),
    );
    controller.navigate(Page::Profile(bob.clone())).await.unwrap();

    // A like on an unrelated entity does not make the follow stale.
    let (follow, like) = tokio::join!(controller.toggle_follow(&bob), async {
        tokio::time::sleep(STAGGER).await;
        controller.toggle_post_like(&PostId::from(42)).await
    });

    assert!(follow.unwrap());
    // Post 42 is not on bob's profile page.
    assert!(!like.unwrap());
    let profile = controller.view().viewed_profile.unwrap();
    assert_eq!(profile.is_following, Some(true));
    assert_eq!(profile.followers_count, 11);
}

#[tokio::test]
async fn test_navigation_during_load_drops_stale_page() {
    let backend = FakeBackend::start().await;
    let (controller, _) = logged_in(&backend, backend.config()).await;
    backend.on(
        "GET",
        "/feed/explore",
        Reply::ok(json!([{ "post_id": 7, "user_id": 3, "content": "slow" }])).delayed(SLOW),
    );
    backend.on("GET", "/users/profile/2", Reply::ok(user_json(2, "bob")));
    backend.on("GET", "/posts/2", Reply::ok(json!([])));

    let (explore, profile) = tokio::join!(controller.navigate(Page::Explore), async {
        tokio::time::sleep(STAGGER).await;
        controller.navigate(Page::Profile(UserId::from(2))).await
    });

    explore.unwrap();
    profile.unwrap();
    let view = controller.view();
    assert_eq!(view.page, Page::Profile(UserId::from(2)));
    assert!(view.posts.is_empty());
    assert_eq!(view.viewed_profile.map(|u| u.username), Some("bob".to_string()));
}
