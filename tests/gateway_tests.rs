// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request shaping and response classification of the API gateway.

mod common;

use common::{post_json, user_json, FakeBackend, Reply};
use reqwest::Method;
use serde_json::json;
use social_client::config::{ApiProfile, Envelope, IdPlacement, PostUpload};
use social_client::error::ClientError;
use social_client::models::{CommentId, NewPost, PostId, PostMedia, Upload, UserId};
use social_client::services::{ApiGateway, ParsedBody, Payload, SocialApi};

#[tokio::test]
async fn test_authenticated_get_sends_bearer_and_json_content_type() {
    let backend = FakeBackend::start().await;
    backend.on("GET", "/feed/", Reply::ok(json!([])));
    let gateway = ApiGateway::new(backend.url(), Envelope::Wrapped);

    gateway
        .call(Method::GET, "/feed/", Some("T"), Payload::Empty, true)
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.header("authorization").as_deref(), Some("Bearer T"));
    assert_eq!(
        request.header("content-type").as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_unauthenticated_call_has_no_authorization() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/auth/login", Reply::fail("nope"));
    let gateway = ApiGateway::new(backend.url(), Envelope::Wrapped);

    let _ = gateway
        .call(
            Method::POST,
            "/auth/login",
            None,
            Payload::Json(json!({ "email": "a", "password": "b" })),
            true,
        )
        .await;

    assert_eq!(backend.requests()[0].header("authorization"), None);
}

#[tokio::test]
async fn test_multipart_post_omits_json_content_type() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/posts/create", Reply::ok(json!({ "post_id": 9 })));
    let profile = ApiProfile {
        post_upload: PostUpload::Multipart,
        ..Default::default()
    };
    let api = SocialApi::new(backend.url(), profile);

    api.create_post(
        "T",
        NewPost {
            content: "look".to_string(),
            media: Some(PostMedia::File(Upload {
                file_name: "cat.png".to_string(),
                mime_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            })),
        },
    )
    .await
    .unwrap();

    let request = &backend.requests()[0];
    let content_type = request.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"content\""));
    assert!(body.contains("filename=\"cat.png\""));
    assert_eq!(request.header("authorization").as_deref(), Some("Bearer T"));
}

#[tokio::test]
async fn test_json_post_rejects_file_without_request() {
    let backend = FakeBackend::start().await;
    let api = SocialApi::new(backend.url(), ApiProfile::default());

    let err = api
        .create_post(
            "T",
            NewPost {
                content: String::new(),
                media: Some(PostMedia::File(Upload {
                    file_name: "cat.png".to_string(),
                    mime_type: "image/png".to_string(),
                    bytes: vec![1],
                })),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_no_content_is_success() {
    let backend = FakeBackend::start().await;
    backend.on("DELETE", "/posts/delete/5", Reply::no_content());
    let api = SocialApi::new(backend.url(), ApiProfile::default());

    api.delete_post("T", &PostId::from(5)).await.unwrap();

    let gateway = ApiGateway::new(backend.url(), Envelope::Wrapped);
    let body = gateway
        .call(Method::DELETE, "/posts/delete/5", Some("T"), Payload::Empty, true)
        .await
        .unwrap();
    assert!(matches!(body, ParsedBody::NoContent));
}

#[tokio::test]
async fn test_id_placement_follows_profile() {
    let backend = FakeBackend::start().await;
    backend.on("DELETE", "/posts/delete", Reply::ok(json!(null)));
    backend.on(
        "POST",
        "/posts/comments/like-deslike",
        Reply::ok(json!({ "is_liked_by_me": true, "likes_nbr": 1 })),
    );
    let profile = ApiProfile {
        post_delete_id: IdPlacement::Query,
        comment_like_id: IdPlacement::Query,
        ..Default::default()
    };
    let api = SocialApi::new(backend.url(), profile);

    api.delete_post("T", &PostId::from(5)).await.unwrap();
    let toggle = api
        .toggle_comment_like("T", &CommentId::from(8))
        .await
        .unwrap();

    assert!(toggle.liked);
    let requests = backend.requests();
    assert_eq!(requests[0].query.as_deref(), Some("post_id=5"));
    assert_eq!(requests[1].query.as_deref(), Some("comment_id=8"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let api = SocialApi::new(url, ApiProfile::default());
    let err = api.feed("T").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.user_message(), ClientError::NETWORK_MESSAGE);
}

#[tokio::test]
async fn test_success_false_is_rejection_even_with_200() {
    let backend = FakeBackend::start().await;
    backend.on("GET", "/feed/explore", Reply::fail("Token expired"));
    let api = SocialApi::new(backend.url(), ApiProfile::default());

    let err = api.explore("T").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 200, .. }));
    assert_eq!(err.user_message(), "Token expired");
}

#[tokio::test]
async fn test_http_error_without_message_gets_generic_text() {
    let backend = FakeBackend::start().await;
    backend.on("GET", "/users/profile/3", Reply::json(500, json!({})));
    let api = SocialApi::new(backend.url(), ApiProfile::default());

    let err = api.user_profile("T", &UserId::from(3)).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(err.user_message(), ClientError::GENERIC_MESSAGE);
}

#[tokio::test]
async fn test_bare_envelope_reads_top_level() {
    let backend = FakeBackend::start().await;
    backend.on(
        "GET",
        "/posts/2",
        Reply::json(200, json!([post_json(1, 2, "first", 0, false)])),
    );
    backend.on("GET", "/users/profile/2", Reply::json(200, user_json(2, "bob")));
    let profile = ApiProfile {
        envelope: Envelope::Bare,
        ..Default::default()
    };
    let api = SocialApi::new(backend.url(), profile);

    let posts = api.user_posts("T", &UserId::from(2)).await.unwrap();
    let user = api.user_profile("T", &UserId::from(2)).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "first");
    assert_eq!(user.username, "bob");
}

#[tokio::test]
async fn test_search_accepts_single_result_and_encodes_query() {
    let backend = FakeBackend::start().await;
    backend.on("GET", "/users/search", Reply::ok(user_json(4, "ann marie")));
    let api = SocialApi::new(backend.url(), ApiProfile::default());

    let users = api.search_users("T", "ann marie").await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(
        backend.requests()[0].query.as_deref(),
        Some("username=ann%20marie")
    );
}

#[tokio::test]
async fn test_text_mode_returns_raw_body() {
    let backend = FakeBackend::start().await;
    backend.on("GET", "/health", Reply::json(200, json!("ok")));
    let gateway = ApiGateway::new(backend.url(), Envelope::Wrapped);

    let body = gateway
        .call(Method::GET, "/health", None, Payload::Empty, false)
        .await
        .unwrap();

    assert!(matches!(body, ParsedBody::Text(text) if text == "\"ok\""));
}
