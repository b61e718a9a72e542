// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scripted fake backend for integration tests.
//!
//! Replies are queued per `(method, path)` and served in order. The last
//! one keeps being served until a new reply is scripted for the route, which
//! then replaces it. Every request is recorded so tests can assert on what
//! was sent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use social_client::config::Config;
use social_client::session::MemoryStore;
use social_client::Controller;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request as received by the fake backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl Recorded {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// A scripted reply.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: Option<Value>,
    delay: Duration,
}

#[allow(dead_code)]
impl Reply {
    /// `200` with a wrapped success envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self::json(200, json!({ "success": true, "data": data, "message": "ok" }))
    }

    /// `200` with `success: false`.
    pub fn fail(message: &str) -> Self {
        Self::json(200, json!({ "success": false, "message": message }))
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            delay: Duration::ZERO,
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Script {
    queue: VecDeque<Reply>,
    /// The only queued reply has been served at least once.
    spent: bool,
}

#[derive(Default)]
struct Inner {
    replies: Mutex<HashMap<(String, String), Script>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Fake social API server bound to an ephemeral local port.
pub struct FakeBackend {
    url: String,
    inner: Arc<Inner>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub async fn start() -> Self {
        let inner = Arc::new(Inner::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}", addr),
            inner,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Config pointing at this backend, otherwise default.
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.url.clone(),
            ..Default::default()
        }
    }

    /// Queue a reply for `method path` (path without query string).
    pub fn on(&self, method: &str, path: &str, reply: Reply) {
        let mut replies = self.inner.replies.lock().unwrap();
        let script = replies
            .entry((method.to_string(), path.to_string()))
            .or_default();
        if script.spent {
            script.queue.clear();
            script.spent = false;
        }
        script.queue.push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.inner.requests.lock().unwrap().clear();
    }
}

async fn handle(
    State(inner): State<Arc<Inner>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let key = (method.to_string(), uri.path().to_string());
    inner.requests.lock().unwrap().push(Recorded {
        method: key.0.clone(),
        path: key.1.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.to_vec(),
    });

    let reply = {
        let mut replies = inner.replies.lock().unwrap();
        match replies.get_mut(&key) {
            Some(script) if script.queue.len() > 1 => script.queue.pop_front(),
            Some(script) => {
                script.spent = true;
                script.queue.front().cloned()
            }
            None => None,
        }
    };

    let Some(reply) = reply else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Not found" })),
        )
            .into_response();
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match reply.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "user_id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "posts_count": 2,
        "followers_count": 10,
        "following_count": 3
    })
}

#[allow(dead_code)]
pub fn post_json(id: u64, author_id: u64, content: &str, likes: u32, liked: bool) -> Value {
    json!({
        "post_id": id,
        "user_id": author_id,
        "content": content,
        "created_at": "2026-10-01T12:00:00Z",
        "likes_nbr": likes,
        "comments_nbr": 1,
        "is_liked_by_me": liked
    })
}

#[allow(dead_code)]
pub fn comment_json(id: u64, post_id: u64, content: &str) -> Value {
    json!({
        "comment_id": id,
        "post_id": post_id,
        "user_id": 1,
        "username": "alice",
        "comment_payload": content,
        "created_at": "2026-10-01T12:05:00Z",
        "likes_nbr": 0
    })
}

/// Script the login flow for user 1 ("alice") with token `T` and a feed
/// holding post 42.
#[allow(dead_code)]
pub fn script_login(backend: &FakeBackend) {
    backend.on(
        "POST",
        "/auth/login",
        Reply::ok(json!({ "access_token": "T", "user": user_json(1, "alice") })),
    );
    backend.on("GET", "/users/profile/1", Reply::ok(user_json(1, "alice")));
    backend.on(
        "GET",
        "/feed/",
        Reply::ok(json!([post_json(42, 2, "hello", 4, false)])),
    );
}

/// A controller logged in as alice against `backend`, plus its store.
#[allow(dead_code)]
pub async fn logged_in(backend: &FakeBackend, config: Config) -> (Controller<MemoryStore>, MemoryStore) {
    script_login(backend);
    let store = MemoryStore::new();
    let controller = Controller::new(&config, store.clone());
    controller
        .login("alice@example.com", "pw")
        .await
        .expect("login should succeed");
    backend.clear_requests();
    (controller, store)
}
