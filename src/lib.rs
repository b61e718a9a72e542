// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social client: session and view-state synchronization for a social
//! networking REST API.
//!
//! This crate keeps a client's authentication, active page and visible
//! posts/comments consistent with the backend across asynchronous round
//! trips. Rendering is left to the caller, which reads [`view::ViewState`]
//! and feeds user events to [`Controller::dispatch`].

pub mod banner;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod view;

pub use controller::{Action, Controller, Outcome};
