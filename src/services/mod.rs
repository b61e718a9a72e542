// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - HTTP access to the social API.

pub mod gateway;
pub mod social;

pub use gateway::{ApiGateway, ParsedBody, Payload};
pub use social::SocialApi;
