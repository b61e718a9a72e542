// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entity identifiers.
//!
//! Backends hand out either integer or UUID-string ids, so every id keeps
//! whichever form it arrived in and serializes back the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw id as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub RawId);

        impl $name {
            /// Id as a URL-safe path segment or query value.
            pub fn encoded(&self) -> String {
                urlencoding::encode(&self.0.to_string()).into_owned()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(RawId::Number(id))
            }
        }

        impl From<&str> for $name {
            /// Numeric strings become numeric ids.
            fn from(id: &str) -> Self {
                match id.parse::<u64>() {
                    Ok(n) => Self(RawId::Number(n)),
                    Err(_) => Self(RawId::Text(id.to_string())),
                }
            }
        }
    };
}

entity_id!(
    /// User id
    UserId
);
entity_id!(
    /// Post id
    PostId
);
entity_id!(
    /// Comment id
    CommentId
);
