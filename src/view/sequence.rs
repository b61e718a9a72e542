// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-entity request sequencing for toggle actions.
//!
//! Each toggle request takes a ticket from a monotonic counter keyed by the
//! entity. When a response comes back, only the holder of the newest ticket
//! may apply it; older responses are stale.

use crate::models::{CommentId, PostId, UserId};
use std::collections::HashMap;

/// Entity a toggle acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToggleTarget {
    PostLike(PostId),
    CommentLike(CommentId),
    Follow(UserId),
}

/// Proof of which request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    target: ToggleTarget,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: HashMap<ToggleTarget, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `target`.
    pub fn issue(&mut self, target: ToggleTarget) -> Ticket {
        let seq = self.latest.entry(target.clone()).or_insert(0);
        *seq += 1;
        Ticket { target, seq: *seq }
    }

    /// Whether `ticket` is still the newest request for its entity.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.target) == Some(&ticket.seq)
    }
}
