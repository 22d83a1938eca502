//! Like reconciliation.
//!
//! Per-activity state machine with two states: `Idle` and `Pending` (an
//! optimistic round-trip in flight, carrying the snapshot to restore on
//! failure). The like count is globally shared; "is liked by me" belongs
//! to the current user alone and is never overwritten by someone else's
//! broadcast.

use std::collections::HashMap;

use domains::models::{ActivityId, LikeBroadcast, LikeState, LikeStatus, UserId};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Idle {
        count: u32,
        liked: bool,
    },
    Pending {
        count: u32,
        liked: bool,
        prev_count: u32,
        prev_liked: bool,
    },
}

/// Receipt for one in-flight toggle round-trip; consumed by exactly one of
/// [`LikeReconciler::confirm`] or [`LikeReconciler::rollback`].
#[derive(Debug)]
pub struct ToggleTicket {
    activity_id: ActivityId,
}

impl ToggleTicket {
    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }
}

pub struct LikeReconciler {
    current_user: UserId,
    slots: HashMap<ActivityId, Slot>,
}

impl LikeReconciler {
    pub fn new(current_user: UserId) -> Self {
        Self {
            current_user,
            slots: HashMap::new(),
        }
    }

    /// Installs the server-confirmed initial status for an activity. Never
    /// clobbers a `Pending` slot: the in-flight toggle's resolution is
    /// fresher than a page-load status.
    pub fn seed(&mut self, status: LikeStatus) {
        match self.slots.get(&status.activity_id) {
            Some(Slot::Pending { .. }) => {}
            _ => {
                self.slots.insert(
                    status.activity_id,
                    Slot::Idle {
                        count: status.like_count,
                        liked: status.is_liked,
                    },
                );
            }
        }
    }

    /// Applies the optimistic mutation and moves the slot to `Pending`.
    /// Returns `None` while a round-trip is already in flight; the caller
    /// treats that as a no-op, exactly like a disabled button.
    pub fn begin_toggle(&mut self, id: ActivityId) -> Option<(ToggleTicket, LikeState)> {
        let slot = self
            .slots
            .entry(id)
            .or_insert(Slot::Idle { count: 0, liked: false });
        match *slot {
            Slot::Pending { .. } => None,
            Slot::Idle { count, liked } => {
                let guess = if liked {
                    count.saturating_sub(1)
                } else {
                    count + 1
                };
                *slot = Slot::Pending {
                    count: guess,
                    liked: !liked,
                    prev_count: count,
                    prev_liked: liked,
                };
                debug!(activity = id, count = guess, liked = !liked, "optimistic toggle");
                Some((
                    ToggleTicket { activity_id: id },
                    LikeState {
                        like_count: guess,
                        is_liked: !liked,
                        is_loading: true,
                    },
                ))
            }
        }
    }

    /// Adopts the server-confirmed state verbatim, discarding the
    /// optimistic guess. The server wins even when it disagrees with the
    /// guess, e.g. after a race with another session.
    pub fn confirm(&mut self, ticket: ToggleTicket, status: LikeStatus) -> LikeState {
        self.slots.insert(
            ticket.activity_id,
            Slot::Idle {
                count: status.like_count,
                liked: status.is_liked,
            },
        );
        self.state(ticket.activity_id)
    }

    /// Restores the pre-toggle snapshot exactly. If a broadcast of our own
    /// action already resolved the slot, there is nothing left to undo.
    pub fn rollback(&mut self, ticket: ToggleTicket) -> LikeState {
        if let Some(slot) = self.slots.get_mut(&ticket.activity_id) {
            if let Slot::Pending {
                prev_count,
                prev_liked,
                ..
            } = *slot
            {
                *slot = Slot::Idle {
                    count: prev_count,
                    liked: prev_liked,
                };
                debug!(activity = ticket.activity_id, "toggle rolled back");
            }
        }
        self.state(ticket.activity_id)
    }

    /// Merge rule for an out-of-band update. Our own user id means the
    /// broadcast confirms an action of ours performed elsewhere: adopt both
    /// fields and clear any in-flight `Pending`. A foreign user id may only
    /// move the shared count.
    pub fn apply_broadcast(&mut self, broadcast: &LikeBroadcast) {
        let slot = self
            .slots
            .entry(broadcast.activity_id)
            .or_insert(Slot::Idle { count: 0, liked: false });
        if broadcast.user_id == self.current_user {
            *slot = Slot::Idle {
                count: broadcast.like_count,
                liked: broadcast.is_liked,
            };
        } else {
            match slot {
                Slot::Idle { count, .. } => *count = broadcast.like_count,
                Slot::Pending { count, .. } => *count = broadcast.like_count,
            }
        }
    }

    pub fn state(&self, id: ActivityId) -> LikeState {
        match self.slots.get(&id) {
            None => LikeState::default(),
            Some(Slot::Idle { count, liked }) => LikeState {
                like_count: *count,
                is_liked: *liked,
                is_loading: false,
            },
            Some(Slot::Pending { count, liked, .. }) => LikeState {
                like_count: *count,
                is_liked: *liked,
                is_loading: true,
            },
        }
    }

    /// Discards all slots; used when the filter context changes.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
