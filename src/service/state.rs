use std::time::{Duration, Instant};

use crate::session::Session;

/// A stored session. Finished sessions drop their table and keep only a
/// marker, so later calls can still answer "finished".
pub(crate) enum Slot {
    Live(Session),
    Finished,
}

pub(crate) struct SessionState {
    pub slot: Slot,
    pub last_access: Instant,
}

impl SessionState {
    pub fn new(session: Session) -> Self {
        Self {
            slot: Slot::Live(session),
            last_access: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_access) > ttl
    }

    pub fn is_live(&self) -> bool {
        matches!(self.slot, Slot::Live(_))
    }
}
