//! Cooldown gate
//!
//! Read-then-arm protocol: `arm` only takes effect when the immediately
//! preceding `is_ready` query said yes, so a rejected request can never push
//! the cooldown window further out.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateLimiter {
    next_allowed_time: f32,
    last_query_was_ready: bool,
}

impl RateLimiter {
    /// Open immediately (`next_allowed_time = 0`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed until `time`
    pub fn starting_at(time: f32) -> Self {
        Self {
            next_allowed_time: time,
            last_query_was_ready: false,
        }
    }

    /// True iff `now >= next_allowed_time`; remembered for the next `arm`
    pub fn is_ready(&mut self, now: f32) -> bool {
        self.last_query_was_ready = now >= self.next_allowed_time;
        self.last_query_was_ready
    }

    /// Start a cooldown of `cooldown` seconds, if the last query was ready
    pub fn arm(&mut self, now: f32, cooldown: f32) {
        if self.last_query_was_ready {
            self.next_allowed_time = now + cooldown;
        }
    }

    pub fn next_allowed_time(&self) -> f32 {
        self.next_allowed_time
    }

    pub fn last_query_was_ready(&self) -> bool {
        self.last_query_was_ready
    }

    /// Seconds until ready (0 when already open)
    pub fn remaining(&self, now: f32) -> f32 {
        (self.next_allowed_time - now).max(0.0)
    }
}
