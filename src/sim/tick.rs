//! Fixed timestep clock and tick subscriptions
//!
//! Frame time is accumulated and released as whole fixed ticks, capped per
//! frame to prevent a spiral of death. Every released tick is delivered to the
//! inbox of each live `TickSubscription`; a component only sees ticks while it
//! holds one. Dropping the subscription deregisters it, so every exit path of
//! the owner stops delivery.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::consts::{FIXED_DT, MAX_TICKS_PER_FRAME};

type Inbox = Rc<RefCell<VecDeque<f32>>>;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    inboxes: Vec<(u64, Inbox)>,
}

impl Registry {
    fn deliver(&self, now: f32) {
        for (_, inbox) in &self.inboxes {
            inbox.borrow_mut().push_back(now);
        }
    }
}

#[derive(Debug)]
pub struct TickSource {
    fixed_dt: f32,
    max_ticks_per_frame: u32,
    accumulator: f32,
    /// Ticks released by `advance` but not yet consumed
    pending: u32,
    tick_count: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new(FIXED_DT, MAX_TICKS_PER_FRAME)
    }
}

impl TickSource {
    pub fn new(fixed_dt: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            fixed_dt,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: 0.0,
            pending: 0,
            tick_count: 0,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Simulated time of the last tick
    pub fn now(&self) -> f32 {
        self.tick_count as f32 * self.fixed_dt
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Feed elapsed frame time; returns how many ticks are now due
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.fixed_dt && due < self.max_ticks_per_frame {
            self.accumulator -= self.fixed_dt;
            due += 1;
        }
        if self.accumulator >= self.fixed_dt {
            log::debug!(
                "Dropping {:.3}s of frame time (tick cap {})",
                self.accumulator,
                self.max_ticks_per_frame
            );
            self.accumulator %= self.fixed_dt;
        }
        self.pending += due;
        due
    }

    /// Consume one due tick, delivering it to subscribers
    pub fn next_tick(&mut self) -> Option<f32> {
        if self.pending == 0 {
            return None;
        }
        self.pending -= 1;
        Some(self.tick())
    }

    /// Advance exactly one tick regardless of frame time (headless driving)
    pub fn tick(&mut self) -> f32 {
        self.tick_count += 1;
        let now = self.now();
        self.registry.borrow().deliver(now);
        now
    }

    pub fn handle(&self) -> TickHandle {
        TickHandle {
            registry: Rc::clone(&self.registry),
        }
    }

    /// Components currently registered for per-tick updates
    pub fn active_subscriptions(&self) -> usize {
        self.registry.borrow().inboxes.len()
    }
}

/// Cheap handle given to components at construction
#[derive(Debug, Clone)]
pub struct TickHandle {
    registry: Rc<RefCell<Registry>>,
}

impl TickHandle {
    /// Register for ticks released from now on
    pub fn subscribe(&self) -> TickSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let inbox = Inbox::default();
        registry.inboxes.push((id, Rc::clone(&inbox)));
        TickSubscription {
            id,
            inbox,
            registry: Rc::clone(&self.registry),
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.registry.borrow().inboxes.len()
    }
}

/// Registration for per-tick updates, released on drop
#[derive(Debug)]
pub struct TickSubscription {
    id: u64,
    inbox: Inbox,
    registry: Rc<RefCell<Registry>>,
}

impl TickSubscription {
    /// Oldest delivered tick not yet taken
    pub fn next_tick(&self) -> Option<f32> {
        self.inbox.borrow_mut().pop_front()
    }

    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        let id = self.id;
        self.registry
            .borrow_mut()
            .inboxes
            .retain(|(other, _)| *other != id);
    }
}
