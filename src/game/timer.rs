//! Cancellable deadline slots.
//!
//! A [`Timer`] holds at most one pending deadline together with its payload.
//! Arming replaces whatever was pending, and every arm gets a fresh
//! [`TimerId`], so a handle captured before a re-arm or a cancel can never
//! fire the newer instance.

use std::time::{Duration, Instant};

/// Identity of one armed instance of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Armed<T> {
    id: TimerId,
    started_at: Instant,
    deadline: Instant,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Timer<T> {
    armed: Option<Armed<T>>,
    next_id: u64,
}

impl<T> Timer<T> {
    pub fn new() -> Self {
        Self {
            armed: None,
            next_id: 0,
        }
    }

    /// Cancel any pending instance, then schedule `payload` to fire `after` from `now`
    pub fn arm(&mut self, now: Instant, after: Duration, payload: T) -> TimerId {
        self.cancel();
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed = Some(Armed {
            id,
            started_at: now,
            deadline: now + after,
            payload,
        });
        id
    }

    /// Drop the pending instance, returning its payload
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|armed| armed.payload)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn id(&self) -> Option<TimerId> {
        self.armed.as_ref().map(|armed| armed.id)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|armed| armed.deadline)
    }

    pub fn payload(&self) -> Option<&T> {
        self.armed.as_ref().map(|armed| &armed.payload)
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Share of the armed duration still left, in `0.0..=1.0`
    pub fn remaining_fraction(&self, now: Instant) -> Option<f32> {
        let armed = self.armed.as_ref()?;
        let total = armed.deadline.saturating_duration_since(armed.started_at);
        if total.is_zero() {
            return Some(0.0);
        }
        let left = armed.deadline.saturating_duration_since(now);
        Some((left.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0))
    }

    /// Fire the pending instance if its deadline has been reached
    pub fn fire_if_due(&mut self, now: Instant) -> Option<T> {
        match &self.armed {
            Some(armed) if armed.deadline <= now => self.cancel(),
            _ => None,
        }
    }

    /// Fire the instance identified by `id`, if it is still the pending one and due.
    /// Stale ids are ignored.
    pub fn fire(&mut self, id: TimerId, now: Instant) -> Option<T> {
        match &self.armed {
            Some(armed) if armed.id == id && armed.deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self::new()
    }
}
