//! Delayed callbacks driven by [`GameTime`].
//!
//! Timers carry a payload instead of a closure: [`TimerQueue::tick`] hands the
//! payloads of every timer that fired back to the owner, which then acts on
//! them with whatever state it has at hand.

use std::time::Duration;

use crate::time::GameTime;

/// Which clock a timer counts down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Game time. Stops while the game is paused or the time scale is zero.
    Scaled,
    /// Real time. Always advances, regardless of pause or time scale.
    Real,
}

/// Whether a timer fires once or keeps firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Once,
    Repeating,
}

/// Handle to a scheduled timer, used to cancel or inspect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TimerHandle,
    duration: Duration,
    elapsed: Duration,
    clock: Clock,
    mode: TimerMode,
    payload: T,
}

/// A set of pending timers.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule a timer that fires after `delay` on the given clock.
    pub fn schedule(&mut self, delay: Duration, clock: Clock, mode: TimerMode, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            duration: delay,
            elapsed: Duration::ZERO,
            clock,
            mode,
            payload,
        });
        handle
    }

    /// Schedule a one-shot timer.
    pub fn once(&mut self, delay: Duration, clock: Clock, payload: T) -> TimerHandle {
        self.schedule(delay, clock, TimerMode::Once, payload)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Whether the timer is still waiting to fire (repeating timers stay pending).
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Time left until the timer next fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.duration.saturating_sub(e.elapsed))
    }

    /// Advance all timers by this frame's deltas and return the payloads of
    /// those that fired, in scheduling order.
    ///
    /// A repeating timer fires at most once per tick; leftover time carries
    /// over to its next period.
    pub fn tick(&mut self, time: &GameTime) -> Vec<T> {
        let scaled = time.scaled_delta();
        let real = time.real_delta();

        let mut fired = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.elapsed = entry.elapsed.saturating_add(match entry.clock {
                Clock::Scaled => scaled,
                Clock::Real => real,
            });
            if entry.elapsed < entry.duration {
                return true;
            }
            fired.push(entry.payload.clone());
            match entry.mode {
                TimerMode::Once => false,
                TimerMode::Repeating => {
                    entry.elapsed = entry.elapsed.saturating_sub(entry.duration);
                    true
                }
            }
        });
        fired
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
