//! Shared flags and their delayed mirrors.
//!
//! ## Usage
//!
//! A [`Signal`] holds the authoritative value of a page-wide flag, such as the
//! active theme. Components that must lag behind a change, for example to let
//! a reveal animation cover the page before their own colors flip, subscribe a
//! [`Deferred`] mirror with a fixed delay instead of running their own timers.
//!
//! ```
//! use std::time::Duration;
//! use vitrine_ui::Signal;
//!
//! let dark = Signal::new(false);
//! let mut mirror = dark.subscribe_deferred(Duration::from_millis(500));
//!
//! dark.set(true, 0);
//! assert!(!mirror.poll(400_000_000));
//! assert!(!*mirror.value());
//! assert!(mirror.poll(500_000_000));
//! assert!(*mirror.value());
//! ```

use std::{
    collections::VecDeque,
    sync::{Arc, Weak},
    time::Duration,
};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::frame::nanos_from_duration;

/// Changes waiting for one mirror, oldest first.
struct ChangeQueue<T> {
    delay_nanos: u64,
    changes: Mutex<VecDeque<(u64, T)>>,
}

impl<T> ChangeQueue<T> {
    /// Queues a change made at `frame_nanos`.
    ///
    /// Changes that were due by then and are already superseded by a later
    /// due change are dropped, so a mirror that is never polled holds at most
    /// one due change plus the changes of the last `delay`.
    fn push(&self, frame_nanos: u64, value: T) {
        let mut changes = self.changes.lock();
        changes.push_back((frame_nanos, value));
        while changes.get(1).is_some_and(|(changed_at, _)| {
            changed_at.saturating_add(self.delay_nanos) <= frame_nanos
        }) {
            changes.pop_front();
        }
    }
}

struct SignalInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<ChangeQueue<T>>>,
}

/// Cloneable handle to a shared value.
///
/// All clones observe the same value. Every change is timestamped with the
/// frame it happened on and forwarded to the live [`Deferred`] subscribers.
pub struct Signal<T> {
    inner: Arc<RwLock<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T> Signal<T>
where
    T: Clone + PartialEq,
{
    /// Creates a signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SignalInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.read().value.clone()
    }

    /// Execute a closure with a shared reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read().value)
    }

    /// Number of changes applied so far.
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Replaces the value, recording the change at `frame_nanos`.
    ///
    /// Setting an equal value is a no-op and returns `false`.
    pub fn set(&self, value: T, frame_nanos: u64) -> bool {
        let mut inner = self.inner.write();
        if inner.value == value {
            return false;
        }
        inner.value = value.clone();
        inner.version += 1;
        trace!(version = inner.version, frame_nanos, "signal changed");
        inner.subscribers.retain(|subscriber| match subscriber.upgrade() {
            Some(queue) => {
                queue.push(frame_nanos, value.clone());
                true
            }
            None => false,
        });
        true
    }

    /// Subscribes a mirror that reflects every change `delay` after it
    /// happened.
    pub fn subscribe_deferred(&self, delay: Duration) -> Deferred<T> {
        let queue = Arc::new(ChangeQueue {
            delay_nanos: nanos_from_duration(delay),
            changes: Mutex::new(VecDeque::new()),
        });
        let mut inner = self.inner.write();
        inner.subscribers.push(Arc::downgrade(&queue));
        Deferred {
            current: inner.value.clone(),
            queue,
        }
    }

    /// Number of mirrors that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .read()
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.strong_count() > 0)
            .count()
    }
}

/// A delayed, read-only mirror of a [`Signal`].
///
/// The mirror is not authoritative: it trails the signal by a fixed delay and
/// applies changes in the order they happened. Dropping it unsubscribes.
///
/// Poll it every frame. An unpolled mirror keeps only the latest change that
/// is already due, so its memory stays bounded by the changes made within one
/// delay.
pub struct Deferred<T> {
    current: T,
    queue: Arc<ChangeQueue<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("current", &self.current)
            .field("delay_nanos", &self.queue.delay_nanos)
            .field("pending", &self.queue.changes.lock().len())
            .finish()
    }
}

impl<T> Deferred<T> {
    /// Applies every change whose delay has elapsed at `frame_nanos`.
    ///
    /// Returns `true` when the mirrored value changed.
    pub fn poll(&mut self, frame_nanos: u64) -> bool {
        let mut queue = self.queue.changes.lock();
        let mut changed = false;
        while let Some((changed_at, _)) = queue.front() {
            if changed_at.saturating_add(self.queue.delay_nanos) > frame_nanos {
                break;
            }
            if let Some((_, value)) = queue.pop_front() {
                self.current = value;
                changed = true;
            }
        }
        changed
    }

    /// The mirrored value as of the last [`poll`](Self::poll).
    pub fn value(&self) -> &T {
        &self.current
    }

    /// Whether changes are still waiting for their delay to elapse.
    pub fn is_pending(&self) -> bool {
        !self.queue.changes.lock().is_empty()
    }

    /// The configured lag.
    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.queue.delay_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn mirror_starts_at_current_value() {
        let signal = Signal::new(3u32);
        let mirror = signal.subscribe_deferred(Duration::from_millis(100));
        assert_eq!(*mirror.value(), 3);
        assert!(!mirror.is_pending());
    }

    #[test]
    fn changes_land_after_delay_in_order() {
        let signal = Signal::new(false);
        let mut mirror = signal.subscribe_deferred(Duration::from_millis(500));

        assert!(signal.set(true, 0));
        assert!(signal.set(false, 100 * MS));

        assert!(!mirror.poll(499 * MS));
        assert!(!*mirror.value());

        assert!(mirror.poll(500 * MS));
        assert!(*mirror.value());
        assert!(mirror.is_pending());

        assert!(mirror.poll(600 * MS));
        assert!(!*mirror.value());
        assert!(!mirror.is_pending());
    }

    #[test]
    fn setting_equal_value_is_noop() {
        let signal = Signal::new(1);
        let mut mirror = signal.subscribe_deferred(Duration::ZERO);
        assert!(!signal.set(1, 0));
        assert_eq!(signal.version(), 0);
        assert!(!mirror.poll(10));
    }

    #[test]
    fn independent_mirrors_have_independent_delays() {
        let signal = Signal::new(0);
        let mut fast = signal.subscribe_deferred(Duration::from_millis(10));
        let mut slow = signal.subscribe_deferred(Duration::from_millis(500));

        signal.set(7, 0);
        fast.poll(20 * MS);
        slow.poll(20 * MS);
        assert_eq!(*fast.value(), 7);
        assert_eq!(*slow.value(), 0);
        assert_eq!(signal.get(), 7);
    }

    #[test]
    fn unpolled_mirror_stays_bounded() {
        let signal = Signal::new(0u64);
        let mut mirror = signal.subscribe_deferred(Duration::from_millis(500));

        // Ten seconds of changes, one per frame, without polling.
        for frame in 1..=600u64 {
            signal.set(frame, frame * 16 * MS);
        }
        let queued = mirror.queue.changes.lock().len();
        assert!(queued <= 33, "{queued} changes queued");

        // The latest due change still lands, followed by the rest in order.
        assert!(mirror.poll(600 * 16 * MS));
        let due = *mirror.value();
        assert!(due < 600 && due >= 568, "{due}");
        assert!(mirror.poll(600 * 16 * MS + 500 * MS));
        assert_eq!(*mirror.value(), 600);
        assert!(!mirror.is_pending());
    }

    #[test]
    fn dropped_mirrors_unsubscribe() {
        let signal = Signal::new(0);
        let mirror = signal.subscribe_deferred(Duration::from_millis(10));
        let other = signal.clone().subscribe_deferred(Duration::from_millis(10));
        assert_eq!(signal.subscriber_count(), 2);

        drop(mirror);
        assert_eq!(signal.subscriber_count(), 1);
        signal.set(1, 0);
        assert_eq!(signal.inner.read().subscribers.len(), 1);
        drop(other);
    }
}
