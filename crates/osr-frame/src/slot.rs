#![forbid(unsafe_code)]

//! Latest-value slot.
//!
//! One writer (the engine's paint thread) publishes, any number of readers
//! (the render thread) look at the newest value. Nothing is queued: a value
//! published before the previous one was consumed replaces it.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `publish` | one `Arc` allocation, atomic swap |
//! | `latest` / `poll` | wait-free load |
//! | `clear` | atomic swap |
//!
//! Every published value carries a sequence number. Readers remember the
//! last number they consumed and [`LatestSlot::poll`] only returns newer
//! values. Concurrent publishers never move the slot backwards: a value with
//! a lower sequence number than the one already stored is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;

/// A published value and its sequence number.
#[derive(Debug, PartialEq)]
pub struct Stamped<T> {
    pub seq: u64,
    pub value: T,
}

pub struct LatestSlot<T> {
    inner: ArcSwapOption<Stamped<T>>,
    next_seq: AtomicU64,
    consumed: AtomicU64,
    superseded: AtomicU64,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: ArcSwapOption::empty(),
            next_seq: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
        }
    }

    /// Replace the current value. Returns the new sequence number.
    pub fn publish(&self, value: T) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        let stamped = Arc::new(Stamped { seq, value });
        let previous = self.inner.rcu(|current| match current {
            Some(cur) if cur.seq > seq => Some(Arc::clone(cur)),
            _ => Some(Arc::clone(&stamped)),
        });
        if let Some(prev) = previous
            && prev.seq < seq
            && prev.seq > self.consumed.load(Ordering::Acquire)
        {
            self.superseded.fetch_add(1, Ordering::Relaxed);
        }
        seq
    }

    /// Newest value, consumed or not.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Stamped<T>>> {
        self.inner.load_full()
    }

    /// Newest value if its sequence number is above `since`. Marks it as
    /// consumed.
    pub fn poll(&self, since: u64) -> Option<Arc<Stamped<T>>> {
        let current = self.inner.load_full()?;
        if current.seq <= since {
            return None;
        }
        self.consumed.fetch_max(current.seq, Ordering::AcqRel);
        Some(current)
    }

    /// Drop the current value. Returns `true` if there was one.
    pub fn clear(&self) -> bool {
        self.inner.swap(None).is_some()
    }

    /// Sequence number of the last publish (0 if none).
    #[must_use]
    pub fn last_seq(&self) -> u64 {
        self.next_seq.load(Ordering::Acquire)
    }

    /// Values replaced before any reader consumed them.
    #[must_use]
    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }
}

impl<T> std::fmt::Debug for LatestSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestSlot")
            .field("last_seq", &self.last_seq())
            .field("superseded", &self.superseded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn empty_slot() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        assert!(slot.latest().is_none());
        assert!(slot.poll(0).is_none());
        assert!(!slot.clear());
        assert_eq!(slot.last_seq(), 0);
    }

    #[test]
    fn second_publish_replaces_first() {
        let slot = LatestSlot::new();
        assert_eq!(slot.publish("a"), 1);
        assert_eq!(slot.publish("b"), 2);
        let got = slot.poll(0).expect("value");
        assert_eq!(got.value, "b");
        assert_eq!(got.seq, 2);
        assert_eq!(slot.superseded(), 1);
    }

    #[test]
    fn poll_only_returns_newer() {
        let slot = LatestSlot::new();
        let seq = slot.publish(1u8);
        assert!(slot.poll(seq).is_none());
        slot.publish(2);
        assert_eq!(slot.poll(seq).map(|s| s.value), Some(2));
    }

    #[test]
    fn consumed_values_are_not_counted_superseded() {
        let slot = LatestSlot::new();
        slot.publish(1u8);
        slot.poll(0);
        slot.publish(2);
        assert_eq!(slot.superseded(), 0);
    }

    #[test]
    fn clear_empties_slot_but_keeps_sequence() {
        let slot = LatestSlot::new();
        slot.publish(1u8);
        assert!(slot.clear());
        assert!(slot.latest().is_none());
        assert_eq!(slot.publish(2), 2);
    }

    #[test]
    fn concurrent_publishers_never_regress() {
        let slot = Arc::new(LatestSlot::new());
        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..1_000u32 {
                        slot.publish(i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("publisher panicked");
        }
        let latest = slot.latest().expect("value");
        assert_eq!(latest.seq, 4_000);
        assert_eq!(slot.last_seq(), 4_000);
    }
}
