//! Sliding Window Store
//!
//! Per-instrument history of recent events that met the retention
//! threshold. Each history is bounded twice:
//! - by age: entries older than `retention_ms` before the newest timestamp
//!   the history has seen are pruned from the front on every insert
//! - by count: oldest entries are evicted first once `max_len` is reached
//!
//! Histories live in a `DashMap`, so concurrent writers for different
//! instruments only contend when they hash to the same shard.
//!
//! Whole histories that stop receiving entries can be swept with
//! `evict_idle`, which looks at wall-clock time since each history's last
//! insert. Event timestamps are only ever compared within one history.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use liqwatch_core::{Notional, Side, Symbol, TimestampMs};
use log::trace;

/// One retained event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    pub timestamp_ms: TimestampMs,
    pub notional: Notional,
    pub side: Side,
}

/// Eviction settings shared by every history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Max age relative to the newest timestamp seen (lookback × prune factor)
    pub retention_ms: i64,
    /// Hard cap on entries per instrument
    pub max_len: usize,
}

#[derive(Debug)]
struct InstrumentHistory {
    /// Arrival order; timestamps are not re-sorted
    entries: VecDeque<WindowEntry>,
    /// High-water mark of recorded timestamps, the history's notion of "now"
    newest_ms: TimestampMs,
    /// Wall-clock time of the last insert
    touched: Instant,
}

impl InstrumentHistory {
    fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            newest_ms: 0,
            touched: Instant::now(),
        }
    }

    /// Prune, enforce the cap, then append. Returns false when the entry is
    /// already older than the retention horizon and was not stored.
    fn record(&mut self, entry: WindowEntry, policy: &RetentionPolicy) -> bool {
        self.touched = Instant::now();
        self.newest_ms = self.newest_ms.max(entry.timestamp_ms);
        let cutoff = self.newest_ms.saturating_sub(policy.retention_ms);

        while self
            .entries
            .front()
            .is_some_and(|front| front.timestamp_ms < cutoff)
        {
            self.entries.pop_front();
        }

        if entry.timestamp_ms < cutoff {
            return false;
        }

        while self.entries.len() >= policy.max_len {
            self.entries.pop_front();
        }

        self.entries.push_back(entry);
        true
    }

    fn select(&self, keep: impl Fn(TimestampMs) -> bool) -> Vec<WindowEntry> {
        self.entries
            .iter()
            .filter(|e| keep(e.timestamp_ms))
            .copied()
            .collect()
    }
}

/// Bounded per-instrument event histories
pub struct SlidingWindowStore {
    histories: DashMap<Symbol, InstrumentHistory>,
    policy: RetentionPolicy,
}

impl SlidingWindowStore {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            histories: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Append an event to the instrument's history, creating it on first use
    pub fn record(
        &self,
        instrument: &str,
        timestamp_ms: TimestampMs,
        notional: Notional,
        side: Side,
    ) -> bool {
        let entry = WindowEntry {
            timestamp_ms,
            notional,
            side,
        };

        let stored = match self.histories.get_mut(instrument) {
            Some(mut history) => history.record(entry, &self.policy),
            None => self
                .histories
                .entry(instrument.to_string())
                .or_insert_with(InstrumentHistory::new)
                .record(entry, &self.policy),
        };

        if !stored {
            trace!(
                "{}: entry at {} already beyond retention, not stored",
                instrument, timestamp_ms
            );
        }
        stored
    }

    /// Snapshot of entries with `after_ms < ts < before_ms`
    pub fn query(
        &self,
        instrument: &str,
        before_ms: TimestampMs,
        after_ms: TimestampMs,
    ) -> Vec<WindowEntry> {
        self.histories
            .get(instrument)
            .map(|h| h.select(|ts| ts > after_ms && ts < before_ms))
            .unwrap_or_default()
    }

    /// Snapshot of entries with `after_ms < ts <= through_ms`
    ///
    /// Everything in a history arrived before the caller's current event, so
    /// entries sharing `through_ms` are earlier arrivals and belong in it.
    pub fn query_through(
        &self,
        instrument: &str,
        through_ms: TimestampMs,
        after_ms: TimestampMs,
    ) -> Vec<WindowEntry> {
        self.histories
            .get(instrument)
            .map(|h| h.select(|ts| ts > after_ms && ts <= through_ms))
            .unwrap_or_default()
    }

    /// Entries currently held for an instrument
    pub fn len(&self, instrument: &str) -> usize {
        self.histories
            .get(instrument)
            .map(|h| h.entries.len())
            .unwrap_or(0)
    }

    /// Number of instruments with a history
    pub fn instrument_count(&self) -> usize {
        self.histories.len()
    }

    /// Entries held across all instruments
    pub fn total_entries(&self) -> usize {
        self.histories.iter().map(|h| h.entries.len()).sum()
    }

    /// Retention horizon as wall-clock time, the default idle limit
    pub fn idle_horizon(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.policy.retention_ms).unwrap_or(0))
    }

    /// Drop whole histories that received nothing for `max_idle`.
    /// Returns the number of histories removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle)
    }

    /// `evict_idle` against an explicit wall-clock instant
    pub fn evict_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let before = self.histories.len();
        self.histories
            .retain(|_, h| now.saturating_duration_since(h.touched) < max_idle);
        before.saturating_sub(self.histories.len())
    }
}
