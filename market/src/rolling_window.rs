use std::collections::VecDeque;

use crate::types::Sample;

pub const DEFAULT_MAX_AGE_MS: u64 = 300_000;

/// How the window decides which samples to drop from the front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Drop samples older than `max_age_ms` relative to the newest push.
    MaxAge { max_age_ms: u64 },

    /// Keep at most `capacity` samples, regardless of their age.
    MaxSamples { capacity: usize },
}

impl RetentionPolicy {
    /// Capacity-bounded variant sized as `window / interval` samples.
    pub fn samples_for(window_ms: u64, interval_ms: u64) -> Self {
        let capacity = window_ms.checked_div(interval_ms).unwrap_or(0).max(1);
        RetentionPolicy::MaxSamples {
            capacity: capacity as usize,
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::MaxAge {
            max_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }
}

/// Minimum history before the window is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Warmup {
    pub min_samples: usize,
    pub min_span_ms: u64,
}

impl Default for Warmup {
    fn default() -> Self {
        Self {
            min_samples: 2,
            min_span_ms: 0,
        }
    }
}

/// A sample tagged with its insertion sequence, so the min/max queues can
/// recognise evictions even when timestamps repeat.
#[derive(Clone, Copy, Debug)]
struct Entry {
    seq: u64,
    sample: Sample,
}

/// Rolling window of price samples with monotonic min/max queues for O(1)
/// range lookups.
///
/// Timestamps are kept non-decreasing: a push whose timestamp is older than
/// the last accepted one is clamped to that timestamp instead of rejected.
#[derive(Debug)]
pub struct SampleWindow {
    /// All samples in the window (ordered by time)
    samples: VecDeque<Entry>,

    /// Decreasing prices; front is the window maximum
    max_queue: VecDeque<Entry>,

    /// Increasing prices; front is the window minimum
    min_queue: VecDeque<Entry>,

    policy: RetentionPolicy,
    next_seq: u64,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

impl SampleWindow {
    pub fn new(policy: RetentionPolicy) -> Self {
        let policy = match policy {
            RetentionPolicy::MaxSamples { capacity } => RetentionPolicy::MaxSamples {
                capacity: capacity.max(1),
            },
            other => other,
        };

        Self {
            samples: VecDeque::new(),
            max_queue: VecDeque::new(),
            min_queue: VecDeque::new(),
            policy,
            next_seq: 0,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Append a sample and evict everything the retention policy no longer
    /// allows. Returns the sample as stored (after timestamp clamping).
    pub fn push(&mut self, ts_ms: u64, price: f64) -> Sample {
        let ts_ms = match self.samples.back() {
            Some(last) if ts_ms < last.sample.ts_ms => last.sample.ts_ms,
            _ => ts_ms,
        };

        let entry = Entry {
            seq: self.next_seq,
            sample: Sample::new(ts_ms, price),
        };
        self.next_seq += 1;

        self.samples.push_back(entry);

        while let Some(back) = self.max_queue.back() {
            if back.sample.price < price {
                self.max_queue.pop_back();
            } else {
                break;
            }
        }
        self.max_queue.push_back(entry);

        while let Some(back) = self.min_queue.back() {
            if back.sample.price > price {
                self.min_queue.pop_back();
            } else {
                break;
            }
        }
        self.min_queue.push_back(entry);

        self.evict(ts_ms);

        entry.sample
    }

    fn evict(&mut self, now_ms: u64) {
        loop {
            let expired = match (self.policy, self.samples.front()) {
                (_, None) => false,
                (RetentionPolicy::MaxAge { max_age_ms }, Some(front)) => {
                    now_ms.saturating_sub(front.sample.ts_ms) > max_age_ms
                }
                (RetentionPolicy::MaxSamples { capacity }, Some(_)) => {
                    self.samples.len() > capacity
                }
            };

            if !expired {
                break;
            }

            let Some(removed) = self.samples.pop_front() else {
                break;
            };

            if self.max_queue.front().is_some_and(|m| m.seq == removed.seq) {
                self.max_queue.pop_front();
            }
            if self.min_queue.front().is_some_and(|m| m.seq == removed.seq) {
                self.min_queue.pop_front();
            }
        }
    }

    /// Ordered prices, oldest first.
    pub fn snapshot(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.samples.iter().map(|e| e.sample.price)
    }

    /// Ordered samples, oldest first.
    pub fn samples(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator + '_ {
        self.samples.iter().map(|e| &e.sample)
    }

    pub fn prices(&self) -> Vec<f64> {
        self.snapshot().collect()
    }

    pub fn oldest(&self) -> Option<Sample> {
        self.samples.front().map(|e| e.sample)
    }

    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().map(|e| e.sample)
    }

    pub fn max(&self) -> Option<f64> {
        self.max_queue.front().map(|e| e.sample.price)
    }

    pub fn min(&self) -> Option<f64> {
        self.min_queue.front().map(|e| e.sample.price)
    }

    /// Time covered by the retained samples.
    pub fn span_ms(&self) -> u64 {
        match (self.oldest(), self.latest()) {
            (Some(first), Some(last)) => last.ts_ms - first.ts_ms,
            _ => 0,
        }
    }

    /// Enough samples, spread over enough time, to be scored.
    pub fn is_warm(&self, warmup: Warmup) -> bool {
        self.len() >= warmup.min_samples && self.span_ms() >= warmup.min_span_ms
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
