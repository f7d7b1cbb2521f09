//! Debounced Range Fetcher
//!
//! The fetch state machine, free of IO and timers so it can be driven by the
//! controller loop and exercised directly in tests.
//!
//! ```text
//!            set_desired            fire_timer           response
//!   Idle ───────────────▶ PendingFetch ─────────▶ InFlight ─────────▶ Settled
//!                             ▲   │ set_desired (re-arm)                  │
//!                             │   ▼                                       │
//!                             └───┴───────────── set_desired ◀────────────┘
//! ```
//!
//! Every request gets a sequence number from one counter. Data responses
//! are applied only when newer than the last applied one, so the cache never
//! moves backwards even if the store answers out of order. Count probes are
//! a separate stream: they only ever update the total count, and only when
//! nothing issued later has already done so.

use crate::domain::{FetchRange, RangePage};
use crate::error::Error;
use crate::viewport::cache::RowCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// How the last request settled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Error,
}

/// Observable state of the fetcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet
    Idle,
    /// Debounce deadline armed
    PendingFetch,
    /// At least one request outstanding
    InFlight,
    /// Everything answered
    Settled(FetchOutcome),
}

/// An issued window request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataTicket {
    pub seq: u64,
    pub range: FetchRange,
}

/// An issued count-only probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeTicket {
    pub seq: u64,
}

/// What happened to a data response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOutcome {
    /// Cache replaced
    Applied,
    /// A newer response was already applied, or the collection changed
    Stale,
    /// Request failed; cache untouched
    Failed,
}

/// Debounce, sequencing and cache ownership for one viewer
#[derive(Debug)]
pub struct DebouncedFetcher {
    debounce: Duration,
    /// Latest desired range, if any data is wanted
    desired: Option<FetchRange>,
    /// Pending debounce deadline
    deadline: Option<Instant>,
    next_seq: u64,
    in_flight: Vec<DataTicket>,
    probes_in_flight: Vec<u64>,
    /// Sequence of the last applied data response
    applied_seq: u64,
    /// Sequence of the request whose total count is current
    total_seq: u64,
    /// Responses below this sequence belong to a previous collection
    floor_seq: u64,
    cache: Arc<RowCache>,
    total_count: Option<usize>,
    last_error: Option<Arc<str>>,
    last_outcome: Option<FetchOutcome>,
}

impl DebouncedFetcher {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            desired: None,
            deadline: None,
            next_seq: 1,
            in_flight: Vec::new(),
            probes_in_flight: Vec::new(),
            applied_seq: 0,
            total_seq: 0,
            floor_seq: 1,
            cache: Arc::new(RowCache::new()),
            total_count: None,
            last_error: None,
            last_outcome: None,
        }
    }

    // ==================== Getters ====================

    pub fn phase(&self) -> FetchPhase {
        if self.deadline.is_some() {
            FetchPhase::PendingFetch
        } else if !self.in_flight.is_empty() || !self.probes_in_flight.is_empty() {
            FetchPhase::InFlight
        } else {
            match self.last_outcome {
                Some(outcome) => FetchPhase::Settled(outcome),
                None => FetchPhase::Idle,
            }
        }
    }

    pub fn desired(&self) -> Option<FetchRange> {
        self.desired
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Current row cache (shared with published snapshots)
    pub fn cache(&self) -> &Arc<RowCache> {
        &self.cache
    }

    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    pub fn last_error(&self) -> Option<&Arc<str>> {
        self.last_error.as_ref()
    }

    /// Outstanding window requests
    pub fn in_flight(&self) -> &[DataTicket] {
        &self.in_flight
    }

    /// Whether a range needs no request: cached, or already being fetched by
    /// a request whose response will still be applied
    pub fn is_satisfied(&self, range: &FetchRange) -> bool {
        self.cache.covers(range) || self.live_ticket().is_some_and(|t| t.range == *range)
    }

    /// The newest outstanding window request, unless something newer was
    /// already applied
    ///
    /// Older outstanding requests are bound to come back stale, so they never
    /// satisfy a range.
    fn live_ticket(&self) -> Option<&DataTicket> {
        self.in_flight
            .iter()
            .max_by_key(|t| t.seq)
            .filter(|t| t.seq > self.applied_seq)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    // ==================== Transitions ====================

    /// Record a new desired range, (re)arming the debounce deadline
    ///
    /// `None` means nothing should be fetched and cancels a pending deadline.
    /// Returns true if the deadline was (re)armed.
    pub fn set_desired(&mut self, range: Option<FetchRange>, now: Instant) -> bool {
        let Some(range) = range else {
            self.desired = None;
            self.deadline = None;
            return false;
        };

        if self.desired == Some(range) && (self.deadline.is_some() || self.is_satisfied(&range)) {
            return false;
        }

        self.desired = Some(range);
        self.deadline = Some(now + self.debounce);
        true
    }

    /// Debounce deadline passed: issue a request for the current desired range
    ///
    /// Returns `None` when nothing was armed or the range is already satisfied.
    pub fn fire_timer(&mut self) -> Option<DataTicket> {
        self.deadline.take()?;
        let range = self.desired?;

        if self.is_satisfied(&range) {
            debug!(%range, "Desired range already satisfied, skipping fetch");
            return None;
        }

        let ticket = DataTicket {
            seq: self.take_seq(),
            range,
        };
        self.in_flight.push(ticket);
        debug!(seq = ticket.seq, %range, "Issuing window fetch");
        Some(ticket)
    }

    /// Start a count-only probe
    pub fn begin_probe(&mut self) -> ProbeTicket {
        let seq = self.take_seq();
        self.probes_in_flight.push(seq);
        ProbeTicket { seq }
    }

    /// Apply (or discard) a window response
    pub fn on_data_response(
        &mut self,
        ticket: DataTicket,
        result: Result<RangePage, Error>,
    ) -> DataOutcome {
        self.in_flight.retain(|t| t.seq != ticket.seq);

        if ticket.seq < self.floor_seq || ticket.seq <= self.applied_seq {
            debug!(
                seq = ticket.seq,
                applied = self.applied_seq,
                "Discarding stale window response"
            );
            return DataOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let mut cache = RowCache::new();
                cache.set(ticket.range, page.data);
                self.cache = Arc::new(cache);
                self.applied_seq = ticket.seq;
                self.update_total(ticket.seq, page.total_count);
                self.last_error = None;
                self.last_outcome = Some(FetchOutcome::Success);
                DataOutcome::Applied
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!(
                        seq = ticket.seq,
                        range = %ticket.range,
                        error = %e,
                        "Window fetch failed, keeping last window"
                    );
                } else {
                    error!(
                        seq = ticket.seq,
                        range = %ticket.range,
                        status = e.status_code(),
                        error = %e,
                        "Window request rejected"
                    );
                }
                self.last_error = Some(e.to_string().into());
                self.last_outcome = Some(FetchOutcome::Error);
                DataOutcome::Failed
            }
        }
    }

    /// Apply a probe response; returns true if the total count changed
    pub fn on_probe_response(&mut self, ticket: ProbeTicket, result: Result<usize, Error>) -> bool {
        self.probes_in_flight.retain(|seq| *seq != ticket.seq);

        if ticket.seq < self.floor_seq {
            return false;
        }

        match result {
            Ok(total) => {
                let before = self.total_count;
                self.update_total(ticket.seq, total);
                if self.last_outcome.is_none() {
                    self.last_outcome = Some(FetchOutcome::Success);
                }
                before != self.total_count
            }
            Err(e) => {
                if ticket.seq > self.applied_seq {
                    warn!(seq = ticket.seq, error = %e, "Count probe failed");
                    self.last_error = Some(e.to_string().into());
                    self.last_outcome = Some(FetchOutcome::Error);
                }
                false
            }
        }
    }

    /// Forget everything (collection change); outstanding responses become stale
    pub fn reset(&mut self) {
        self.floor_seq = self.next_seq;
        self.desired = None;
        self.deadline = None;
        self.in_flight.clear();
        self.probes_in_flight.clear();
        self.cache = Arc::new(RowCache::new());
        self.total_count = None;
        self.last_error = None;
        self.last_outcome = None;
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn update_total(&mut self, seq: u64, total: usize) {
        if seq > self.total_seq {
            self.total_seq = seq;
            self.total_count = Some(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;
    use serde_json::json;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn page(range: FetchRange, total_count: usize) -> RangePage {
        RangePage {
            data: range
                .as_range()
                .map(|id| serde_json::from_value::<Record>(json!({ "id": id })).expect("record"))
                .collect(),
            total_count,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rapid_ranges_coalesce_into_one_fetch() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let t0 = Instant::now();

        fetcher.set_desired(Some(FetchRange::new(0, 50)), t0);
        fetcher.set_desired(Some(FetchRange::new(10, 50)), t0 + ms(100));
        fetcher.set_desired(Some(FetchRange::new(25, 50)), t0 + ms(200));
        assert_eq!(fetcher.phase(), FetchPhase::PendingFetch);

        assert!(!fetcher.is_due(t0 + ms(300)));
        assert!(fetcher.is_due(t0 + ms(500)));

        let ticket = fetcher.fire_timer().expect("one fetch");
        assert_eq!(ticket.range, FetchRange::new(25, 50));
        assert_eq!(fetcher.fire_timer(), None);
        assert_eq!(fetcher.in_flight().len(), 1);
        assert_eq!(fetcher.phase(), FetchPhase::InFlight);
    }

    #[test]
    fn test_success_replaces_cache_and_total() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let range = FetchRange::new(1980, 53);
        fetcher.set_desired(Some(range), Instant::now());
        let ticket = fetcher.fire_timer().expect("ticket");

        let outcome = fetcher.on_data_response(ticket, Ok(page(range, 50_000)));
        assert_eq!(outcome, DataOutcome::Applied);
        assert_eq!(fetcher.cache().len(), 53);
        assert_eq!(fetcher.total_count(), Some(50_000));
        assert_eq!(fetcher.phase(), FetchPhase::Settled(FetchOutcome::Success));
    }

    #[test]
    fn test_out_of_order_completion_keeps_newer_window() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 50);
        let b = FetchRange::new(400, 50);

        fetcher.set_desired(Some(a), now);
        let ticket_a = fetcher.fire_timer().expect("a");
        fetcher.set_desired(Some(b), now + ms(10));
        let ticket_b = fetcher.fire_timer().expect("b");
        assert!(ticket_b.seq > ticket_a.seq);

        assert_eq!(fetcher.on_data_response(ticket_b, Ok(page(b, 1000))), DataOutcome::Applied);
        assert_eq!(fetcher.on_data_response(ticket_a, Ok(page(a, 1000))), DataOutcome::Stale);

        assert_eq!(fetcher.cache().window(), Some(b));
        assert!(fetcher.cache().get(0).is_none());
        assert!(fetcher.cache().get(400).is_some());
        assert!(fetcher.in_flight().is_empty());
    }

    #[test]
    fn test_older_response_applies_if_nothing_newer_arrived() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 50);
        let b = FetchRange::new(400, 50);

        fetcher.set_desired(Some(a), now);
        let ticket_a = fetcher.fire_timer().expect("a");
        fetcher.set_desired(Some(b), now);
        let ticket_b = fetcher.fire_timer().expect("b");

        assert_eq!(fetcher.on_data_response(ticket_a, Ok(page(a, 1000))), DataOutcome::Applied);
        assert_eq!(fetcher.on_data_response(ticket_b, Ok(page(b, 1000))), DataOutcome::Applied);
        assert_eq!(fetcher.cache().window(), Some(b));
    }

    #[test]
    fn test_error_keeps_last_window() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 50);
        fetcher.set_desired(Some(a), now);
        let ticket = fetcher.fire_timer().expect("a");
        fetcher.on_data_response(ticket, Ok(page(a, 1000)));

        fetcher.set_desired(Some(FetchRange::new(500, 50)), now);
        let ticket = fetcher.fire_timer().expect("b");
        let outcome = fetcher.on_data_response(ticket, Err(Error::transport("connection refused")));

        assert_eq!(outcome, DataOutcome::Failed);
        assert_eq!(fetcher.cache().window(), Some(a));
        assert!(fetcher.last_error().is_some());
        assert_eq!(fetcher.phase(), FetchPhase::Settled(FetchOutcome::Error));
        assert_eq!(fetcher.deadline(), None);
    }

    #[test]
    fn test_same_range_after_error_rearms() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let range = FetchRange::new(0, 50);
        fetcher.set_desired(Some(range), now);
        let ticket = fetcher.fire_timer().expect("ticket");
        fetcher.on_data_response(ticket, Err(Error::transport("down")));

        assert!(fetcher.set_desired(Some(range), now + ms(1000)));
        let retry = fetcher.fire_timer().expect("retry");
        assert_eq!(fetcher.on_data_response(retry, Ok(page(range, 60))), DataOutcome::Applied);
        assert!(fetcher.last_error().is_none());
    }

    #[test]
    fn test_covered_range_is_not_refetched() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let wide = FetchRange::new(0, 100);
        fetcher.set_desired(Some(wide), now);
        let ticket = fetcher.fire_timer().expect("ticket");
        fetcher.on_data_response(ticket, Ok(page(wide, 1000)));

        assert!(fetcher.set_desired(Some(FetchRange::new(10, 53)), now));
        assert_eq!(fetcher.fire_timer(), None);

        assert!(!fetcher.set_desired(Some(FetchRange::new(10, 53)), now));
        assert_eq!(fetcher.phase(), FetchPhase::Settled(FetchOutcome::Success));
    }

    #[test]
    fn test_identical_in_flight_range_is_deduplicated() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let range = FetchRange::new(100, 53);
        fetcher.set_desired(Some(range), now);
        fetcher.fire_timer().expect("ticket");

        fetcher.set_desired(Some(FetchRange::new(101, 53)), now);
        fetcher.set_desired(Some(range), now);
        assert_eq!(fetcher.fire_timer(), None);
        assert_eq!(fetcher.in_flight().len(), 1);
    }

    #[test]
    fn test_superseded_in_flight_range_is_fetched_again() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 33);
        let b = FetchRange::new(380, 53);

        fetcher.set_desired(Some(a), now);
        let ticket_a = fetcher.fire_timer().expect("a");
        fetcher.set_desired(Some(b), now);
        let ticket_b = fetcher.fire_timer().expect("b");

        // Back to A while B is the newest request: A must be asked for again
        fetcher.set_desired(Some(a), now);
        let retry_a = fetcher.fire_timer().expect("a again");
        assert_eq!(retry_a.range, a);
        assert!(retry_a.seq > ticket_b.seq);

        assert_eq!(fetcher.on_data_response(ticket_b, Ok(page(b, 1000))), DataOutcome::Applied);
        assert!(!fetcher.set_desired(Some(a), now));
        assert_eq!(fetcher.on_data_response(ticket_a, Ok(page(a, 1000))), DataOutcome::Stale);
        assert_eq!(fetcher.on_data_response(retry_a, Ok(page(a, 1000))), DataOutcome::Applied);
        assert_eq!(fetcher.cache().window(), Some(a));
    }

    #[test]
    fn test_range_rearms_once_its_request_is_outdated() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 33);
        let b = FetchRange::new(380, 53);

        fetcher.set_desired(Some(a), now);
        let ticket_a = fetcher.fire_timer().expect("a");
        fetcher.set_desired(Some(b), now);
        let ticket_b = fetcher.fire_timer().expect("b");
        fetcher.set_desired(Some(a), now);

        // B lands before the deadline for A passes
        assert_eq!(fetcher.on_data_response(ticket_b, Ok(page(b, 1000))), DataOutcome::Applied);
        assert!(!fetcher.set_desired(Some(a), now));
        let retry_a = fetcher.fire_timer().expect("a again");
        assert_eq!(retry_a.range, a);

        assert_eq!(fetcher.on_data_response(ticket_a, Ok(page(a, 1000))), DataOutcome::Stale);
        assert!(!fetcher.set_desired(Some(a), now));
        assert_eq!(fetcher.on_data_response(retry_a, Ok(page(a, 1000))), DataOutcome::Applied);
        assert_eq!(fetcher.cache().window(), Some(a));
    }

    #[test]
    fn test_outdated_request_does_not_hold_back_its_range() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let a = FetchRange::new(0, 33);
        let b = FetchRange::new(380, 53);

        fetcher.set_desired(Some(a), now);
        let ticket_a = fetcher.fire_timer().expect("a");
        fetcher.set_desired(Some(b), now);
        let ticket_b = fetcher.fire_timer().expect("b");
        assert_eq!(fetcher.on_data_response(ticket_b, Ok(page(b, 1000))), DataOutcome::Applied);

        // A is still outstanding but can no longer be applied
        assert!(fetcher.set_desired(Some(a), now));
        assert_eq!(fetcher.phase(), FetchPhase::PendingFetch);
        assert_eq!(fetcher.on_data_response(ticket_a, Ok(page(a, 1000))), DataOutcome::Stale);
        assert_eq!(fetcher.fire_timer().map(|t| t.range), Some(a));
    }

    #[test]
    fn test_probe_never_touches_cache_or_fresher_total() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let probe = fetcher.begin_probe();

        let range = FetchRange::new(0, 50);
        fetcher.set_desired(Some(range), now);
        let ticket = fetcher.fire_timer().expect("ticket");
        fetcher.on_data_response(ticket, Ok(page(range, 2000)));

        assert!(!fetcher.on_probe_response(probe, Ok(1000)));
        assert_eq!(fetcher.total_count(), Some(2000));
        assert_eq!(fetcher.cache().len(), 50);

        let later = fetcher.begin_probe();
        assert!(fetcher.on_probe_response(later, Ok(2100)));
        assert_eq!(fetcher.total_count(), Some(2100));
        assert_eq!(fetcher.cache().len(), 50);
    }

    #[test]
    fn test_reset_invalidates_outstanding_requests() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        let now = Instant::now();
        let probe = fetcher.begin_probe();
        let range = FetchRange::new(0, 50);
        fetcher.set_desired(Some(range), now);
        let ticket = fetcher.fire_timer().expect("ticket");

        fetcher.reset();
        assert_eq!(fetcher.phase(), FetchPhase::Idle);

        assert_eq!(fetcher.on_data_response(ticket, Ok(page(range, 10))), DataOutcome::Stale);
        assert!(!fetcher.on_probe_response(probe, Ok(10)));
        assert!(fetcher.cache().is_empty());
        assert_eq!(fetcher.total_count(), None);
    }

    #[test]
    fn test_no_desired_range_cancels_deadline() {
        let mut fetcher = DebouncedFetcher::new(DEBOUNCE);
        fetcher.set_desired(Some(FetchRange::new(0, 50)), Instant::now());
        fetcher.set_desired(None, Instant::now());
        assert_eq!(fetcher.deadline(), None);
        assert_eq!(fetcher.fire_timer(), None);
        assert_eq!(fetcher.phase(), FetchPhase::Idle);
    }
}
