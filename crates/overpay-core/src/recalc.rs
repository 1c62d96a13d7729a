//! Ordering for live recalculation.
//!
//! Every input change is a new request with a larger token. Requests are
//! debounced so only the last one in a quiet window is computed, and a result
//! slot refuses anything older than what it already holds.

use log::trace;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::amortization::{analyze_schedules, OverpaymentAnalysis};
use crate::parse::{coerce_loan_input, RawLoanInput};

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(300);

/// Generation number of a recalculation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

/// Fires the most recent request once no newer one arrived for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    issued: u64,
    pending: Option<(RequestToken, Instant)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            issued: 0,
            pending: None,
        }
    }

    /// Register a request at `now`, superseding any pending one.
    pub fn submit(&mut self, now: Instant) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        if let Some((old, _)) = self.pending.replace((token, now + self.quiet)) {
            trace!("request {} superseded by {}", old.0, token.0);
        }
        token
    }

    /// The pending request, if its quiet window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<RequestToken> {
        match self.pending {
            Some((token, due)) if now >= due => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }

    /// Drop the pending request without firing it.
    pub fn cancel(&mut self) -> Option<RequestToken> {
        self.pending.take().map(|(token, _)| token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Most recently issued token.
    pub fn latest(&self) -> Option<RequestToken> {
        (self.issued > 0).then_some(RequestToken(self.issued))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

/// Holds the freshest published value.
#[derive(Debug, Clone)]
pub struct LatestResult<T> {
    latest: Option<(RequestToken, T)>,
}

impl<T> LatestResult<T> {
    pub fn new() -> Self {
        Self { latest: None }
    }

    /// Store `value` unless a result from a newer request is already held.
    pub fn publish(&mut self, token: RequestToken, value: T) -> bool {
        if let Some((held, _)) = &self.latest {
            if *held > token {
                trace!("discarding stale result {} (holding {})", token.0, held.0);
                return false;
            }
        }
        self.latest = Some((token, value));
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.latest.as_ref().map(|(_, v)| v)
    }

    pub fn token(&self) -> Option<RequestToken> {
        self.latest.as_ref().map(|(t, _)| *t)
    }
}

impl<T> Default for LatestResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced recalculation of the overpayment analysis from raw form input.
#[derive(Debug, Default)]
pub struct Recalculator {
    debouncer: Debouncer,
    input: RawLoanInput,
    results: LatestResult<OverpaymentAnalysis>,
}

impl Recalculator {
    pub fn new(quiet: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet),
            input: RawLoanInput::default(),
            results: LatestResult::new(),
        }
    }

    /// Record the latest form state.
    pub fn request(&mut self, raw: RawLoanInput, now: Instant) -> RequestToken {
        self.input = raw;
        self.debouncer.submit(now)
    }

    /// Compute the surviving request if its window has elapsed. Returns the
    /// published result when one was produced on this tick.
    pub fn tick(&mut self, now: Instant) -> Option<&OverpaymentAnalysis> {
        let token = self.debouncer.poll(now)?;
        let analysis = analyze_schedules(&coerce_loan_input(&self.input));
        if self.results.publish(token, analysis) {
            self.results.current()
        } else {
            None
        }
    }

    /// Compute immediately, bypassing the quiet window.
    pub fn flush(&mut self) -> Option<&OverpaymentAnalysis> {
        let token = self.debouncer.cancel()?;
        let analysis = analyze_schedules(&coerce_loan_input(&self.input));
        self.results.publish(token, analysis);
        self.results.current()
    }

    pub fn current(&self) -> Option<&OverpaymentAnalysis> {
        self.results.current()
    }
}
