use crate::core::candidates::CandidateList;
use crate::core::debouncer::Debouncer;
use std::time::{Duration, Instant};
use tracing::debug;

/// Quiet period between the last keystroke and the filter pass.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Combined view over the controller's independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Empty query, nothing shown, nothing pending.
    Idle,
    /// Dropdown open while a filter pass is outstanding.
    Pending,
    /// Dropdown open, results belong to the latest completed pass.
    Settled,
    /// Dropdown hidden after a selection or an outside click.
    Dismissed,
}

/// Stateful core of the autocomplete widget.
///
/// Owns the query, the filtered results and the loading / dropdown flags, and
/// drives filtering through a single-slot [`Debouncer`]. Only the latest
/// keystroke can ever reach a filter pass, so stale results never overwrite
/// fresher ones.
#[derive(Debug, Clone)]
pub struct AutocompleteController {
    candidates: CandidateList,
    query: String,
    results: Vec<String>,
    loading: bool,
    dropdown_visible: bool,
    filter_timer: Debouncer<String>,
}

impl AutocompleteController {
    pub fn new(candidates: CandidateList) -> Self {
        Self::with_debounce(candidates, FILTER_DEBOUNCE)
    }

    pub fn with_debounce(candidates: CandidateList, delay: Duration) -> Self {
        Self {
            candidates,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            dropdown_visible: false,
            filter_timer: Debouncer::new(delay),
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    /// The dropdown region is mounted only while visible with a non-empty query.
    pub fn shows_dropdown(&self) -> bool {
        self.dropdown_visible && !self.query.is_empty()
    }

    pub fn phase(&self) -> ControllerPhase {
        if !self.dropdown_visible {
            if self.query.is_empty() && self.results.is_empty() && !self.loading {
                return ControllerPhase::Idle;
            }
            return ControllerPhase::Dismissed;
        }
        if self.loading {
            ControllerPhase::Pending
        } else {
            ControllerPhase::Settled
        }
    }

    /// A keystroke produced `value` as the new full input text.
    pub fn on_input_change(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        self.query.clone_from(&value);
        self.dropdown_visible = true;
        self.loading = true;
        if value.is_empty() {
            self.results.clear();
        }
        let generation = self.filter_timer.trigger(value, now);
        debug!(query = %self.query, generation, "filter pass scheduled");
    }

    /// Runs the filter pass if its quiet period is over. Returns whether state
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.filter_timer.take_due(now) {
            Some(value) => {
                self.filter_pass(&value);
                true
            }
            None => false,
        }
    }

    fn filter_pass(&mut self, value: &str) {
        if !value.is_empty() {
            self.results = self.candidates.filter(value);
        }
        self.loading = false;
        debug!(query = %value, matches = self.results.len(), "filter pass applied");
    }

    /// Replaces the query without scheduling a filter pass or touching the
    /// dropdown.
    pub fn set_query(&mut self, value: impl Into<String>) {
        self.query = value.into();
    }

    pub fn on_item_select(&mut self, value: impl Into<String>) {
        self.set_query(value);
        self.dropdown_visible = false;
        debug!(query = %self.query, "suggestion selected");
    }

    /// Hides the dropdown and clears results. An outstanding filter pass is
    /// dropped so it cannot refill results behind the closed dropdown.
    pub fn on_outside_click(&mut self) {
        if !self.dropdown_visible && self.results.is_empty() && !self.loading {
            return;
        }
        self.dropdown_visible = false;
        self.results.clear();
        self.cancel_pending();
        debug!("dropdown dismissed by outside click");
    }

    /// Drops the outstanding filter pass without running it.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.filter_timer.cancel();
        if cancelled {
            self.loading = false;
        }
        cancelled
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.filter_timer.deadline()
    }
}
