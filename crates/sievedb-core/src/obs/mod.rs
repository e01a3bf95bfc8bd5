//! Metrics sink boundary.
//!
//! Planner and cursor logic MUST NOT depend on counter state directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only bridge between execution logic and the
//! process-local counter state.

use std::{cell::RefCell, rc::Rc};

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    PlanComputed { columns: usize, terms_matched: usize },
    SeekIssued,
    RowScanned,
    RowEmitted,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// EventState
///

/// Counters reflect work performed, not work requested; errored calls still
/// count the work they did before failing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EventState {
    pub plans: u64,
    pub terms_matched: u64,
    pub seeks: u64,
    pub rows_scanned: u64,
    pub rows_emitted: u64,
}

/// GlobalMetricsSink
/// Default sink writing into the thread-local counter state.
/// Acts as the concrete sink when no scoped override is installed.
struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        STATE.with(|state| {
            let mut counters = state.borrow_mut();
            match event {
                MetricsEvent::PlanComputed { terms_matched, .. } => {
                    counters.plans = counters.plans.saturating_add(1);
                    counters.terms_matched = counters
                        .terms_matched
                        .saturating_add(terms_matched as u64);
                }
                MetricsEvent::SeekIssued => {
                    counters.seeks = counters.seeks.saturating_add(1);
                }
                MetricsEvent::RowScanned => {
                    counters.rows_scanned = counters.rows_scanned.saturating_add(1);
                }
                MetricsEvent::RowEmitted => {
                    counters.rows_emitted = counters.rows_emitted.saturating_add(1);
                }
            }
        });
    }
}

/// Record one event through the scoped override, or the global sink when no
/// override is installed.
pub fn record(event: MetricsEvent) {
    let scoped = SINK_OVERRIDE.with(|slot| slot.borrow().clone());
    match scoped {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot of the thread-local counters.
#[must_use]
pub fn snapshot() -> EventState {
    STATE.with(|state| *state.borrow())
}

/// Reset the thread-local counters; test hygiene between scenarios.
pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = EventState::default());
}

/// Run `f` with `sink` installed as the scoped sink, restoring the previous
/// sink afterwards.
pub fn with_sink<R>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> R) -> R {
    let previous = SINK_OVERRIDE.with(|slot| slot.replace(Some(sink)));
    let result = f();
    SINK_OVERRIDE.with(|slot| *slot.borrow_mut() = previous);
    result
}
