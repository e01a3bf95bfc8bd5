//! Module: db::cursor::filtered
//! Responsibility: interval-filtered traversal over a seekable index cursor.
//! Does not own: interval computation or the underlying storage order.
//! Boundary: consumes a planned match table read-only; owns the underlying
//! cursor for its whole lifetime.

use crate::{
    db::{
        cursor::{CursorError, SeekableCursor},
        query::IndexColumnMatch,
    },
    obs::{self, MetricsEvent},
    value::Value,
};
use std::{cmp::Ordering, ops::Bound};

// Working phase of the scan loop. The algorithm re-enters strictly earlier
// phases after seeks and roll-overs, so the control flow is a tag-and-loop
// over this enum rather than nested conditionals.
#[derive(Clone, Copy, Debug)]
enum Step {
    // Begin constraining column j: seek to its lower bound if it has one.
    Start(usize),
    // A seek or advance may have changed columns before j; find the first.
    Roll(usize),
    // Refresh the cached value of column j from the underlying row.
    Update(usize),
    // Test column j's cached value against its upper bound.
    Check(usize),
}

///
/// FilteredCursor
///
/// Drives a [`SeekableCursor`] so that it yields exactly the rows whose
/// leading key columns lie inside the planned per-column intervals, in
/// index order, with work bounded by the output plus the number of
/// roll-over transitions rather than by the table.
///
/// The match table may cover fewer columns than the index has; tail columns
/// are unconstrained and traversed naturally. The cursor exclusively owns
/// the underlying cursor; [`FilteredCursor::into_inner`] releases it, after
/// which no further use of the filter is possible.
///

pub struct FilteredCursor<'i, C>
where
    C: SeekableCursor,
{
    inner: C,
    matches: Vec<IndexColumnMatch<'i>>,
    current_key: Vec<Value>,
    started: bool,
    done: bool,
}

impl<'i, C> FilteredCursor<'i, C>
where
    C: SeekableCursor,
{
    /// Wrap `inner` with the planned per-column intervals.
    ///
    /// A match table longer than the cursor's key arity surfaces as a
    /// column-range error on the first `advance`.
    #[must_use]
    pub fn new(inner: C, matches: Vec<IndexColumnMatch<'i>>) -> Self {
        let current_key = vec![Value::Unit; matches.len()];
        Self {
            inner,
            matches,
            current_key,
            started: false,
            done: false,
        }
    }

    #[must_use]
    pub fn matches(&self) -> &[IndexColumnMatch<'i>] {
        &self.matches
    }

    /// The current row, when positioned on an emitted row.
    #[must_use]
    pub fn current(&self) -> Option<&C::Row> {
        self.inner.current()
    }

    /// Rewind to before the first row; the next `advance` replays the scan.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.started = false;
        self.done = false;
    }

    /// Release and return the underlying cursor.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Move to the next row inside the planned bounding box.
    ///
    /// `Ok(false)` is the only end-of-iteration signal; once returned, later
    /// calls keep returning `Ok(false)` without touching the underlying
    /// cursor. Underlying failures propagate as-is.
    pub fn advance(&mut self) -> Result<bool, CursorError> {
        if self.done {
            return Ok(false);
        }

        let constrained = self.matches.len();
        if constrained == 0 {
            return self.advance_unconstrained();
        }

        let mut step = if self.started {
            if !self.advance_inner()? {
                return Ok(false);
            }
            Step::Roll(constrained - 1)
        } else {
            self.begin_scan()?
        };

        if self.done {
            return Ok(false);
        }

        loop {
            step = match step {
                Step::Start(ordinal) => {
                    let Some(next) = self.start_column(ordinal)? else {
                        return Ok(false);
                    };
                    next
                }
                Step::Roll(ordinal) => self.check_for_roll(ordinal)?,
                Step::Update(ordinal) => {
                    self.current_key[ordinal] = self.inner.column_value(ordinal)?;
                    Step::Check(ordinal)
                }
                Step::Check(ordinal) => {
                    if self.upper_violated(ordinal) {
                        let Some(next) = self.seek_past_prefix(ordinal)? else {
                            return Ok(false);
                        };
                        next
                    } else if ordinal + 1 == constrained {
                        obs::record(MetricsEvent::RowEmitted);
                        return Ok(true);
                    } else {
                        Step::Start(ordinal + 1)
                    }
                }
            };
        }
    }

    // Fast path: no constrained columns, the filter is transparent.
    fn advance_unconstrained(&mut self) -> Result<bool, CursorError> {
        let more = self.advance_inner()?;
        if more {
            obs::record(MetricsEvent::RowEmitted);
        }
        Ok(more)
    }

    // First call: short-circuit empty intervals, and position the underlying
    // cursor on the index's first row when column 0 carries no lower bound
    // (a bounded column 0 positions through its own seek instead).
    fn begin_scan(&mut self) -> Result<Step, CursorError> {
        if self
            .matches
            .iter()
            .any(|slot| slot.interval().is_empty())
        {
            self.done = true;
            return Ok(Step::Start(0));
        }

        self.started = true;
        if !self.matches[0].interval().has_lower() && !self.advance_inner()? {
            return Ok(Step::Start(0));
        }

        Ok(Step::Start(0))
    }

    fn advance_inner(&mut self) -> Result<bool, CursorError> {
        let more = self.inner.advance()?;
        if more {
            obs::record(MetricsEvent::RowScanned);
        } else {
            self.done = true;
        }
        Ok(more)
    }

    // "Start a column": with a lower bound, seek to it and re-check the
    // prefix for roll-over; without one, just read the column off the row.
    fn start_column(&mut self, ordinal: usize) -> Result<Option<Step>, CursorError> {
        let (bound, exclusive) = match self.matches[ordinal].interval().lower() {
            Bound::Included(value) => (Some(value.clone()), false),
            Bound::Excluded(value) => (Some(value.clone()), true),
            Bound::Unbounded => (None, false),
        };

        let Some(value) = bound else {
            return Ok(Some(Step::Update(ordinal)));
        };

        self.current_key[ordinal] = value;
        obs::record(MetricsEvent::SeekIssued);
        if !self
            .inner
            .seek(ordinal + 1, &self.current_key[..=ordinal], exclusive)?
        {
            self.done = true;
            return Ok(None);
        }

        Ok(Some(Step::Roll(ordinal)))
    }

    // "Check for roll": a seek or advance can change columns before the
    // working ordinal as a side effect; re-enter the check at the first
    // column whose value moved.
    fn check_for_roll(&mut self, ordinal: usize) -> Result<Step, CursorError> {
        for earlier in 0..ordinal {
            let observed = self.inner.column_value(earlier)?;
            let moved = self.matches[earlier]
                .order()
                .compare(&observed, &self.current_key[earlier])
                != Ordering::Equal;
            if moved {
                self.current_key[earlier] = observed;
                return Ok(Step::Check(earlier));
            }
        }

        Ok(Step::Update(ordinal))
    }

    fn upper_violated(&self, ordinal: usize) -> bool {
        let slot = &self.matches[ordinal];
        let value = &self.current_key[ordinal];
        match slot.interval().upper() {
            Bound::Unbounded => false,
            Bound::Included(hi) => slot.order().compare(value, hi) == Ordering::Greater,
            Bound::Excluded(hi) => slot.order().compare(value, hi) != Ordering::Less,
        }
    }

    // Past the upper bound of column `ordinal`: every remaining row sharing
    // the preceding prefix is past it too, so jump to the first row whose
    // leading `ordinal` columns exceed that prefix, then re-check from the
    // previous column.
    fn seek_past_prefix(&mut self, ordinal: usize) -> Result<Option<Step>, CursorError> {
        obs::record(MetricsEvent::SeekIssued);
        if !self
            .inner
            .seek(ordinal, &self.current_key[..ordinal], true)?
        {
            self.done = true;
            return Ok(None);
        }

        let Some(previous) = ordinal.checked_sub(1) else {
            // No row is strictly after the empty prefix; a conforming
            // cursor cannot land here.
            return Err(CursorError::InvariantViolation {
                message: "seek past an empty prefix returned a row".to_string(),
            });
        };

        Ok(Some(Step::Roll(previous)))
    }
}
