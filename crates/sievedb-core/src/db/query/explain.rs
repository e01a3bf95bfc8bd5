//! Deterministic, read-only rendering of a computed match table; must not
//! execute or re-plan.

use crate::{
    db::{index::Interval, query::IndexColumnMatch},
    expr::Expr,
    value::Value,
};
use std::{fmt, ops::Bound};

///
/// ExplainMatches
///
/// Stable snapshot of a plan for observability: one entry per index column
/// with its accumulated interval, plus how many terms folded into the table
/// and how many stay behind as a residual row filter. Pure data; rendering
/// is `Display`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ExplainMatches {
    columns: Vec<Interval<Value>>,
    matched_terms: usize,
    residual_terms: usize,
}

impl ExplainMatches {
    /// Snapshot `matches` together with the caller's pending-term slice
    /// after attribution; cleared slots are the matched terms.
    #[must_use]
    pub fn from_plan(matches: &[IndexColumnMatch<'_>], terms: &[Option<Expr>]) -> Self {
        let residual_terms = terms.iter().filter(|term| term.is_some()).count();
        Self {
            columns: matches.iter().map(|m| m.interval().clone()).collect(),
            matched_terms: terms.len() - residual_terms,
            residual_terms,
        }
    }

    /// Number of leading columns carrying a real restriction.
    #[must_use]
    pub fn constrained_prefix(&self) -> usize {
        self.columns
            .iter()
            .take_while(|interval| !interval.is_universe())
            .count()
    }

    /// Terms attributed to some column and folded into its interval.
    #[must_use]
    pub const fn matched_terms(&self) -> usize {
        self.matched_terms
    }

    /// Terms the caller must re-check per row.
    #[must_use]
    pub const fn residual_terms(&self) -> usize {
        self.residual_terms
    }
}

impl fmt::Display for ExplainMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ordinal, interval) in self.columns.iter().enumerate() {
            write!(f, "c{ordinal}: ")?;
            write_interval(f, interval)?;
            writeln!(f)?;
        }
        write!(
            f,
            "terms: {} matched, {} residual",
            self.matched_terms, self.residual_terms
        )
    }
}

fn write_interval(f: &mut fmt::Formatter<'_>, interval: &Interval<Value>) -> fmt::Result {
    if interval.is_empty() {
        return write!(f, "empty");
    }

    match interval.lower() {
        Bound::Unbounded => write!(f, "(..")?,
        Bound::Included(v) => write!(f, "[{v}")?,
        Bound::Excluded(v) => write!(f, "({v}")?,
    }
    write!(f, ", ")?;
    match interval.upper() {
        Bound::Unbounded => write!(f, "..)"),
        Bound::Included(v) => write!(f, "{v}]"),
        Bound::Excluded(v) => write!(f, "{v})"),
    }
}
