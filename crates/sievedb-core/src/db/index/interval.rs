//! Module: db::index::interval
//! Responsibility: one-dimensional interval algebra under a caller-supplied order.
//! Does not own: value comparison semantics or per-column attribution.
//! Boundary: the planner folds predicate bounds in here; the cursor reads them.

use crate::value::{Value, ValueOrder};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, ops::Bound};

///
/// Interval
///
/// Contiguous subset of a totally ordered domain `T`. May be bounded or
/// unbounded on either side, with either bound exclusive, or explicitly
/// empty. The default value is the universal interval.
///
/// `intersect` is commutative, associative, and idempotent; the universal
/// interval is its identity and the empty interval is absorbing. The order
/// is supplied per call so one interval type serves every column domain.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Interval<T> {
    lower: Bound<T>,
    upper: Bound<T>,
    empty: bool,
}

impl<T> Default for Interval<T> {
    fn default() -> Self {
        Self::universe()
    }
}

impl<T> Interval<T> {
    /// The interval containing every value.
    #[must_use]
    pub const fn universe() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            empty: false,
        }
    }

    /// The interval containing no value. Bound fields are cleared; on an
    /// empty interval they carry no meaning.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            empty: true,
        }
    }

    /// `[v, v]`.
    #[must_use]
    pub fn point(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            lower: Bound::Included(value.clone()),
            upper: Bound::Included(value),
            empty: false,
        }
    }

    /// `(v, +inf)` when exclusive, else `[v, +inf)`.
    #[must_use]
    pub fn lower_bounded(value: T, exclusive: bool) -> Self {
        Self {
            lower: make_bound(value, exclusive),
            upper: Bound::Unbounded,
            empty: false,
        }
    }

    /// `(-inf, v)` when exclusive, else `(-inf, v]`.
    #[must_use]
    pub fn upper_bounded(value: T, exclusive: bool) -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: make_bound(value, exclusive),
            empty: false,
        }
    }

    /// One-sided bound, dispatching on the side.
    #[must_use]
    pub fn bound(value: T, exclusive: bool, is_upper: bool) -> Self {
        if is_upper {
            Self::upper_bounded(value, exclusive)
        } else {
            Self::lower_bounded(value, exclusive)
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    #[must_use]
    pub fn is_universe(&self) -> bool {
        !self.empty
            && matches!(self.lower, Bound::Unbounded)
            && matches!(self.upper, Bound::Unbounded)
    }

    #[must_use]
    pub const fn lower(&self) -> &Bound<T> {
        &self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> &Bound<T> {
        &self.upper
    }

    #[must_use]
    pub fn has_lower(&self) -> bool {
        !matches!(self.lower, Bound::Unbounded)
    }

    #[must_use]
    pub fn has_upper(&self) -> bool {
        !matches!(self.upper, Bound::Unbounded)
    }

    /// Whether `value` lies inside the interval under `cmp`.
    #[must_use]
    pub fn contains<F>(&self, value: &T, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
    {
        if self.empty {
            return false;
        }

        let above_lower = match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(lo) => cmp(value, lo) != Ordering::Less,
            Bound::Excluded(lo) => cmp(value, lo) == Ordering::Greater,
        };
        let below_upper = match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(hi) => cmp(value, hi) != Ordering::Greater,
            Bound::Excluded(hi) => cmp(value, hi) == Ordering::Less,
        };

        above_lower && below_upper
    }

    /// Intersect two intervals under `cmp`, a total order.
    ///
    /// Per side, the tighter bound wins: the greater lower bound, the lesser
    /// upper bound. On a tie, any exclusive operand makes the result
    /// exclusive. If the combined bounds cross, or coincide with either side
    /// exclusive, the result is empty.
    #[must_use]
    pub fn intersect<F>(&self, other: &Self, cmp: F) -> Self
    where
        T: Clone,
        F: Fn(&T, &T) -> Ordering,
    {
        if self.empty || other.empty {
            return Self::empty();
        }

        let lower = tighter(&self.lower, &other.lower, &cmp, Side::Lower);
        let upper = tighter(&self.upper, &other.upper, &cmp, Side::Upper);

        if bounds_cross(&lower, &upper, &cmp) {
            return Self::empty();
        }

        Self {
            lower,
            upper,
            empty: false,
        }
    }
}

impl Interval<Value> {
    /// Type-erased intersection under a polymorphic column order.
    #[must_use]
    pub fn intersect_with(&self, other: &Self, order: &dyn ValueOrder) -> Self {
        self.intersect(other, |a, b| order.compare(a, b))
    }

    /// Type-erased membership under a polymorphic column order.
    #[must_use]
    pub fn contains_value(&self, value: &Value, order: &dyn ValueOrder) -> bool {
        self.contains(value, |a, b| order.compare(a, b))
    }
}

#[derive(Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

fn make_bound<T>(value: T, exclusive: bool) -> Bound<T> {
    if exclusive {
        Bound::Excluded(value)
    } else {
        Bound::Included(value)
    }
}

fn parts<T>(bound: &Bound<T>) -> Option<(&T, bool)> {
    match bound {
        Bound::Included(v) => Some((v, false)),
        Bound::Excluded(v) => Some((v, true)),
        Bound::Unbounded => None,
    }
}

fn tighter<T, F>(a: &Bound<T>, b: &Bound<T>, cmp: &F, side: Side) -> Bound<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let combined = match (parts(a), parts(b)) {
        (None, None) => None,
        (Some(one), None) | (None, Some(one)) => Some(one),
        (Some((av, ax)), Some((bv, bx))) => {
            let wins = match side {
                Side::Lower => Ordering::Greater,
                Side::Upper => Ordering::Less,
            };
            match cmp(av, bv) {
                Ordering::Equal => Some((av, ax || bx)),
                order if order == wins => Some((av, ax)),
                _ => Some((bv, bx)),
            }
        }
    };

    match combined {
        None => Bound::Unbounded,
        Some((value, exclusive)) => make_bound(value.clone(), exclusive),
    }
}

fn bounds_cross<T, F>(lower: &Bound<T>, upper: &Bound<T>, cmp: &F) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    let (Some((lo, lo_exclusive)), Some((hi, hi_exclusive))) = (parts(lower), parts(upper)) else {
        return false;
    };

    match cmp(lo, hi) {
        Ordering::Greater => true,
        Ordering::Equal => lo_exclusive || hi_exclusive,
        Ordering::Less => false,
    }
}
