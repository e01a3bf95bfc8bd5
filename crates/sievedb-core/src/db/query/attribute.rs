//! Module: db::query::attribute
//! Responsibility: fold recognized predicate terms into per-column intervals.
//! Does not own: predicate recognition shape rules or index usefulness policy.
//! Boundary: produces the read-only match table the filtered cursor consumes.

use crate::{
    db::{
        index::{ColumnDescriptor, Interval, TableIndex},
        query::{PlanError, decode_comparison},
    },
    expr::{BinaryOp, Expr, Var},
    obs::{self, MetricsEvent},
    value::{Value, ValueOrder},
};
use std::sync::Arc;

///
/// IndexColumnMatch
///
/// Planning-time slot for one index column: the accumulated interval, the
/// column it restricts, and the column's total order hoisted out so the
/// run-time filter loop never re-resolves it.
///

#[derive(Clone)]
pub struct IndexColumnMatch<'i> {
    column: &'i ColumnDescriptor,
    order: Arc<dyn ValueOrder>,
    interval: Interval<Value>,
}

impl<'i> IndexColumnMatch<'i> {
    fn new(column: &'i ColumnDescriptor, order: Arc<dyn ValueOrder>) -> Self {
        Self {
            column,
            order,
            interval: Interval::universe(),
        }
    }

    #[must_use]
    pub const fn column(&self) -> &'i ColumnDescriptor {
        self.column
    }

    #[must_use]
    pub const fn interval(&self) -> &Interval<Value> {
        &self.interval
    }

    #[must_use]
    pub fn order(&self) -> &dyn ValueOrder {
        self.order.as_ref()
    }
}

impl std::fmt::Debug for IndexColumnMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexColumnMatch")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Try to fold `term` into `slot` as an interval restriction.
///
/// The term must decode against the slot's column and its operand must be a
/// literal; anything else is "no match" and the term stays with the caller
/// as a post-filter. Success intersects the implied interval into the slot
/// and grants the caller permission to drop the term from its pending list.
pub fn match_predicate(slot: &mut IndexColumnMatch<'_>, row_var: &Var, term: &Expr) -> bool {
    let Some(decoded) = decode_comparison(slot.column, row_var, term) else {
        return false;
    };

    // Only literal bounds fold into intervals at plan time.
    let Some(literal) = decoded.operand.as_constant() else {
        return false;
    };

    let restriction = if decoded.is_equality {
        Interval::point(literal.clone())
    } else {
        Interval::bound(literal.clone(), decoded.exclusive, decoded.is_upper)
    };

    slot.interval = slot.interval.intersect_with(&restriction, slot.order.as_ref());

    true
}

/// Attribute each pending term to at most one column of `index`, leftmost
/// column first, and fold its bound into that column's interval.
///
/// Consumed terms are cleared from the caller's slice; whatever remains must
/// be applied by the caller as a residual row filter. A term that could
/// restrict two columns lands on the leftmost one only.
pub fn compute_matches<'i>(
    index: &'i TableIndex,
    row_var: &Var,
    terms: &mut [Option<Expr>],
) -> Result<Vec<IndexColumnMatch<'i>>, PlanError> {
    if !index.is_ordered() {
        return Err(PlanError::UnorderedIndex);
    }

    let mut slots: Vec<IndexColumnMatch<'i>> = Vec::with_capacity(index.arity());
    for column in index.columns() {
        // Orderedness was checked for the whole index above.
        let Some(order) = column.order() else {
            return Err(PlanError::UnorderedIndex);
        };
        slots.push(IndexColumnMatch::new(column, Arc::clone(order)));
    }

    let mut matched = 0usize;
    for term in terms.iter_mut() {
        let Some(expr) = term.as_ref() else {
            continue;
        };

        for slot in &mut slots {
            if match_predicate(slot, row_var, expr) {
                matched += 1;
                *term = None;
                break;
            }
        }
    }

    obs::record(MetricsEvent::PlanComputed {
        columns: slots.len(),
        terms_matched: matched,
    });

    Ok(slots)
}

/// Flatten nested `AND` nodes into a term list for attribution.
///
/// Only conjunction splits; every other node is one opaque term. `OR` stays
/// whole because a disjunction is not a per-column restriction.
#[must_use]
pub fn split_conjunction(expr: &Expr) -> Vec<Expr> {
    let mut terms = Vec::new();
    collect_conjuncts(expr, &mut terms);
    terms
}

fn collect_conjuncts(expr: &Expr, out: &mut Vec<Expr>) {
    if let Expr::Binary {
        op: BinaryOp::And,
        lhs,
        rhs,
    } = expr
    {
        collect_conjuncts(lhs, out);
        collect_conjuncts(rhs, out);
        return;
    }

    out.push(expr.clone());
}
