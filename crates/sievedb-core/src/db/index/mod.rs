//! Module: db::index
//! Responsibility: ordered-index descriptors and the per-column interval algebra.
//! Does not own: predicate decoding, attribution, or cursor traversal.
//! Boundary: descriptors are built once with the catalog and read-only afterwards.

mod interval;

#[cfg(test)]
mod tests;

use crate::{
    MAX_INDEX_COLUMNS,
    expr::{Expr, Var, structurally_equal},
    value::{ValueEquiv, ValueOrder},
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

pub use interval::Interval;

///
/// ColumnComparer
///
/// Exactly one comparison discipline per column: a total order for ordered
/// columns, an equivalence for hashed ones. Encoding this as a sum keeps the
/// "exactly one of the two" invariant out of runtime checks.
///

#[derive(Clone)]
pub enum ColumnComparer {
    Ordered(Arc<dyn ValueOrder>),
    Hashed(Arc<dyn ValueEquiv>),
}

impl fmt::Debug for ColumnComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordered(_) => write!(f, "Ordered"),
            Self::Hashed(_) => write!(f, "Hashed"),
        }
    }
}

///
/// ColumnDescriptor
///
/// One indexed column: the row placeholder, the extraction expression that
/// reads the column out of a row bound to that placeholder, the comparison
/// discipline, and uniqueness. Immutable once the catalog is built.
///

#[derive(Clone, Debug)]
pub struct ColumnDescriptor {
    row: Var,
    extract: Expr,
    comparer: ColumnComparer,
    unique: bool,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn ordered(row: Var, extract: Expr, order: Arc<dyn ValueOrder>) -> Self {
        Self {
            row,
            extract,
            comparer: ColumnComparer::Ordered(order),
            unique: false,
        }
    }

    #[must_use]
    pub fn hashed(row: Var, extract: Expr, equiv: Arc<dyn ValueEquiv>) -> Self {
        Self {
            row,
            extract,
            comparer: ColumnComparer::Hashed(equiv),
            unique: false,
        }
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        matches!(self.comparer, ColumnComparer::Ordered(_))
    }

    /// The column's total order, for ordered columns.
    #[must_use]
    pub fn order(&self) -> Option<&Arc<dyn ValueOrder>> {
        match &self.comparer {
            ColumnComparer::Ordered(order) => Some(order),
            ColumnComparer::Hashed(_) => None,
        }
    }

    #[must_use]
    pub const fn extraction(&self) -> &Expr {
        &self.extract
    }

    /// Whether `expr`, written against `row_var`, extracts this column.
    ///
    /// Structural comparison with the stored placeholder unified against the
    /// caller's row variable; this is how a predicate subtree written in one
    /// lambda matches an extraction expression written in another.
    #[must_use]
    pub fn matches(&self, row_var: &Var, expr: &Expr) -> bool {
        structurally_equal(&self.extract, expr, Some((&self.row, row_var)))
    }
}

///
/// TableIndex
///
/// Ordered sequence of column descriptors. The flattened key carries the
/// lexicographic total order induced by column order; ordinals run
/// `0 .. arity - 1`.
///

#[derive(Clone, Debug)]
pub struct TableIndex {
    columns: Vec<ColumnDescriptor>,
}

impl TableIndex {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, IndexError> {
        if columns.len() > MAX_INDEX_COLUMNS {
            return Err(IndexError::TooManyColumns {
                count: columns.len(),
                max: MAX_INDEX_COLUMNS,
            });
        }

        Ok(Self { columns })
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Whether every column carries a total order. Interval planning and the
    /// filtered cursor require this; hashed indices take no planner path.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.columns.iter().all(ColumnDescriptor::is_ordered)
    }
}

///
/// IndexError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum IndexError {
    #[error("index arity {count} exceeds the supported maximum {max}")]
    TooManyColumns { count: usize, max: usize },
}
