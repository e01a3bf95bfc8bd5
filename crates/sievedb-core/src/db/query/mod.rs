//! Module: db::query
//! Responsibility: recognize indexable comparison predicates and attribute
//! them to index columns as interval restrictions.
//! Does not own: expression equality or cursor traversal.
//! Boundary: the host splits its conjunction here and hands the match table
//! to the filtered cursor.

mod attribute;
mod explain;


use crate::{
    db::index::ColumnDescriptor,
    expr::{BinaryOp, Expr, UnaryOp, Var},
};
use thiserror::Error as ThisError;

pub use attribute::{IndexColumnMatch, compute_matches, match_predicate, split_conjunction};
pub use explain::ExplainMatches;

///
/// ColumnComparison
///
/// Normalized output of predicate recognition: a direction-tagged comparison
/// of one column against an operand expression. For inequalities,
/// `is_upper` distinguishes `<`/`<=` from `>`/`>=` and `exclusive` marks the
/// strict forms. Equality is `is_equality` with `exclusive = false`;
/// not-equal exists only mid-recursion and never escapes `decode_comparison`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnComparison {
    pub is_equality: bool,
    pub is_upper: bool,
    pub exclusive: bool,
    pub operand: Expr,
}

/// Recognize `expr` as a comparison restricting `column`, normalizing the
/// column onto the left-hand side.
///
/// Logical negation decodes recursively and flips both the strictness and
/// the direction (`!(x <= a)` is `x > a`; `!(x == a)` is `x != a`). A plain
/// not-equal at the outermost level is not an indexable restriction and
/// yields `None`; `!(x != a)` is accepted as equality.
#[must_use]
pub fn decode_comparison(
    column: &ColumnDescriptor,
    row_var: &Var,
    expr: &Expr,
) -> Option<ColumnComparison> {
    let decoded = decode_nested(column, row_var, expr)?;

    // Top-level rule: literal not-equal is handed back as a post-filter.
    if decoded.is_equality && decoded.exclusive {
        return None;
    }

    Some(decoded)
}

fn decode_nested(
    column: &ColumnDescriptor,
    row_var: &Var,
    expr: &Expr,
) -> Option<ColumnComparison> {
    match expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => {
            let mut decoded = decode_nested(column, row_var, operand)?;
            decoded.exclusive = !decoded.exclusive;
            decoded.is_upper = !decoded.is_upper;
            Some(decoded)
        }

        Expr::Binary { op, lhs, rhs } => {
            let (is_equality, is_upper, exclusive) = match op {
                BinaryOp::Eq => (true, false, false),
                BinaryOp::Ne => (true, false, true),
                BinaryOp::Lt => (false, true, true),
                BinaryOp::Lte => (false, true, false),
                BinaryOp::Gt => (false, false, true),
                BinaryOp::Gte => (false, false, false),
                _ => return None,
            };

            if column.matches(row_var, lhs) {
                return Some(ColumnComparison {
                    is_equality,
                    is_upper,
                    exclusive,
                    operand: (**rhs).clone(),
                });
            }

            // Column on the right: mirror the comparison around it.
            if column.matches(row_var, rhs) {
                return Some(ColumnComparison {
                    is_equality,
                    is_upper: !is_upper,
                    exclusive,
                    operand: (**lhs).clone(),
                });
            }

            None
        }

        _ => None,
    }
}

///
/// PlanError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("interval planning requires an ordered index")]
    UnorderedIndex,
}
