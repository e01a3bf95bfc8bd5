//! Module: expr::equality
//! Responsibility: structural tree comparison with one point of unification.
//! Does not own: expression construction or predicate semantics.
//! Boundary: column matching and predicate decoding call through here.

use crate::expr::{Expr, Var};

/// Decide whether two trees represent the same computation.
///
/// `unify` names two distinguished parameter nodes treated as equivalent:
/// wherever one tree has either of them and the other tree has either of
/// them, the nodes unify regardless of identity. This is the single hook
/// that lets `row.x` bound to one row variable match `row'.x` bound to
/// another. With `unify = None` the comparison is purely structural.
///
/// Comparison short-circuits on the first mismatch. Opaque nodes compare by
/// referential identity.
#[must_use]
pub fn structurally_equal(x: &Expr, y: &Expr, unify: Option<(&Var, &Var)>) -> bool {
    match (x, y) {
        (Expr::Var(vx), Expr::Var(vy)) => vars_equal(vx, vy, unify),

        (Expr::Constant(a), Expr::Constant(b)) => a == b,

        (
            Expr::Member {
                target: tx,
                member: mx,
            },
            Expr::Member {
                target: ty,
                member: my,
            },
        ) => mx == my && structurally_equal(tx, ty, unify),

        (
            Expr::Call {
                target: tx,
                method: mx,
                args: ax,
            },
            Expr::Call {
                target: ty,
                method: my,
                args: ay,
            },
        ) => mx == my && optional_equal(tx.as_deref(), ty.as_deref(), unify) && all_equal(ax, ay, unify),

        (
            Expr::Binary {
                op: ox,
                lhs: lx,
                rhs: rx,
            },
            Expr::Binary {
                op: oy,
                lhs: ly,
                rhs: ry,
            },
        ) => ox == oy && structurally_equal(lx, ly, unify) && structurally_equal(rx, ry, unify),

        (
            Expr::Unary {
                op: ox,
                operand: ex,
            },
            Expr::Unary {
                op: oy,
                operand: ey,
            },
        ) => ox == oy && structurally_equal(ex, ey, unify),

        (
            Expr::Index {
                target: tx,
                args: ax,
            },
            Expr::Index {
                target: ty,
                args: ay,
            },
        ) => structurally_equal(tx, ty, unify) && all_equal(ax, ay, unify),

        (
            Expr::Lambda {
                params: px,
                body: bx,
                ty: tx,
            },
            Expr::Lambda {
                params: py,
                body: by,
                ty: ty_y,
            },
        ) => {
            tx == ty_y
                && px.len() == py.len()
                && px
                    .iter()
                    .zip(py.iter())
                    .all(|(a, b)| vars_equal(a, b, unify))
                && structurally_equal(bx, by, unify)
        }

        (Expr::New { ctor: cx, args: ax }, Expr::New { ctor: cy, args: ay }) => {
            cx == cy && all_equal(ax, ay, unify)
        }

        (
            Expr::NewArray {
                elem: ex,
                items: ix,
            },
            Expr::NewArray {
                elem: ey,
                items: iy,
            },
        ) => ex == ey && all_equal(ix, iy, unify),

        (Expr::Default(tx), Expr::Default(ty)) => tx == ty,

        (Expr::Opaque(a), Expr::Opaque(b)) => a.same(b),

        _ => false,
    }
}

// Parameter nodes: the unification pair wins over identity; everything else
// compares by variable identity.
fn vars_equal(x: &Var, y: &Var, unify: Option<(&Var, &Var)>) -> bool {
    if let Some((u1, u2)) = unify {
        let x_unifies = x == u1 || x == u2;
        let y_unifies = y == u1 || y == u2;
        if x_unifies && y_unifies {
            return true;
        }
    }

    x == y
}

fn optional_equal(x: Option<&Expr>, y: Option<&Expr>, unify: Option<(&Var, &Var)>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(a), Some(b)) => structurally_equal(a, b, unify),
        _ => false,
    }
}

fn all_equal(x: &[Expr], y: &[Expr], unify: Option<(&Var, &Var)>) -> bool {
    x.len() == y.len()
        && x.iter()
            .zip(y.iter())
            .all(|(a, b)| structurally_equal(a, b, unify))
}
