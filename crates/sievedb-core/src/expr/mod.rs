//! Module: expr
//! Responsibility: host-facing query expression dialect and structural equality.
//! Does not own: predicate decoding, interval folding, or index attribution.
//! Boundary: the planner consumes these trees; it never evaluates them.

mod equality;


use crate::value::Value;
use derive_more::Display;
use std::{
    any::Any,
    fmt,
    ops::{BitAnd, BitOr},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

pub use equality::structurally_equal;

///
/// Symbol
///
/// Stable identity of a member, method, or constructor. Two trees refer to
/// the same member iff their symbols compare equal; the planner never
/// inspects what a symbol resolves to.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct Symbol(String);

impl Symbol {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(name)
    }
}

///
/// TypeTag
///
/// Declared-type identity for default, new-array, and lambda nodes.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct TypeTag(String);

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

///
/// Var
///
/// A parameter node: the placeholder standing for "a single row" inside a
/// column-extraction expression or a predicate. Identity is the `id`; the
/// name is display metadata only. Fresh ids come from a process-wide
/// counter, so two separately built row variables never collide.
///

#[derive(Clone, Debug)]
pub struct Var {
    id: u64,
    name: String,
}

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

impl Var {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_VAR_ID.fetch_add(1, AtomicOrdering::Relaxed),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

///
/// OpaqueExpr
///
/// Host payload the planner cannot interpret. Compared by referential
/// identity, which keeps unsupported-node equality explicit rather than
/// silently structural.
///

#[derive(Clone)]
pub struct OpaqueExpr(Arc<dyn Any + Send + Sync>);

impl OpaqueExpr {
    #[must_use]
    pub fn new(payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self(payload)
    }

    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for OpaqueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueExpr({:p})", Arc::as_ptr(&self.0))
    }
}

///
/// BinaryOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// UnaryOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

///
/// Expr
///
/// Tagged expression tree. One variant per node kind; identity-bearing
/// metadata (member, method, constructor, declared type) rides on the
/// variant so structural comparison can check it without host callbacks.
///

#[derive(Clone, Debug)]
pub enum Expr {
    Constant(Value),
    Var(Var),
    Member {
        target: Box<Expr>,
        member: Symbol,
    },
    Call {
        target: Option<Box<Expr>>,
        method: Symbol,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Index {
        target: Box<Expr>,
        args: Vec<Expr>,
    },
    Lambda {
        params: Vec<Var>,
        body: Box<Expr>,
        ty: TypeTag,
    },
    New {
        ctor: Symbol,
        args: Vec<Expr>,
    },
    NewArray {
        elem: TypeTag,
        items: Vec<Expr>,
    },
    Default(TypeTag),
    Opaque(OpaqueExpr),
}

impl Expr {
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    #[must_use]
    pub fn var(var: &Var) -> Self {
        Self::Var(var.clone())
    }

    #[must_use]
    pub fn member(target: Self, member: impl Into<Symbol>) -> Self {
        Self::Member {
            target: Box::new(target),
            member: member.into(),
        }
    }

    #[must_use]
    pub fn call(target: Option<Self>, method: impl Into<Symbol>, args: Vec<Self>) -> Self {
        Self::Call {
            target: target.map(Box::new),
            method: method.into(),
            args,
        }
    }

    #[must_use]
    pub fn index(target: Self, args: Vec<Self>) -> Self {
        Self::Index {
            target: Box::new(target),
            args,
        }
    }

    #[must_use]
    pub fn lambda(params: Vec<Var>, body: Self, ty: impl Into<TypeTag>) -> Self {
        Self::Lambda {
            params,
            body: Box::new(body),
            ty: ty.into(),
        }
    }

    #[must_use]
    pub fn ctor(ctor: impl Into<Symbol>, args: Vec<Self>) -> Self {
        Self::New {
            ctor: ctor.into(),
            args,
        }
    }

    #[must_use]
    pub fn new_array(elem: impl Into<TypeTag>, items: Vec<Self>) -> Self {
        Self::NewArray {
            elem: elem.into(),
            items,
        }
    }

    #[must_use]
    pub fn default_of(ty: impl Into<TypeTag>) -> Self {
        Self::Default(ty.into())
    }

    #[must_use]
    pub fn opaque(payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self::Opaque(OpaqueExpr::new(payload))
    }

    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn eq(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Eq, lhs, rhs)
    }

    #[must_use]
    pub fn ne(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Ne, lhs, rhs)
    }

    #[must_use]
    pub fn lt(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Lt, lhs, rhs)
    }

    #[must_use]
    pub fn lte(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Lte, lhs, rhs)
    }

    #[must_use]
    pub fn gt(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Gt, lhs, rhs)
    }

    #[must_use]
    pub fn gte(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Gte, lhs, rhs)
    }

    #[must_use]
    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    #[must_use]
    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    #[must_use]
    pub fn add(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Add, lhs, rhs)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn neg(operand: Self) -> Self {
        Self::unary(UnaryOp::Neg, operand)
    }

    /// The contained literal, for constant nodes.
    #[must_use]
    pub const fn as_constant(&self) -> Option<&Value> {
        match self {
            Self::Constant(value) => Some(value),
            _ => None,
        }
    }
}

// Plain equality is structural equality with no unification pair.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other, None)
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::or(self, rhs)
    }
}
