//! Module: db::cursor
//! Responsibility: the seekable-cursor contract and interval-filtered traversal.
//! Does not own: index storage, predicate decoding, or attribution.
//! Boundary: storage engines implement `SeekableCursor`; the executor wraps
//! one in `FilteredCursor` together with a planned match table.

mod filtered;


use crate::value::Value;
use thiserror::Error as ThisError;

pub use filtered::FilteredCursor;

///
/// SeekableCursor
///
/// Forward cursor over all rows of one ordered index, in index order, with
/// prefix positioning. `seek` places the cursor on the first row whose
/// leading `prefix_len` key columns are at-or-after (`following = false`) or
/// strictly after (`following = true`) the given prefix; a successful seek
/// leaves the cursor on a row, no extra `advance` needed.
///
/// `column_value` and `current` are meaningful only after a successful
/// `advance` or `seek`. Implementations are synchronous and single-threaded.
///

pub trait SeekableCursor {
    type Row;

    /// Advance one row in index order; `false` iff past the end.
    fn advance(&mut self) -> Result<bool, CursorError>;

    /// The current row, when positioned on one.
    fn current(&self) -> Option<&Self::Row>;

    /// The `ordinal`-th key column of the current row.
    fn column_value(&self, ordinal: usize) -> Result<Value, CursorError>;

    /// Position at the prefix lower bound (`following = false`) or strictly
    /// past the prefix (`following = true`); `false` iff no such row exists.
    fn seek(
        &mut self,
        prefix_len: usize,
        key: &[Value],
        following: bool,
    ) -> Result<bool, CursorError>;

    /// Rewind to before the first row.
    fn reset(&mut self);
}

///
/// CursorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    #[error("column ordinal {ordinal} out of range for key arity {arity}")]
    ColumnOutOfRange { ordinal: usize, arity: usize },

    #[error("seek prefix length {len} exceeds key arity {arity}")]
    SeekPrefixOutOfRange { len: usize, arity: usize },

    #[error("cursor is not positioned on a row")]
    NotPositioned,

    #[error("cursor invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("underlying cursor failure: {message}")]
    Underlying { message: String },
}
