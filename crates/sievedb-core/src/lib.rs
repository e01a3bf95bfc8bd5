//! Core runtime for SieveDB: the expression dialect, structural matching,
//! interval planning, and the filtered index cursor.
//!
//! The crate turns a conjunction of comparison predicates over a row
//! variable into per-column intervals on an ordered table index, then
//! drives a seekable storage cursor so only rows inside the resulting
//! bounding box are visited, in index order. Storage engines, result
//! materialization, and index selection policy live with the host.

pub mod db;
pub mod expr;
pub mod obs;
pub mod test_support;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of columns allowed on one table index.
///
/// This keeps cached key tuples and planner match tables within bounded,
/// predictable sizes.
pub const MAX_INDEX_COLUMNS: usize = 16;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, fixtures, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            cursor::{FilteredCursor, SeekableCursor},
            index::{ColumnDescriptor, Interval, TableIndex},
            query::{IndexColumnMatch, compute_matches, split_conjunction},
        },
        expr::{Expr, Var},
        value::Value,
    };
}
