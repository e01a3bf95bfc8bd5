//! SieveDB — expression-driven index planning and filtered cursors for
//! embedded tables.
//!
//! This is the public meta-crate. Downstream users depend on **sievedb**
//! only.
//!
//! It re-exports the stable public API from:
//!   - `sievedb-core` (expression dialect, interval planning, cursors)

pub use sievedb_core as core;

pub use sievedb_core::MAX_INDEX_COLUMNS;

//
// Prelude
//

pub mod prelude {
    pub use sievedb_core::prelude::*;
}
