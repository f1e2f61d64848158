//! Match engines: decide whether an entry satisfies a query, and how well.
pub mod exact;
pub mod util;
