//! Search box internals: fuzzy index, input debounce, result list navigation.

mod cursor;
mod debounce;
mod index;

pub use cursor::{NavKey, NavOutcome, ResultCursor};
pub use debounce::Debouncer;
pub use index::{SearchIndex, SearchMatch};
