//! Read-only access to the remote graph store.

mod client;
mod error;

pub use client::{GraphStore, HttpGraphStore};
pub use error::FetchError;
