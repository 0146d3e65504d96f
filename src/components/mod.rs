//! Leptos components for the graph viewer.

pub mod force_graph;
mod search_box;

pub use search_box::SearchBox;

use crate::api::HttpGraphStore;
use crate::selection::SelectionController;
use force_graph::SharedStyles;

/// The selection controller as wired in the browser: HTTP store, canvas styles.
pub type GraphController = SelectionController<HttpGraphStore, SharedStyles>;
