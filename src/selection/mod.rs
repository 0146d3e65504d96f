//! Highlight tracking and the controller that keeps it in sync with the canvas.

mod controller;
mod ledger;
mod style;
mod tooltip;
mod tracker;

pub use controller::SelectionController;
pub use ledger::GraphIndex;
pub use style::{EdgeStyle, NodeStyle, Palette, RenderSurface};
