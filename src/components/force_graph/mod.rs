mod component;
mod render;
pub mod scale;
mod state;
mod surface;
mod types;

pub use component::ForceGraphCanvas;
pub use surface::SharedStyles;
pub use types::{
	EdgeRecord, ElementKind, GraphEdge, GraphNode, GraphSnapshot, NodeRecord, Record,
	SearchIndexEntry, Tooltip,
};
