use crate::components::force_graph::scale;
use crate::components::force_graph::{GraphEdge, GraphNode};
use crate::config::ViewerConfig;

/// Growth factor of a highlighted node.
const NODE_HIGHLIGHT_GROWTH: f64 = 1.15;
const NODE_HIGHLIGHT_BORDER: f64 = 2.0;
const EDGE_HIGHLIGHT_GROWTH: f64 = 1.5;
/// Highlighting widens thin edges up to this width; it never narrows an edge.
const EDGE_HIGHLIGHT_MAX_WIDTH: f64 = 5.0;
const EDGE_NORMAL_OPACITY: f64 = 0.5;
const EDGE_HIGHLIGHT_OPACITY: f64 = 0.85;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	pub border_width: f64,
	/// Diameter in graph units.
	pub size: f64,
	pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub line_color: String,
	pub text_color: String,
	pub opacity: f64,
	pub width: f64,
	pub highlighted: bool,
}

/// Per-element style mutation, the only thing the selection controller asks
/// of whatever draws the graph.
pub trait RenderSurface {
	fn style_node(&self, id: &str, style: NodeStyle);
	fn style_edge(&self, id: &str, style: EdgeStyle);
}

/// Turns canonical records into base and highlight styles.
#[derive(Clone, Debug, Default)]
pub struct Palette {
	config: ViewerConfig,
}

impl Palette {
	pub fn new(config: ViewerConfig) -> Self {
		Self { config }
	}

	pub fn node_base(&self, node: &GraphNode) -> NodeStyle {
		NodeStyle {
			fill: node.color.clone(),
			border_width: 0.0,
			size: scale::node_size(node.weight, &self.config),
			highlighted: false,
		}
	}

	pub fn node_highlight(&self, node: &GraphNode) -> NodeStyle {
		let fill = if node.highlight_color.is_empty() {
			node.color.clone()
		} else {
			node.highlight_color.clone()
		};
		NodeStyle {
			fill,
			border_width: NODE_HIGHLIGHT_BORDER,
			size: scale::node_size(node.weight, &self.config) * NODE_HIGHLIGHT_GROWTH,
			highlighted: true,
		}
	}

	pub fn edge_base(&self, edge: &GraphEdge) -> EdgeStyle {
		EdgeStyle {
			line_color: self.config.default_edge_color.clone(),
			text_color: self.config.default_edge_text_color.clone(),
			opacity: EDGE_NORMAL_OPACITY,
			width: scale::edge_width(edge.weight, &self.config),
			highlighted: false,
		}
	}

	pub fn edge_highlight(&self, edge: &GraphEdge) -> EdgeStyle {
		let base = scale::edge_width(edge.weight, &self.config);
		EdgeStyle {
			line_color: self.config.highlighted_edge_color.clone(),
			text_color: self.config.highlighted_edge_text_color.clone(),
			opacity: EDGE_HIGHLIGHT_OPACITY,
			width: (base * EDGE_HIGHLIGHT_GROWTH).min(base.max(EDGE_HIGHLIGHT_MAX_WIDTH)),
			highlighted: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(weight: f64) -> GraphNode {
		GraphNode {
			id: "n1".into(),
			label: "Node 1".into(),
			weight,
			color: "#091849".into(),
			highlight_color: "#0b1d59".into(),
		}
	}

	fn edge(weight: f64) -> GraphEdge {
		GraphEdge {
			id: "e1".into(),
			source: "a".into(),
			target: "b".into(),
			label: "knows".into(),
			weight,
		}
	}

	#[test]
	fn node_highlight_swaps_fill_and_grows() {
		let palette = Palette::default();
		let base = palette.node_base(&node(20.0));
		let lit = palette.node_highlight(&node(20.0));
		assert_eq!(base.fill, "#091849");
		assert_eq!(base.border_width, 0.0);
		assert_eq!(lit.fill, "#0b1d59");
		assert_eq!(lit.border_width, 2.0);
		assert!((lit.size - 23.0).abs() < 1e-9);
	}

	#[test]
	fn node_without_highlight_color_keeps_base_fill() {
		let mut plain = node(20.0);
		plain.highlight_color.clear();
		assert_eq!(Palette::default().node_highlight(&plain).fill, "#091849");
	}

	#[test]
	fn edge_highlight_widens_thin_edges_up_to_cap() {
		let palette = Palette::default();
		assert_eq!(palette.edge_highlight(&edge(2.0)).width, 3.0);
		assert_eq!(palette.edge_highlight(&edge(4.0)).width, 5.0);
		assert_eq!(palette.edge_highlight(&edge(8.0)).width, 8.0);
		assert_eq!(palette.edge_base(&edge(8.0)).width, 8.0);
	}

	#[test]
	fn edge_colors_follow_config() {
		let palette = Palette::new(ViewerConfig {
			default_edge_color: "#ccc".into(),
			highlighted_edge_color: "#eee".into(),
			..ViewerConfig::default()
		});
		assert_eq!(palette.edge_base(&edge(1.0)).line_color, "#ccc");
		assert_eq!(palette.edge_highlight(&edge(1.0)).line_color, "#eee");
		assert_eq!(palette.edge_highlight(&edge(1.0)).opacity, 0.85);
	}
}
