use std::collections::HashMap;

use super::tracker::{HighlightSet, IdSet};
use crate::components::force_graph::{
	ElementKind, GraphEdge, GraphNode, GraphSnapshot, SearchIndexEntry,
};

/// The `/graph` snapshot keyed by id, in snapshot order.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	node_pos: HashMap<String, usize>,
	edge_pos: HashMap<String, usize>,
}

impl GraphIndex {
	pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
		let mut index = Self::default();
		for record in &snapshot.nodes {
			index.learn_node(&record.data);
		}
		for record in &snapshot.edges {
			index.learn_edge(&record.data);
		}
		index
	}

	/// Insert or refresh a node from a canonical record.
	pub fn learn_node(&mut self, node: &GraphNode) {
		match self.node_pos.get(&node.id) {
			Some(&idx) => self.nodes[idx] = node.clone(),
			None => {
				self.node_pos.insert(node.id.clone(), self.nodes.len());
				self.nodes.push(node.clone());
			}
		}
	}

	/// Insert or refresh an edge from a canonical record.
	pub fn learn_edge(&mut self, edge: &GraphEdge) {
		match self.edge_pos.get(&edge.id) {
			Some(&idx) => self.edges[idx] = edge.clone(),
			None => {
				self.edge_pos.insert(edge.id.clone(), self.edges.len());
				self.edges.push(edge.clone());
			}
		}
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.node_pos.get(id).map(|&idx| &self.nodes[idx])
	}

	pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
		self.edge_pos.get(id).map(|&idx| &self.edges[idx])
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}
}

/// Additions and removals needed to move the search highlight to a new
/// match list. Ids present before and after appear in neither half.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchDelta {
	pub nodes_on: Vec<String>,
	pub nodes_off: Vec<String>,
	pub edges_on: Vec<String>,
	pub edges_off: Vec<String>,
}

impl SearchDelta {
	pub fn is_empty(&self) -> bool {
		self.nodes_on.is_empty()
			&& self.nodes_off.is_empty()
			&& self.edges_on.is_empty()
			&& self.edges_off.is_empty()
	}
}

/// Logical selection: what the user clicked and what the search box matched.
///
/// An element is drawn highlighted while anything here still holds it.
#[derive(Clone, Debug, Default)]
pub struct SelectionLedger {
	pub clicked: HighlightSet,
	pub searched: HighlightSet,
}

impl SelectionLedger {
	/// Whether node `id` must stay highlighted: clicked, matched, or an
	/// endpoint of a clicked edge other than `except_edge`.
	pub fn node_held(&self, id: &str, graph: &GraphIndex, except_edge: Option<&str>) -> bool {
		if self.clicked.is_node_highlighted(id) || self.searched.is_node_highlighted(id) {
			return true;
		}
		self.clicked
			.edges()
			.iter()
			.filter(|edge_id| Some(*edge_id) != except_edge)
			.filter_map(|edge_id| graph.edge(edge_id))
			.any(|edge| edge.touches(id))
	}

	/// Whether `edge` must stay highlighted: clicked, matched, or incident to
	/// a clicked node other than `except_node`.
	pub fn edge_held(&self, edge: &GraphEdge, except_node: Option<&str>) -> bool {
		if self.clicked.is_edge_highlighted(&edge.id) || self.searched.is_edge_highlighted(&edge.id) {
			return true;
		}
		[edge.source.as_str(), edge.target.as_str()]
			.into_iter()
			.filter(|node_id| Some(*node_id) != except_node)
			.any(|node_id| self.clicked.is_node_highlighted(node_id))
	}

	pub fn search_delta(&self, matches: &[SearchIndexEntry]) -> SearchDelta {
		let mut wanted = HighlightSet::default();
		for entry in matches {
			match entry.kind {
				ElementKind::Node => wanted.add_node(&entry.id),
				ElementKind::Edge => wanted.add_edge(&entry.id),
			}
		}

		let added = |now: &IdSet, before: &IdSet| {
			now.iter()
				.filter(|id| !before.contains(id))
				.map(str::to_owned)
				.collect::<Vec<_>>()
		};

		SearchDelta {
			nodes_on: added(wanted.nodes(), self.searched.nodes()),
			nodes_off: added(self.searched.nodes(), wanted.nodes()),
			edges_on: added(wanted.edges(), self.searched.edges()),
			edges_off: added(self.searched.edges(), wanted.edges()),
		}
	}

	pub fn clear(&mut self) {
		self.clicked.clear();
		self.searched.clear();
	}
}
