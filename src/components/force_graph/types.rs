use serde::{Deserialize, Serialize};

/// Envelope the graph API wraps every node and edge in: `{ "data": { .. } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
	pub data: T,
}

pub type NodeRecord = Record<GraphNode>;
pub type EdgeRecord = Record<GraphEdge>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub weight: f64,
	#[serde(default)]
	pub color: String,
	#[serde(default)]
	pub highlight_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub weight: f64,
}

impl GraphEdge {
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Full graph as served by `GET /graph`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default)]
	pub nodes: Vec<NodeRecord>,
	#[serde(default)]
	pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
	Node,
	Edge,
}

/// One row of `GET /autocomplete`, the flattened projection the search box matches on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type")]
	pub kind: ElementKind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
	#[serde(default)]
	pub iri: String,
	#[serde(default)]
	pub label: String,
	#[serde(default, rename = "type")]
	pub kind: String,
	pub description: String,
}
