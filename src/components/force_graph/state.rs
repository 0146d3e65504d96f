use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::surface::SharedStyles;
use super::types::GraphSnapshot;
use crate::selection::{EdgeStyle, NodeStyle, Palette};

/// Extra hit slack around a node, in graph units.
pub const HIT_SLACK: f64 = 4.0;
/// Distance from an edge line that still counts as a hit, in screen pixels.
pub const EDGE_HIT_PX: f64 = 6.0;
/// Pointer travel below this many pixels is a click, not a drag.
pub const CLICK_SLOP_PX: f64 = 4.0;
const FIT_PADDING: f64 = 40.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub base: NodeStyle,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub id: String,
	pub label: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub base: EdgeStyle,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Where the primary button went down and whether it has moved since.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub origin: Option<(f64, f64)>,
	pub moved: bool,
}

/// An element under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(String),
	Edge(String),
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub styles: SharedStyles,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub press: PressState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<EdgeInfo>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(
		snapshot: &GraphSnapshot,
		palette: &Palette,
		styles: SharedStyles,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 600.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		let count = snapshot.nodes.len().max(1) as f64;
		for (i, record) in snapshot.nodes.iter().enumerate() {
			let node = &record.data;
			let angle = (i as f64) * 2.0 * PI / count;
			let spread = 40.0 * count.sqrt();
			let (x, y) = (
				(width / 2.0 + spread * angle.cos()) as f32,
				(height / 2.0 + spread * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					base: palette.node_base(node),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for record in &snapshot.edges {
			let edge = &record.data;
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeInfo {
					id: edge.id.clone(),
					label: edge.label.clone(),
					source: src,
					target: tgt,
					base: palette.edge_base(edge),
				});
			}
		}

		Self {
			graph,
			styles,
			edges,
			id_to_idx,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: PressState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// Current layout position of every node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Effective diameter of a node: its override if styled, else its base.
	pub fn node_size(&self, info: &NodeInfo) -> f64 {
		self.styles
			.with(|book| book.node(&info.id).map(|style| style.size))
			.unwrap_or(info.base.size)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let radius = self.node_size(&node.data.user_data) / 2.0 + HIT_SLACK;
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<&EdgeInfo> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT_PX / self.transform.k;
		let positions = self.positions();
		self.edges
			.iter()
			.filter_map(|edge| {
				let a = positions.get(&edge.source)?;
				let b = positions.get(&edge.target)?;
				Some((edge, segment_distance((gx, gy), *a, *b)))
			})
			.filter(|(_, dist)| *dist < tolerance)
			.min_by(|(_, a), (_, b)| a.total_cmp(b))
			.map(|(edge, _)| edge)
	}

	/// Node first, since node discs are drawn over edge lines.
	pub fn hit(&self, sx: f64, sy: f64) -> Option<Hit> {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let mut id = None;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					id = Some(node.data.user_data.id.clone());
				}
			});
			return id.map(Hit::Node);
		}
		self.edge_at_position(sx, sy)
			.map(|edge| Hit::Edge(edge.id.clone()))
	}

	/// Screen position a tooltip for `hit` is anchored to.
	pub fn anchor(&self, hit: &Hit) -> Option<(f64, f64)> {
		let positions = self.positions();
		let (gx, gy) = match hit {
			Hit::Node(id) => *positions.get(self.id_to_idx.get(id)?)?,
			Hit::Edge(id) => {
				let edge = self.edges.iter().find(|e| &e.id == id)?;
				let (ax, ay) = positions.get(&edge.source)?;
				let (bx, by) = positions.get(&edge.target)?;
				((ax + bx) / 2.0, (ay + by) / 2.0)
			}
		};
		Some(self.graph_to_screen(gx, gy))
	}

	/// Mean position of `ids`, or of every node when none of them are known.
	pub fn centroid(&self, ids: &[String]) -> Option<(f64, f64)> {
		let positions = self.positions();
		let picked: Vec<(f64, f64)> = ids
			.iter()
			.filter_map(|id| positions.get(self.id_to_idx.get(id)?).copied())
			.collect();
		let points: Vec<(f64, f64)> = if picked.is_empty() {
			positions.into_values().collect()
		} else {
			picked
		};
		if points.is_empty() {
			return None;
		}
		let n = points.len() as f64;
		let (sx, sy) = points
			.iter()
			.fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
		Some((sx / n, sy / n))
	}

	/// Zoom by `factor`, keeping graph point `around` fixed on screen.
	pub fn zoom_by(&mut self, factor: f64, around: (f64, f64)) {
		let (ax, ay) = self.graph_to_screen(around.0, around.1);
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = ax - (ax - self.transform.x) * ratio;
		self.transform.y = ay - (ay - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Pan so graph point `target` sits in the middle of the canvas.
	pub fn center_on(&mut self, target: (f64, f64)) {
		self.transform.x = self.width / 2.0 - target.0 * self.transform.k;
		self.transform.y = self.height / 2.0 - target.1 * self.transform.k;
	}

	/// Zoom and pan so every node is visible.
	pub fn fit(&mut self) {
		let positions = self.positions();
		if positions.is_empty() {
			return;
		}
		let (mut min_x, mut min_y, mut max_x, mut max_y) =
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for (x, y) in positions.values() {
			min_x = min_x.min(*x);
			min_y = min_y.min(*y);
			max_x = max_x.max(*x);
			max_y = max_y.max(*y);
		}
		let (w, h) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / w)
			.min((self.height - 2.0 * FIT_PADDING) / h)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		self.transform.k = k;
		self.center_on(((min_x + max_x) / 2.0, (min_y + max_y) / 2.0));
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
