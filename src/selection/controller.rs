use std::cell::{Ref, RefCell};

use futures_util::future::{join, join4};
use log::{debug, error};

use super::ledger::{GraphIndex, SelectionLedger};
use super::style::{Palette, RenderSurface};
use super::tooltip::{self, TooltipBook, TooltipStep};
use crate::api::GraphStore;
use crate::components::force_graph::{ElementKind, SearchIndexEntry};

/// Keeps the logical selection and the drawn highlight in step.
///
/// Every operation fetches canonical records first and mutates the surface
/// and the ledger only once the matching response arrives. A failed fetch is
/// logged and its share of the work is dropped; work already applied by a
/// sibling fetch stays applied.
pub struct SelectionController<S, R> {
	store: S,
	surface: R,
	palette: Palette,
	graph: RefCell<GraphIndex>,
	ledger: RefCell<SelectionLedger>,
	tooltips: RefCell<TooltipBook>,
}

impl<S: GraphStore, R: RenderSurface> SelectionController<S, R> {
	pub fn new(store: S, surface: R, palette: Palette, graph: GraphIndex) -> Self {
		Self {
			store,
			surface,
			palette,
			graph: RefCell::new(graph),
			ledger: RefCell::new(SelectionLedger::default()),
			tooltips: RefCell::new(TooltipBook::default()),
		}
	}

	#[cfg(test)]
	pub fn ledger(&self) -> Ref<'_, SelectionLedger> {
		self.ledger.borrow()
	}

	pub fn graph(&self) -> Ref<'_, GraphIndex> {
		self.graph.borrow()
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn surface(&self) -> &R {
		&self.surface
	}

	/// Ids of explicitly selected nodes, in selection order.
	pub fn clicked_nodes(&self) -> Vec<String> {
		self.ledger.borrow().clicked.nodes().iter().map(str::to_owned).collect()
	}

	pub async fn toggle_node(&self, id: &str) {
		let selected = self.ledger.borrow().clicked.is_node_highlighted(id);
		if selected {
			self.unselect_node(id).await;
		} else {
			self.select_node(id).await;
		}
	}

	pub async fn toggle_edge(&self, id: &str) {
		let selected = self.ledger.borrow().clicked.is_edge_highlighted(id);
		if selected {
			self.unselect_edge(id).await;
		} else {
			self.select_edge(id).await;
		}
	}

	pub async fn select_node(&self, id: &str) {
		debug!("select node {id}");
		let node = async {
			match self.store.node(id).await {
				Ok(record) => {
					self.graph.borrow_mut().learn_node(&record.data);
					self.surface
						.style_node(&record.data.id, self.palette.node_highlight(&record.data));
					self.ledger.borrow_mut().clicked.add_node(id);
				}
				Err(err) => error!("Failed to select node {id}: {err}"),
			}
		};
		let edges = async {
			match self.store.node_edges(id).await {
				Ok(records) => {
					for record in records {
						self.graph.borrow_mut().learn_edge(&record.data);
						self.surface
							.style_edge(&record.data.id, self.palette.edge_highlight(&record.data));
					}
				}
				Err(err) => error!("Failed to fetch edges of node {id}: {err}"),
			}
		};
		join(node, edges).await;
	}

	pub async fn unselect_node(&self, id: &str) {
		debug!("unselect node {id}");
		let node = async {
			match self.store.node(id).await {
				Ok(record) => {
					let held = {
						let mut ledger = self.ledger.borrow_mut();
						ledger.clicked.remove_node(id);
						ledger.node_held(id, &self.graph.borrow(), None)
					};
					if !held {
						self.surface
							.style_node(&record.data.id, self.palette.node_base(&record.data));
					}
				}
				Err(err) => error!("Failed to unselect node {id}: {err}"),
			}
		};
		let edges = async {
			match self.store.node_edges(id).await {
				Ok(records) => {
					for record in records {
						let held = self.ledger.borrow().edge_held(&record.data, Some(id));
						if !held {
							self.surface
								.style_edge(&record.data.id, self.palette.edge_base(&record.data));
						}
					}
				}
				Err(err) => error!("Failed to fetch edges of node {id}: {err}"),
			}
		};
		join(node, edges).await;
	}

	pub async fn select_edge(&self, id: &str) {
		debug!("select edge {id}");
		let edge = async {
			match self.store.edge(id).await {
				Ok(record) => {
					self.graph.borrow_mut().learn_edge(&record.data);
					self.surface
						.style_edge(&record.data.id, self.palette.edge_highlight(&record.data));
					self.ledger.borrow_mut().clicked.add_edge(id);
				}
				Err(err) => error!("Failed to select edge {id}: {err}"),
			}
		};
		let endpoints = async {
			match self.store.edge_nodes(id).await {
				Ok(records) => {
					for record in records {
						self.surface
							.style_node(&record.data.id, self.palette.node_highlight(&record.data));
					}
				}
				Err(err) => error!("Failed to fetch endpoints of edge {id}: {err}"),
			}
		};
		join(edge, endpoints).await;
	}

	pub async fn unselect_edge(&self, id: &str) {
		debug!("unselect edge {id}");
		let edge = async {
			match self.store.edge(id).await {
				Ok(record) => {
					let held = {
						let mut ledger = self.ledger.borrow_mut();
						ledger.clicked.remove_edge(id);
						ledger.edge_held(&record.data, None)
					};
					if !held {
						self.surface
							.style_edge(&record.data.id, self.palette.edge_base(&record.data));
					}
				}
				Err(err) => error!("Failed to unselect edge {id}: {err}"),
			}
		};
		let endpoints = async {
			match self.store.edge_nodes(id).await {
				Ok(records) => {
					for record in records {
						let held = self.ledger.borrow().node_held(
							&record.data.id,
							&self.graph.borrow(),
							Some(id),
						);
						if !held {
							self.surface
								.style_node(&record.data.id, self.palette.node_base(&record.data));
						}
					}
				}
				Err(err) => error!("Failed to fetch endpoints of edge {id}: {err}"),
			}
		};
		join(edge, endpoints).await;
	}

	/// Move the search highlight to `matches`: light up new matches, release
	/// the ones that dropped out, and leave the rest alone.
	pub async fn apply_delta_from_search(&self, matches: &[SearchIndexEntry]) {
		let delta = self.ledger.borrow().search_delta(matches);
		if delta.is_empty() {
			return;
		}
		debug!(
			"search delta: +{} -{} nodes, +{} -{} edges",
			delta.nodes_on.len(),
			delta.nodes_off.len(),
			delta.edges_on.len(),
			delta.edges_off.len()
		);

		let nodes_on = async {
			if delta.nodes_on.is_empty() {
				return;
			}
			match self.store.nodes(&delta.nodes_on).await {
				Ok(records) => {
					for record in records {
						self.surface
							.style_node(&record.data.id, self.palette.node_highlight(&record.data));
						self.ledger.borrow_mut().searched.add_node(&record.data.id);
					}
				}
				Err(err) => error!("{err}"),
			}
		};
		let nodes_off = async {
			if delta.nodes_off.is_empty() {
				return;
			}
			match self.store.nodes(&delta.nodes_off).await {
				Ok(records) => {
					for record in records {
						let held = {
							let mut ledger = self.ledger.borrow_mut();
							ledger.searched.remove_node(&record.data.id);
							ledger.node_held(&record.data.id, &self.graph.borrow(), None)
						};
						if !held {
							self.surface
								.style_node(&record.data.id, self.palette.node_base(&record.data));
						}
					}
				}
				Err(err) => error!("{err}"),
			}
		};
		let edges_on = async {
			if delta.edges_on.is_empty() {
				return;
			}
			match self.store.edges(&delta.edges_on).await {
				Ok(records) => {
					for record in records {
						self.graph.borrow_mut().learn_edge(&record.data);
						self.surface
							.style_edge(&record.data.id, self.palette.edge_highlight(&record.data));
						self.ledger.borrow_mut().searched.add_edge(&record.data.id);
					}
				}
				Err(err) => error!("{err}"),
			}
		};
		let edges_off = async {
			if delta.edges_off.is_empty() {
				return;
			}
			match self.store.edges(&delta.edges_off).await {
				Ok(records) => {
					for record in records {
						let held = {
							let mut ledger = self.ledger.borrow_mut();
							ledger.searched.remove_edge(&record.data.id);
							ledger.edge_held(&record.data, None)
						};
						if !held {
							self.surface
								.style_edge(&record.data.id, self.palette.edge_base(&record.data));
						}
					}
				}
				Err(err) => error!("{err}"),
			}
		};
		join4(nodes_on, nodes_off, edges_on, edges_off).await;
	}

	/// Drop the search highlight, then select the chosen result.
	pub async fn stop_search_with_result(&self, entry: &SearchIndexEntry) {
		self.apply_delta_from_search(&[]).await;
		match entry.kind {
			ElementKind::Node => self.select_node(&entry.id).await,
			ElementKind::Edge => self.select_edge(&entry.id).await,
		}
	}

	/// Clear every selection and restore base styles from the snapshot.
	pub fn unselect_all(&self) {
		self.ledger.borrow_mut().clear();
		let graph = self.graph.borrow();
		for node in graph.nodes() {
			self.surface.style_node(&node.id, self.palette.node_base(node));
		}
		for edge in graph.edges() {
			self.surface.style_edge(&edge.id, self.palette.edge_base(edge));
		}
	}

	/// Toggle the tooltip of a node or edge, fetching its content on first use.
	pub async fn show_tooltip(&self, id: &str) {
		let step = self.tooltips.borrow_mut().toggle(id);
		if step != TooltipStep::Fetch {
			return;
		}
		match self.store.tooltip(id).await {
			Ok(tip) => {
				let content = tooltip::sanitize(&tip.description);
				self.tooltips.borrow_mut().loaded(id, content);
			}
			Err(err) => {
				error!("Failed to get tooltip for {id}, error: {err}");
				self.tooltips.borrow_mut().failed(id);
			}
		}
	}

	pub fn hide_tooltip(&self, id: &str) {
		self.tooltips.borrow_mut().hide(id);
	}

	/// `(id, markup)` of every visible tooltip.
	pub fn shown_tooltips(&self) -> Vec<(String, String)> {
		self.tooltips
			.borrow()
			.shown()
			.map(|(id, content)| (id.to_owned(), content.to_owned()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::{HashMap, HashSet};

	use super::*;
	use crate::api::FetchError;
	use crate::components::force_graph::{
		EdgeRecord, GraphEdge, GraphNode, GraphSnapshot, NodeRecord, Record, Tooltip,
	};
	use crate::selection::style::{EdgeStyle, NodeStyle};

	struct MemoryStore {
		snapshot: GraphSnapshot,
		tooltips: HashMap<String, String>,
		broken: HashSet<String>,
		calls: RefCell<Vec<String>>,
	}

	impl MemoryStore {
		fn new(snapshot: GraphSnapshot) -> Self {
			Self {
				snapshot,
				tooltips: HashMap::new(),
				broken: HashSet::new(),
				calls: RefCell::new(Vec::new()),
			}
		}

		fn hit(&self, path: String) -> Result<(), FetchError> {
			self.calls.borrow_mut().push(path.clone());
			if self.broken.contains(&path) {
				return Err(FetchError::Status {
					url: path,
					status: 500,
				});
			}
			Ok(())
		}

		fn find_node(&self, id: &str) -> Option<NodeRecord> {
			self.snapshot.nodes.iter().find(|n| n.data.id == id).cloned()
		}

		fn find_edge(&self, id: &str) -> Option<EdgeRecord> {
			self.snapshot.edges.iter().find(|e| e.data.id == id).cloned()
		}

		fn missing(path: String) -> FetchError {
			FetchError::Status {
				url: path,
				status: 404,
			}
		}
	}

	impl GraphStore for MemoryStore {
		async fn node(&self, id: &str) -> Result<NodeRecord, FetchError> {
			let path = format!("/node/{id}");
			self.hit(path.clone())?;
			self.find_node(id).ok_or_else(|| Self::missing(path))
		}

		async fn edge(&self, id: &str) -> Result<EdgeRecord, FetchError> {
			let path = format!("/edge/{id}");
			self.hit(path.clone())?;
			self.find_edge(id).ok_or_else(|| Self::missing(path))
		}

		async fn node_edges(&self, id: &str) -> Result<Vec<EdgeRecord>, FetchError> {
			self.hit(format!("/node/{id}/edges"))?;
			Ok(self
				.snapshot
				.edges
				.iter()
				.filter(|e| e.data.touches(id))
				.cloned()
				.collect())
		}

		async fn edge_nodes(&self, id: &str) -> Result<Vec<NodeRecord>, FetchError> {
			let path = format!("/edge/{id}/nodes");
			self.hit(path.clone())?;
			let edge = self.find_edge(id).ok_or_else(|| Self::missing(path))?;
			Ok([&edge.data.source, &edge.data.target]
				.into_iter()
				.filter_map(|n| self.find_node(n))
				.collect())
		}

		async fn nodes(&self, ids: &[String]) -> Result<Vec<NodeRecord>, FetchError> {
			self.hit(format!("/nodes/{}", ids.join(",")))?;
			Ok(ids.iter().filter_map(|id| self.find_node(id)).collect())
		}

		async fn edges(&self, ids: &[String]) -> Result<Vec<EdgeRecord>, FetchError> {
			self.hit(format!("/edges/{}", ids.join(",")))?;
			Ok(ids.iter().filter_map(|id| self.find_edge(id)).collect())
		}

		async fn tooltip(&self, id: &str) -> Result<Tooltip, FetchError> {
			let path = format!("/tooltip/{id}");
			self.hit(path.clone())?;
			let description = self
				.tooltips
				.get(id)
				.cloned()
				.ok_or_else(|| Self::missing(path))?;
			Ok(Tooltip {
				description,
				..Tooltip::default()
			})
		}
	}

	#[derive(Default)]
	struct RecordingSurface {
		nodes: RefCell<HashMap<String, NodeStyle>>,
		edges: RefCell<HashMap<String, EdgeStyle>>,
		mutations: RefCell<Vec<String>>,
	}

	impl RecordingSurface {
		fn node_lit(&self, id: &str) -> bool {
			self.nodes.borrow().get(id).is_some_and(|s| s.highlighted)
		}

		fn edge_lit(&self, id: &str) -> bool {
			self.edges.borrow().get(id).is_some_and(|s| s.highlighted)
		}

		fn touched(&self, id: &str) -> bool {
			self.mutations.borrow().iter().any(|m| m == id)
		}

		fn forget(&self) {
			self.mutations.borrow_mut().clear();
		}
	}

	impl RenderSurface for RecordingSurface {
		fn style_node(&self, id: &str, style: NodeStyle) {
			self.mutations.borrow_mut().push(id.to_owned());
			self.nodes.borrow_mut().insert(id.to_owned(), style);
		}

		fn style_edge(&self, id: &str, style: EdgeStyle) {
			self.mutations.borrow_mut().push(id.to_owned());
			self.edges.borrow_mut().insert(id.to_owned(), style);
		}
	}

	fn node(id: &str) -> NodeRecord {
		Record {
			data: GraphNode {
				id: id.into(),
				label: format!("Node {id}"),
				weight: 20.0,
				color: "#091849".into(),
				highlight_color: "#0b1d59".into(),
			},
		}
	}

	fn edge(id: &str, source: &str, target: &str) -> EdgeRecord {
		Record {
			data: GraphEdge {
				id: id.into(),
				source: source.into(),
				target: target.into(),
				label: "rel".into(),
				weight: 2.0,
			},
		}
	}

	/// a -e1- b -e2- c, plus isolated n1..n3 for search tests.
	fn snapshot() -> GraphSnapshot {
		GraphSnapshot {
			nodes: ["a", "b", "c", "n1", "n2", "n3"].into_iter().map(node).collect(),
			edges: vec![edge("e1", "a", "b"), edge("e2", "b", "c")],
		}
	}

	fn controller(store: MemoryStore) -> SelectionController<MemoryStore, RecordingSurface> {
		let graph = GraphIndex::from_snapshot(&store.snapshot);
		SelectionController::new(store, RecordingSurface::default(), Palette::default(), graph)
	}

	fn hit(id: &str) -> SearchIndexEntry {
		SearchIndexEntry {
			id: id.into(),
			label: format!("Node {id}"),
			kind: ElementKind::Node,
		}
	}

	#[tokio::test]
	async fn toggle_node_alternates() {
		let ctl = controller(MemoryStore::new(snapshot()));
		for round in 0..5 {
			ctl.toggle_node("a").await;
			let expect = round % 2 == 0;
			assert_eq!(ctl.ledger().clicked.is_node_highlighted("a"), expect);
			assert_eq!(ctl.surface().node_lit("a"), expect);
		}
	}

	#[tokio::test]
	async fn select_node_lights_incident_edges() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_node("b").await;
		assert!(ctl.surface().node_lit("b"));
		assert!(ctl.surface().edge_lit("e1"));
		assert!(ctl.surface().edge_lit("e2"));
		assert!(!ctl.ledger().clicked.is_edge_highlighted("e1"));
	}

	#[tokio::test]
	async fn unselect_node_keeps_edge_held_by_other_node() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_node("a").await;
		ctl.select_node("b").await;
		ctl.unselect_node("b").await;

		assert!(!ctl.surface().node_lit("b"));
		assert!(ctl.surface().edge_lit("e1"), "e1 still touches selected a");
		assert!(!ctl.surface().edge_lit("e2"));
	}

	#[tokio::test]
	async fn unselecting_edge_keeps_shared_endpoint() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_edge("e1").await;
		ctl.select_edge("e2").await;
		ctl.unselect_edge("e1").await;

		assert!(!ctl.surface().edge_lit("e1"));
		assert!(ctl.surface().edge_lit("e2"));
		assert!(ctl.surface().node_lit("b"));
		assert!(ctl.surface().node_lit("c"));
		assert!(!ctl.surface().node_lit("a"));
	}

	#[tokio::test]
	async fn unselecting_edge_keeps_clicked_endpoint() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_node("a").await;
		ctl.select_edge("e1").await;
		ctl.toggle_edge("e1").await;

		assert!(ctl.surface().node_lit("a"));
		assert!(!ctl.surface().node_lit("b"));
		assert!(ctl.surface().edge_lit("e1"), "e1 touches selected a");
	}

	#[tokio::test]
	async fn search_delta_touches_only_changed_matches() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.apply_delta_from_search(&[hit("n1"), hit("n2")]).await;
		assert!(ctl.surface().node_lit("n1"));
		assert!(ctl.surface().node_lit("n2"));

		ctl.surface().forget();
		ctl.apply_delta_from_search(&[hit("n2"), hit("n3")]).await;

		assert!(ctl.surface().node_lit("n3"));
		assert!(!ctl.surface().node_lit("n1"));
		assert!(ctl.surface().node_lit("n2"));
		assert!(!ctl.surface().touched("n2"));
		assert!(ctl.ledger().searched.is_node_highlighted("n3"));
		assert!(!ctl.ledger().searched.is_node_highlighted("n1"));
	}

	#[tokio::test]
	async fn clearing_search_keeps_clicked_nodes() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_node("n1").await;
		ctl.apply_delta_from_search(&[hit("n1"), hit("n2")]).await;
		ctl.apply_delta_from_search(&[]).await;

		assert!(ctl.surface().node_lit("n1"));
		assert!(!ctl.surface().node_lit("n2"));
		assert!(ctl.ledger().searched.is_empty());
	}

	#[tokio::test]
	async fn unchanged_search_issues_no_fetch() {
		let store = MemoryStore::new(snapshot());
		let ctl = controller(store);
		ctl.apply_delta_from_search(&[hit("n1")]).await;
		let before = ctl.store.calls.borrow().len();
		ctl.apply_delta_from_search(&[hit("n1")]).await;
		assert_eq!(ctl.store.calls.borrow().len(), before);
	}

	#[tokio::test]
	async fn failed_node_fetch_still_applies_edges() {
		let mut store = MemoryStore::new(snapshot());
		store.broken.insert("/node/b".into());
		let ctl = controller(store);
		ctl.select_node("b").await;

		assert!(!ctl.surface().node_lit("b"));
		assert!(!ctl.ledger().clicked.is_node_highlighted("b"));
		assert!(ctl.surface().edge_lit("e1"));
	}

	#[tokio::test]
	async fn stop_search_selects_result_and_clears_matches() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.apply_delta_from_search(&[hit("n1"), hit("n2")]).await;
		ctl.stop_search_with_result(&hit("n2")).await;

		assert!(ctl.ledger().searched.is_empty());
		assert!(ctl.ledger().clicked.is_node_highlighted("n2"));
		assert!(ctl.surface().node_lit("n2"));
		assert!(!ctl.surface().node_lit("n1"));
	}

	#[tokio::test]
	async fn unselect_all_restores_every_element() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.select_edge("e1").await;
		ctl.apply_delta_from_search(&[hit("n3")]).await;
		ctl.unselect_all();

		assert!(ctl.ledger().clicked.is_empty());
		assert!(ctl.ledger().searched.is_empty());
		for id in ["a", "b", "n3"] {
			assert!(!ctl.surface().node_lit(id));
		}
		assert!(!ctl.surface().edge_lit("e1"));
	}

	#[tokio::test]
	async fn tooltip_toggles_and_caches() {
		let mut store = MemoryStore::new(snapshot());
		store
			.tooltips
			.insert("a".into(), "<em>Alpha</em><script>x()</script>".into());
		let ctl = controller(store);

		ctl.show_tooltip("a").await;
		assert_eq!(ctl.shown_tooltips(), vec![("a".to_string(), "<em>Alpha</em>".to_string())]);
		ctl.show_tooltip("a").await;
		assert!(ctl.shown_tooltips().is_empty());
		ctl.show_tooltip("a").await;
		assert_eq!(ctl.shown_tooltips().len(), 1);

		let fetches = ctl
			.store
			.calls
			.borrow()
			.iter()
			.filter(|c| c.as_str() == "/tooltip/a")
			.count();
		assert_eq!(fetches, 1);
	}

	#[tokio::test]
	async fn missing_tooltip_stays_hidden() {
		let ctl = controller(MemoryStore::new(snapshot()));
		ctl.show_tooltip("zzz").await;
		assert!(ctl.shown_tooltips().is_empty());
	}
}
