/// Ordered set of element ids with idempotent insert/remove.
///
/// Highlight sets stay in the tens of elements, so a linear scan over a
/// `Vec` is all the lookup structure needed and keeps insertion order for
/// centroid and rendering passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSet {
	ids: Vec<String>,
}

impl IdSet {
	/// Returns `true` when `id` was not present before.
	pub fn insert(&mut self, id: &str) -> bool {
		if self.contains(id) {
			return false;
		}
		self.ids.push(id.to_owned());
		true
	}

	/// Returns `true` when `id` was present before.
	pub fn remove(&mut self, id: &str) -> bool {
		match self.ids.iter().position(|held| held == id) {
			Some(idx) => {
				self.ids.remove(idx);
				true
			}
			None => false,
		}
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.iter().any(|held| held == id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.ids.iter().map(String::as_str)
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn clear(&mut self) {
		self.ids.clear();
	}
}

/// Highlighted node ids and edge ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
	nodes: IdSet,
	edges: IdSet,
}

impl HighlightSet {
	pub fn add_node(&mut self, id: &str) {
		self.nodes.insert(id);
	}

	pub fn remove_node(&mut self, id: &str) {
		self.nodes.remove(id);
	}

	pub fn is_node_highlighted(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	pub fn add_edge(&mut self, id: &str) {
		self.edges.insert(id);
	}

	pub fn remove_edge(&mut self, id: &str) {
		self.edges.remove(id);
	}

	pub fn is_edge_highlighted(&self, id: &str) -> bool {
		self.edges.contains(id)
	}

	pub fn nodes(&self) -> &IdSet {
		&self.nodes
	}

	pub fn edges(&self) -> &IdSet {
		&self.edges
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn adding_twice_equals_adding_once() {
		let mut once = HighlightSet::default();
		once.add_node("n1");
		let mut twice = HighlightSet::default();
		twice.add_node("n1");
		twice.add_node("n1");
		assert_eq!(once, twice);
		assert_eq!(twice.nodes().iter().count(), 1);
	}

	#[test]
	fn removing_twice_equals_removing_once() {
		let mut set = HighlightSet::default();
		set.add_edge("e1");
		set.add_edge("e2");
		set.remove_edge("e1");
		let after_once = set.clone();
		set.remove_edge("e1");
		assert_eq!(set, after_once);
		assert!(set.is_edge_highlighted("e2"));
		assert!(!set.is_edge_highlighted("e1"));
	}

	#[test]
	fn removing_absent_id_is_noop() {
		let mut set = HighlightSet::default();
		set.remove_node("ghost");
		assert!(set.is_empty());
	}

	#[test]
	fn node_and_edge_ids_do_not_collide() {
		let mut set = HighlightSet::default();
		set.add_node("x");
		assert!(set.is_node_highlighted("x"));
		assert!(!set.is_edge_highlighted("x"));
	}

	#[test]
	fn id_set_keeps_insertion_order() {
		let mut ids = IdSet::default();
		assert!(ids.insert("b"));
		assert!(ids.insert("a"));
		assert!(!ids.insert("b"));
		assert_eq!(ids.iter().collect::<Vec<_>>(), vec!["b", "a"]);
	}
}
