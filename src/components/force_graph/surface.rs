use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::selection::{EdgeStyle, NodeStyle, RenderSurface};

/// Style overrides applied on top of each element's base style.
#[derive(Debug, Default)]
pub struct StyleBook {
	nodes: HashMap<String, NodeStyle>,
	edges: HashMap<String, EdgeStyle>,
}

impl StyleBook {
	pub fn node(&self, id: &str) -> Option<&NodeStyle> {
		self.nodes.get(id)
	}

	pub fn edge(&self, id: &str) -> Option<&EdgeStyle> {
		self.edges.get(id)
	}
}

/// The canvas side of [`RenderSurface`]: the selection controller writes
/// here and the animation loop reads it every frame.
#[derive(Clone, Debug, Default)]
pub struct SharedStyles(Rc<RefCell<StyleBook>>);

impl SharedStyles {
	pub fn with<T>(&self, f: impl FnOnce(&StyleBook) -> T) -> T {
		f(&self.0.borrow())
	}
}

impl RenderSurface for SharedStyles {
	fn style_node(&self, id: &str, style: NodeStyle) {
		self.0.borrow_mut().nodes.insert(id.to_owned(), style);
	}

	fn style_edge(&self, id: &str, style: EdgeStyle) {
		self.0.borrow_mut().edges.insert(id.to_owned(), style);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn latest_style_wins_per_element() {
		let styles = SharedStyles::default();
		let lit = NodeStyle {
			fill: "#fff".into(),
			border_width: 2.0,
			size: 23.0,
			highlighted: true,
		};
		let base = NodeStyle {
			fill: "#000".into(),
			border_width: 0.0,
			size: 20.0,
			highlighted: false,
		};
		styles.style_node("n1", lit);
		styles.clone().style_node("n1", base.clone());
		assert_eq!(styles.with(|book| book.node("n1").cloned()), Some(base));
		assert!(styles.with(|book| book.edge("n1").is_none()));
	}
}
