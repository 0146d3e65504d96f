//! Viewer configuration: the backend's `/conf` payload plus client-only knobs.

use serde::Deserialize;

/// Used when neither the page nor the build names an API base.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
	pub min_edge_weight: f64,
	pub max_edge_weight: f64,
	pub min_node_weight: f64,
	pub max_node_weight: f64,
	pub default_edge_color: String,
	pub highlighted_edge_color: String,
	pub default_edge_text_color: String,
	pub highlighted_edge_text_color: String,
	/// Quiescence window for the search box.
	pub debounce_ms: u32,
	pub max_results: usize,
	/// Largest accepted distance (`1 - similarity`) for a fuzzy match.
	pub search_threshold: f64,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			min_edge_weight: 1.0,
			max_edge_weight: 10.0,
			min_node_weight: 10.0,
			max_node_weight: 100.0,
			default_edge_color: "#666".into(),
			highlighted_edge_color: "#ddd".into(),
			default_edge_text_color: "#ddd".into(),
			highlighted_edge_text_color: "#fff".into(),
			debounce_ms: 250,
			max_results: 20,
			search_threshold: 0.4,
		}
	}
}

/// Resolve the API base: `<meta name="graph-api" content="..">`, then the
/// `GRAPH_API_URL` build variable, then [`DEFAULT_API_BASE`].
pub fn api_base() -> String {
	let from_page = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.query_selector(r#"meta[name="graph-api"]"#).ok().flatten())
		.and_then(|meta| meta.get_attribute("content"))
		.filter(|url| !url.trim().is_empty());

	resolve_api_base(from_page, option_env!("GRAPH_API_URL"))
}

fn resolve_api_base(from_page: Option<String>, from_build: Option<&str>) -> String {
	from_page
		.or_else(|| from_build.map(str::to_owned))
		.unwrap_or_else(|| DEFAULT_API_BASE.to_owned())
		.trim_end_matches('/')
		.to_owned()
}
