use log::debug;
use serde::de::DeserializeOwned;

use super::error::FetchError;
use crate::components::force_graph::{
	EdgeRecord, GraphSnapshot, NodeRecord, SearchIndexEntry, Tooltip,
};
use crate::config::ViewerConfig;

/// Canonical node/edge lookups the selection controller depends on.
///
/// Futures are not `Send`: everything runs on the browser's event loop.
#[allow(async_fn_in_trait)]
pub trait GraphStore {
	async fn node(&self, id: &str) -> Result<NodeRecord, FetchError>;
	async fn edge(&self, id: &str) -> Result<EdgeRecord, FetchError>;
	/// Edges whose source or target is `id`.
	async fn node_edges(&self, id: &str) -> Result<Vec<EdgeRecord>, FetchError>;
	/// Source and target of edge `id`.
	async fn edge_nodes(&self, id: &str) -> Result<Vec<NodeRecord>, FetchError>;
	/// Unknown ids are silently left out of the answer.
	async fn nodes(&self, ids: &[String]) -> Result<Vec<NodeRecord>, FetchError>;
	async fn edges(&self, ids: &[String]) -> Result<Vec<EdgeRecord>, FetchError>;
	async fn tooltip(&self, id: &str) -> Result<Tooltip, FetchError>;
}

/// JSON-over-HTTP client for the graph API.
#[derive(Clone, Debug)]
pub struct HttpGraphStore {
	base: String,
	client: reqwest::Client,
}

impl HttpGraphStore {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			base: base.into().trim_end_matches('/').to_owned(),
			client: reqwest::Client::new(),
		}
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub async fn graph(&self) -> Result<GraphSnapshot, FetchError> {
		self.get("/graph").await
	}

	pub async fn autocomplete(&self) -> Result<Vec<SearchIndexEntry>, FetchError> {
		self.get("/autocomplete").await
	}

	pub async fn config(&self) -> Result<ViewerConfig, FetchError> {
		self.get("/conf").await
	}

	async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
		let url = format!("{}{}", self.base, path);
		debug!("GET {url}");

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|source| FetchError::Transport {
				url: url.clone(),
				source,
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				url,
				status: status.as_u16(),
			});
		}

		let body = response
			.text()
			.await
			.map_err(|source| FetchError::Transport {
				url: url.clone(),
				source,
			})?;
		serde_json::from_str(&body).map_err(|source| FetchError::Malformed { url, source })
	}
}

impl GraphStore for HttpGraphStore {
	async fn node(&self, id: &str) -> Result<NodeRecord, FetchError> {
		self.get(&format!("/node/{}", segment(id))).await
	}

	async fn edge(&self, id: &str) -> Result<EdgeRecord, FetchError> {
		self.get(&format!("/edge/{}", segment(id))).await
	}

	async fn node_edges(&self, id: &str) -> Result<Vec<EdgeRecord>, FetchError> {
		self.get(&format!("/node/{}/edges", segment(id))).await
	}

	async fn edge_nodes(&self, id: &str) -> Result<Vec<NodeRecord>, FetchError> {
		self.get(&format!("/edge/{}/nodes", segment(id))).await
	}

	async fn nodes(&self, ids: &[String]) -> Result<Vec<NodeRecord>, FetchError> {
		self.get(&format!("/nodes/{}", id_list(ids))).await
	}

	async fn edges(&self, ids: &[String]) -> Result<Vec<EdgeRecord>, FetchError> {
		self.get(&format!("/edges/{}", id_list(ids))).await
	}

	async fn tooltip(&self, id: &str) -> Result<Tooltip, FetchError> {
		self.get(&format!("/tooltip/{}", segment(id))).await
	}
}

fn segment(id: &str) -> String {
	urlencoding::encode(id).into_owned()
}

/// Comma-joined list for the batch endpoints; commas inside ids are encoded.
fn id_list(ids: &[String]) -> String {
	ids.iter().map(|id| segment(id)).collect::<Vec<_>>().join(",")
}
