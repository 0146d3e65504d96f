use std::rc::Rc;

use futures_util::future::join;
use leptos::prelude::*;
use log::{info, warn};

use crate::api::HttpGraphStore;
use crate::components::force_graph::{ForceGraphCanvas, GraphSnapshot, SharedStyles};
use crate::components::{GraphController, SearchBox};
use crate::config::{ViewerConfig, api_base};
use crate::search::SearchIndex;
use crate::selection::{GraphIndex, Palette};

/// Startup failure shown by the error boundary.
#[derive(Clone, Debug, thiserror::Error)]
#[error("could not load the graph: {0}")]
struct LoadError(String);

/// Everything the page needs once the initial fetches settle.
#[derive(Clone)]
struct Viewer {
	snapshot: Rc<GraphSnapshot>,
	controller: Rc<GraphController>,
	index: Rc<SearchIndex>,
	config: ViewerConfig,
}

async fn load_viewer(base: String) -> Result<Viewer, LoadError> {
	let store = HttpGraphStore::new(base);

	let config = match store.config().await {
		Ok(config) => config,
		Err(err) => {
			warn!("{err}; using default viewer config");
			ViewerConfig::default()
		}
	};

	let (graph, entries) = join(store.graph(), store.autocomplete()).await;
	let snapshot = graph.map_err(|e| LoadError(e.to_string()))?;
	let entries = entries.map_err(|e| LoadError(e.to_string()))?;
	let index = SearchIndex::new(entries, config.search_threshold);
	info!(
		"loaded {} nodes, {} edges, {} search entries from {}",
		snapshot.nodes.len(),
		snapshot.edges.len(),
		index.len(),
		store.base()
	);
	if index.is_empty() {
		warn!("search index is empty; the search box will find nothing");
	}

	let graph = GraphIndex::from_snapshot(&snapshot);
	let controller = GraphController::new(
		store,
		SharedStyles::default(),
		Palette::new(config.clone()),
		graph,
	);

	Ok(Viewer {
		snapshot: Rc::new(snapshot),
		controller: Rc::new(controller),
		index: Rc::new(index),
		config,
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let viewer = LocalResource::new(|| load_viewer(api_base()));
	let resets = RwSignal::new(0u64);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Suspense fallback=|| view! { <p class="loading">"Loading graph..."</p> }>
				{move || {
					viewer
						.get()
						.map(|loaded| {
							loaded
								.map(|v| {
									view! {
										<div class="fullscreen-graph">
											<ForceGraphCanvas
												snapshot=v.snapshot
												controller=v.controller.clone()
												fullscreen=true
												resets=resets
											/>
											<div class="graph-overlay">
												<SearchBox
													controller=v.controller
													index=v.index
													debounce_ms=v.config.debounce_ms
													max_results=v.config.max_results
													resets=resets
												/>
											</div>
										</div>
									}
								})
						})
				}}
			</Suspense>
		</ErrorBoundary>
	}
}
