use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use web_sys::KeyboardEvent;

use super::GraphController;
use super::force_graph::{ElementKind, SearchIndexEntry};
use crate::search::{Debouncer, NavKey, NavOutcome, ResultCursor, SearchIndex, SearchMatch};

type SharedDebouncer = Rc<RefCell<Debouncer<String>>>;
type SharedTimer = Rc<RefCell<Option<TimeoutHandle>>>;

/// Drop the query waiting on the debounce window so it never fires.
fn discard_pending(debouncer: &SharedDebouncer, timer: &SharedTimer) {
	debouncer.borrow_mut().cancel();
	if let Some(pending) = timer.borrow_mut().take() {
		pending.clear();
	}
}

/// A reset is a change of the counter after the first run; the initial
/// value only primes the effect.
fn reset_requested(seen: Option<u64>, current: u64) -> bool {
	seen.is_some_and(|seen| seen != current)
}

/// Fuzzy search input with a keyboard-navigable result list.
///
/// Typing is debounced; each settled query moves the search highlight on the
/// graph. Choosing a result clears the search highlight and selects it.
/// Bumping `resets` empties the box without touching the highlight.
#[component]
pub fn SearchBox(
	controller: Rc<GraphController>,
	index: Rc<SearchIndex>,
	#[prop(default = 250)] debounce_ms: u32,
	#[prop(default = 20)] max_results: usize,
	#[prop(optional)] resets: Option<RwSignal<u64>>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let results = RwSignal::new(Vec::<SearchMatch>::new());
	let focus = RwSignal::new(None::<usize>);
	let chosen = RwSignal::new(None::<SearchIndexEntry>);

	let debouncer: SharedDebouncer = Rc::new(RefCell::new(Debouncer::default()));
	let timer: SharedTimer = Rc::new(RefCell::new(None));
	let cursor: Rc<RefCell<ResultCursor>> = Rc::new(RefCell::new(ResultCursor::default()));

	let (deb_input, timer_input, cursor_input, ctl_input) = (
		debouncer.clone(),
		timer.clone(),
		cursor.clone(),
		controller.clone(),
	);
	let on_input = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		query.set(value.clone());
		let ticket = deb_input.borrow_mut().push(value);

		if let Some(pending) = timer_input.borrow_mut().take() {
			pending.clear();
		}

		let (deb, cursor, ctl, index) = (
			deb_input.clone(),
			cursor_input.clone(),
			ctl_input.clone(),
			index.clone(),
		);
		let handle = set_timeout_with_handle(
			move || {
				let Some(settled) = deb.borrow_mut().fire(ticket) else {
					return;
				};
				let found = index.search(&settled);
				debug!("search {settled:?}: {} matches", found.len());
				let entries: Vec<SearchIndexEntry> = found.iter().map(|m| m.entry.clone()).collect();
				results.set(found.into_iter().take(max_results).collect());
				cursor.borrow_mut().reset();
				focus.set(None);
				spawn_local(async move { ctl.apply_delta_from_search(&entries).await });
			},
			Duration::from_millis(debounce_ms.into()),
		);
		*timer_input.borrow_mut() = handle.ok();
	};

	let (deb_key, timer_key, cursor_key) = (debouncer.clone(), timer.clone(), cursor.clone());
	let on_keydown = move |ev: KeyboardEvent| {
		let Some(key) = NavKey::from_key(&ev.key()) else {
			return;
		};
		let len = results.with(Vec::len);
		match cursor_key.borrow_mut().handle(key, len) {
			NavOutcome::Focus(i) => {
				ev.prevent_default();
				focus.set(Some(i));
			}
			NavOutcome::Choose(i) => {
				ev.prevent_default();
				chosen.set(results.with(|r| r.get(i).map(|m| m.entry.clone())));
			}
			NavOutcome::Dismiss => {
				ev.prevent_default();
				discard_pending(&deb_key, &timer_key);
				query.set(String::new());
				results.set(Vec::new());
				focus.set(None);
			}
			NavOutcome::Ignore => {}
		}
	};

	if let Some(resets) = resets {
		let (deb_reset, timer_reset, cursor_reset) = (debouncer.clone(), timer.clone(), cursor.clone());
		Effect::new(move |seen: Option<u64>| {
			let current = resets.get();
			if reset_requested(seen, current) {
				discard_pending(&deb_reset, &timer_reset);
				cursor_reset.borrow_mut().reset();
				query.set(String::new());
				results.set(Vec::new());
				focus.set(None);
			}
			current
		});
	}

	Effect::new(move |_| {
		let Some(entry) = chosen.get() else {
			return;
		};
		discard_pending(&debouncer, &timer);
		cursor.borrow_mut().reset();
		query.set(String::new());
		results.set(Vec::new());
		focus.set(None);

		let ctl = controller.clone();
		spawn_local(async move { ctl.stop_search_with_result(&entry).await });
	});

	view! {
		<div class="search-box">
			<input
				id="searchInput"
				type="text"
				placeholder="Search nodes and edges"
				prop:value=move || query.get()
				on:input=on_input
				on:keydown=on_keydown
			/>
			<ul id="resultList" class="no-bullets">
				{move || {
					results
						.get()
						.into_iter()
						.enumerate()
						.map(|(i, m)| {
							let label = m.entry.label.clone();
							let kind = match m.entry.kind {
								ElementKind::Node => "node",
								ElementKind::Edge => "edge",
							};
							let id = m.entry.id.clone();
							let entry = m.entry;
							view! {
								<li
									data-id=id
									data-type=kind
									class:focused=move || focus.get() == Some(i)
									on:click=move |_| chosen.set(Some(entry.clone()))
								>
									{label}
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</div>
	}
}
