use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CLICK_SLOP_PX, ForceGraphState, Hit};
use super::types::GraphSnapshot;
use crate::components::GraphController;

const ZOOM_IN: f64 = 1.2;
const ZOOM_OUT: f64 = 0.8;

/// A shown tooltip, positioned in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
struct TooltipView {
	id: String,
	html: String,
	x: f64,
	y: f64,
}

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Visible tooltips, anchored to where their elements are drawn right now.
fn tooltip_views(controller: &GraphController, s: &ForceGraphState) -> Vec<TooltipView> {
	controller
		.shown_tooltips()
		.into_iter()
		.filter_map(|(id, html)| {
			let hit = if controller.graph().node(&id).is_some() {
				Hit::Node(id.clone())
			} else {
				Hit::Edge(id.clone())
			};
			// Whole pixels, so layout jitter does not rebuild the overlay.
			let (x, y) = s.anchor(&hit)?;
			Some(TooltipView {
				id,
				html,
				x: x.round(),
				y: y.round(),
			})
		})
		.collect()
}

/// Publish `views`, skipping the write when nothing moved.
fn publish_tooltips(tooltips: RwSignal<Vec<TooltipView>>, views: Vec<TooltipView>) {
	if tooltips.with_untracked(|current| *current != views) {
		tooltips.set(views);
	}
}

fn refresh_tooltips(
	controller: &GraphController,
	state: &SharedState,
	tooltips: RwSignal<Vec<TooltipView>>,
) {
	let views = match *state.borrow() {
		Some(ref s) => tooltip_views(controller, s),
		None => Vec::new(),
	};
	publish_tooltips(tooltips, views);
}

#[component]
pub fn ForceGraphCanvas(
	snapshot: Rc<GraphSnapshot>,
	controller: Rc<GraphController>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Bumped by the reset button so sibling widgets can clear themselves.
	#[prop(optional)]
	resets: Option<RwSignal<u64>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltips = RwSignal::new(Vec::<TooltipView>::new());
	let dismissed = RwSignal::new(None::<String>);
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let ctl_init = controller.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("Canvas has no 2d context");
				return;
			}
		};

		let mut graph_state = ForceGraphState::new(
			&snapshot,
			ctl_init.palette(),
			ctl_init.surface().clone(),
			w,
			h,
		);
		graph_state.fit();
		*state_init.borrow_mut() = Some(graph_state);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, ctl_anim) =
			(state_init.clone(), animate_init.clone(), ctl_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
				// Tooltips track their elements through layout, pan and zoom.
				if tooltips.with_untracked(|shown| !shown.is_empty()) {
					publish_tooltips(tooltips, tooltip_views(&ctl_anim, s));
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_dismiss, ctl_dismiss) = (state.clone(), controller.clone());
	Effect::new(move |_| {
		if let Some(id) = dismissed.get() {
			ctl_dismiss.hide_tooltip(&id);
			refresh_tooltips(&ctl_dismiss, &state_dismiss, tooltips);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press.origin = Some((x, y));
			s.press.moved = false;
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if let Some((ox, oy)) = s.press.origin {
				if ((x - ox).powi(2) + (y - oy).powi(2)).sqrt() > CLICK_SLOP_PX {
					s.press.moved = true;
				}
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let (state_mu, ctl_mu) = (state.clone(), controller.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.press.origin.is_some() && !s.press.moved {
				clicked = pointer(canvas_ref, &ev).and_then(|(x, y)| s.hit(x, y));
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.press.origin = None;
		}

		let ctl = ctl_mu.clone();
		match clicked {
			Some(Hit::Node(id)) => spawn_local(async move { ctl.toggle_node(&id).await }),
			Some(Hit::Edge(id)) => spawn_local(async move { ctl.toggle_edge(&id).await }),
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.press.origin = None;
		}
	};

	let (state_cm, ctl_cm) = (state.clone(), controller.clone());
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let hit = match (pointer(canvas_ref, &ev), &*state_cm.borrow()) {
			(Some((x, y)), Some(s)) => s.hit(x, y),
			_ => None,
		};
		let Some(Hit::Node(id) | Hit::Edge(id)) = hit else {
			return;
		};
		let (ctl, state) = (ctl_cm.clone(), state_cm.clone());
		spawn_local(async move {
			ctl.show_tooltip(&id).await;
			refresh_tooltips(&ctl, &state, tooltips);
		});
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let around = s.screen_to_graph(x, y);
			s.zoom_by(factor, around);
		}
	};

	// Zoom controls pivot on the centroid of the clicked nodes.
	let zoom = {
		let (state, controller) = (state.clone(), controller.clone());
		move |factor: f64| {
			if let Some(ref mut s) = *state.borrow_mut() {
				if let Some(center) = s.centroid(&controller.clicked_nodes()) {
					s.zoom_by(factor, center);
				}
			}
		}
	};
	let zoom_in = {
		let zoom = zoom.clone();
		move |_: MouseEvent| zoom(ZOOM_IN)
	};
	let zoom_out = move |_: MouseEvent| zoom(ZOOM_OUT);

	let state_fit = state.clone();
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit();
		}
		if let Some(resets) = resets {
			resets.update(|n| *n += 1);
		}
	};

	let (state_rc, ctl_rc) = (state.clone(), controller.clone());
	let on_recenter = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_rc.borrow_mut() {
			if let Some(center) = s.centroid(&ctl_rc.clicked_nodes()) {
				s.center_on(center);
			}
		}
	};

	let ctl_clear = controller.clone();
	let on_unselect_all = move |_: MouseEvent| ctl_clear.unselect_all();

	view! {
		<div class="graph-stage">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:contextmenu=on_contextmenu
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<button id="zoomInButton" on:click=zoom_in>"+"</button>
				<button id="zoomOutButton" on:click=zoom_out>"−"</button>
				<button id="zoomResetButton" on:click=on_reset>"Reset"</button>
				<button id="recenterButton" on:click=on_recenter>"Recenter"</button>
				<button id="unselectAllButton" on:click=on_unselect_all>"Clear"</button>
			</div>
			{move || {
				tooltips
					.get()
					.into_iter()
					.map(|tip| {
						let id = tip.id.clone();
						view! {
							<div
								class="ttip"
								style=format!("position: absolute; left: {}px; top: {}px;", tip.x, tip.y)
								on:click=move |_| dismissed.set(Some(id.clone()))
								inner_html=tip.html
							/>
						}
					})
					.collect_view()
			}}
		</div>
	}
}
