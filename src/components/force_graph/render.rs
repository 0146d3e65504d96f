use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::surface::StyleBook;

const BACKGROUND: &str = "#111";
const NODE_TEXT_COLOR: &str = "#ccc";
const NODE_BORDER_COLOR: &str = "white";
const ARROW_SCALE: f64 = 0.5;
/// Below this zoom level edge labels are skipped.
const EDGE_LABEL_MIN_ZOOM: f64 = 0.8;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	state.styles.with(|book| {
		draw_edges(state, book, ctx);
		draw_nodes(state, book, ctx);
	});
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, book: &StyleBook, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let positions = state.positions();
	let mut radii = HashMap::new();
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		radii.insert(node.index(), book.node(&info.id).unwrap_or(&info.base).size / 2.0);
	});

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let style = book.edge(&edge.id).unwrap_or(&edge.base);
		let target_radius = radii.get(&edge.target).copied().unwrap_or(0.0);
		let source_radius = radii.get(&edge.source).copied().unwrap_or(0.0);
		let arrow_size = (style.width * 4.0 * ARROW_SCALE).max(3.0);

		ctx.set_global_alpha(style.opacity);
		ctx.set_stroke_style_str(&style.line_color);
		ctx.set_fill_style_str(&style.line_color);
		ctx.set_line_width(style.width);

		// Highlighted edges flow from source to target.
		if style.highlighted {
			let (dash, gap) = (8.0 / k, 4.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * source_radius, y1 + uy * source_radius);
		ctx.line_to(
			x2 - ux * (target_radius + arrow_size),
			y2 - uy * (target_radius + arrow_size),
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !edge.label.is_empty() && k >= EDGE_LABEL_MIN_ZOOM {
			let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			ctx.set_global_alpha(1.0);
			ctx.set_font("6px helvetica");
			ctx.set_text_align("center");
			ctx.set_fill_style_str(&style.text_color);
			let _ = ctx.fill_text(&edge.label, mx, my - 2.0);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, book: &StyleBook, ctx: &CanvasRenderingContext2d) {
	// Two passes so highlighted nodes sit on top.
	for highlighted_pass in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let style = book.node(&info.id).unwrap_or(&info.base);
			if style.highlighted != highlighted_pass {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let radius = style.size / 2.0;

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&style.fill);
			ctx.fill();

			if style.border_width > 0.0 {
				ctx.set_stroke_style_str(NODE_BORDER_COLOR);
				ctx.set_line_width(style.border_width);
				ctx.stroke();
			}

			if !info.label.is_empty() {
				ctx.set_fill_style_str(NODE_TEXT_COLOR);
				ctx.set_font("8px helvetica");
				ctx.set_text_align("center");
				let _ = ctx.fill_text(&info.label, x, y + 3.0);
			}
		});
	}
}
