//! Weight to on-screen size mapping.

use crate::config::ViewerConfig;

/// Node diameter for `weight`, clamped into the configured node range.
pub fn node_size(weight: f64, config: &ViewerConfig) -> f64 {
	clamp_weight(weight, config.min_node_weight, config.max_node_weight)
}

/// Edge line width for `weight`, clamped into the configured edge range.
pub fn edge_width(weight: f64, config: &ViewerConfig) -> f64 {
	clamp_weight(weight, config.min_edge_weight, config.max_edge_weight)
}

fn clamp_weight(weight: f64, min: f64, max: f64) -> f64 {
	let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
	if weight.is_finite() {
		weight.clamp(lo, hi)
	} else {
		lo
	}
}
