use crate::components::force_graph::SearchIndexEntry;

/// Similarity given to a label that contains the query verbatim; the exact
/// remainder up to 1.0 goes to how much of the label the query covers.
const SUBSTRING_FLOOR: f64 = 0.9;

#[derive(Clone, Debug, PartialEq)]
pub struct SearchMatch {
	pub entry: SearchIndexEntry,
	/// Similarity in `0.0..=1.0`, higher is closer.
	pub score: f64,
}

/// Fuzzy label matcher over the `/autocomplete` entries.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
	entries: Vec<SearchIndexEntry>,
	folded: Vec<Vec<char>>,
	threshold: f64,
}

impl SearchIndex {
	/// `threshold` is the largest accepted distance (`1 - similarity`).
	pub fn new(entries: Vec<SearchIndexEntry>, threshold: f64) -> Self {
		let folded = entries
			.iter()
			.map(|entry| entry.label.to_lowercase().chars().collect())
			.collect();
		Self {
			entries,
			folded,
			threshold: threshold.clamp(0.0, 1.0),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Ranked matches for `query`, best first. A blank query matches nothing.
	pub fn search(&self, query: &str) -> Vec<SearchMatch> {
		let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
		if needle.is_empty() {
			return Vec::new();
		}

		let mut matches: Vec<SearchMatch> = self
			.entries
			.iter()
			.zip(&self.folded)
			.filter_map(|(entry, label)| {
				let score = similarity(&needle, label);
				(1.0 - score <= self.threshold).then(|| SearchMatch {
					entry: entry.clone(),
					score,
				})
			})
			.collect();

		matches.sort_by(|a, b| {
			b.score
				.total_cmp(&a.score)
				.then_with(|| a.entry.label.len().cmp(&b.entry.label.len()))
				.then_with(|| a.entry.label.cmp(&b.entry.label))
		});
		matches
	}
}

fn similarity(needle: &[char], label: &[char]) -> f64 {
	if label.is_empty() {
		return 0.0;
	}
	if label.windows(needle.len()).any(|window| window == needle) {
		let coverage = needle.len() as f64 / label.len() as f64;
		return SUBSTRING_FLOOR + (1.0 - SUBSTRING_FLOOR) * coverage;
	}

	let whole = ratio(needle, label);
	if label.len() <= needle.len() {
		return whole;
	}
	label
		.windows(needle.len())
		.map(|window| ratio(needle, window))
		.fold(whole, f64::max)
}

fn ratio(a: &[char], b: &[char]) -> f64 {
	rapidfuzz::fuzz::ratio(a.iter().copied(), b.iter().copied())
}
