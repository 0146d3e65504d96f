use std::collections::HashMap;

/// Display phase of one element's tooltip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipPhase {
	#[default]
	Hidden,
	/// Waiting on the first content fetch.
	Pending,
	Shown,
}

/// What the caller must do after a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipStep {
	Hide,
	Show,
	Fetch,
}

#[derive(Clone, Debug, Default)]
struct Entry {
	phase: TooltipPhase,
	content: Option<String>,
}

/// Tooltip state for every element that has been asked for one.
///
/// Content is cached after the first successful fetch and reused on later
/// toggles for the rest of the session.
#[derive(Clone, Debug, Default)]
pub struct TooltipBook {
	entries: HashMap<String, Entry>,
	/// Show order, most recent last.
	order: Vec<String>,
}

impl TooltipBook {
	pub fn toggle(&mut self, id: &str) -> TooltipStep {
		let entry = self.entries.entry(id.to_owned()).or_default();
		let step = match entry.phase {
			TooltipPhase::Shown | TooltipPhase::Pending => {
				entry.phase = TooltipPhase::Hidden;
				TooltipStep::Hide
			}
			TooltipPhase::Hidden if entry.content.is_some() => {
				entry.phase = TooltipPhase::Shown;
				TooltipStep::Show
			}
			TooltipPhase::Hidden => {
				entry.phase = TooltipPhase::Pending;
				TooltipStep::Fetch
			}
		};
		self.touch(id, step != TooltipStep::Hide);
		step
	}

	/// Cache fetched content; shows it unless the tooltip was toggled off
	/// while the fetch was in flight.
	pub fn loaded(&mut self, id: &str, content: String) {
		let entry = self.entries.entry(id.to_owned()).or_default();
		entry.content = Some(content);
		if entry.phase == TooltipPhase::Pending {
			entry.phase = TooltipPhase::Shown;
		}
	}

	pub fn failed(&mut self, id: &str) {
		if let Some(entry) = self.entries.get_mut(id) {
			if entry.phase == TooltipPhase::Pending {
				entry.phase = TooltipPhase::Hidden;
			}
		}
		self.touch(id, false);
	}

	pub fn hide(&mut self, id: &str) {
		if let Some(entry) = self.entries.get_mut(id) {
			entry.phase = TooltipPhase::Hidden;
		}
		self.touch(id, false);
	}

	#[cfg(test)]
	pub fn phase(&self, id: &str) -> TooltipPhase {
		self.entries.get(id).map(|e| e.phase).unwrap_or_default()
	}

	#[cfg(test)]
	pub fn content(&self, id: &str) -> Option<&str> {
		self.entries.get(id).and_then(|e| e.content.as_deref())
	}

	/// `(id, content)` of every shown tooltip, oldest first.
	pub fn shown(&self) -> impl Iterator<Item = (&str, &str)> {
		self.order.iter().filter_map(|id| {
			let entry = self.entries.get(id)?;
			match (entry.phase, entry.content.as_deref()) {
				(TooltipPhase::Shown, Some(content)) => Some((id.as_str(), content)),
				_ => None,
			}
		})
	}

	fn touch(&mut self, id: &str, visible: bool) {
		self.order.retain(|held| held != id);
		if visible {
			self.order.push(id.to_owned());
		}
	}
}

/// Tooltip descriptions are server-authored markup; strip anything active
/// before it reaches `inner_html`.
pub fn sanitize(markup: &str) -> String {
	ammonia::clean(markup)
}
