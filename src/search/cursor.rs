/// Keys the result list reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
	Down,
	Up,
	Enter,
	Escape,
}

impl NavKey {
	/// Maps a `KeyboardEvent.key` value.
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"ArrowDown" => Some(Self::Down),
			"ArrowUp" => Some(Self::Up),
			"Enter" => Some(Self::Enter),
			"Escape" => Some(Self::Escape),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
	Focus(usize),
	Choose(usize),
	/// Clear the query and the result list.
	Dismiss,
	Ignore,
}

/// Keyboard focus within the search result list. `None` means the text
/// input itself has focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultCursor {
	focus: Option<usize>,
}

impl ResultCursor {
	#[cfg(test)]
	pub fn focus(&self) -> Option<usize> {
		self.focus
	}

	pub fn reset(&mut self) {
		self.focus = None;
	}

	pub fn handle(&mut self, key: NavKey, len: usize) -> NavOutcome {
		match key {
			NavKey::Escape => {
				self.focus = None;
				NavOutcome::Dismiss
			}
			_ if len == 0 => {
				self.focus = None;
				NavOutcome::Ignore
			}
			NavKey::Down => {
				let next = self.focus.map_or(0, |i| (i + 1) % len);
				self.focus = Some(next);
				NavOutcome::Focus(next)
			}
			NavKey::Up => {
				let next = match self.focus {
					Some(i) if i > 0 && i < len => i - 1,
					_ => len - 1,
				};
				self.focus = Some(next);
				NavOutcome::Focus(next)
			}
			NavKey::Enter => match self.focus.take() {
				Some(i) if i < len => NavOutcome::Choose(i),
				_ => NavOutcome::Ignore,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn down_from_input_focuses_first_then_wraps() {
		let mut cursor = ResultCursor::default();
		assert_eq!(cursor.handle(NavKey::Down, 3), NavOutcome::Focus(0));
		assert_eq!(cursor.handle(NavKey::Down, 3), NavOutcome::Focus(1));
		assert_eq!(cursor.handle(NavKey::Down, 3), NavOutcome::Focus(2));
		assert_eq!(cursor.handle(NavKey::Down, 3), NavOutcome::Focus(0));
	}

	#[test]
	fn up_from_input_focuses_last_then_wraps() {
		let mut cursor = ResultCursor::default();
		assert_eq!(cursor.handle(NavKey::Up, 3), NavOutcome::Focus(2));
		assert_eq!(cursor.handle(NavKey::Up, 3), NavOutcome::Focus(1));
		assert_eq!(cursor.handle(NavKey::Up, 3), NavOutcome::Focus(0));
		assert_eq!(cursor.handle(NavKey::Up, 3), NavOutcome::Focus(2));
	}

	#[test]
	fn enter_chooses_focused_row_once() {
		let mut cursor = ResultCursor::default();
		cursor.handle(NavKey::Down, 2);
		cursor.handle(NavKey::Down, 2);
		assert_eq!(cursor.handle(NavKey::Enter, 2), NavOutcome::Choose(1));
		assert_eq!(cursor.focus(), None);
		assert_eq!(cursor.handle(NavKey::Enter, 2), NavOutcome::Ignore);
	}

	#[test]
	fn escape_dismisses_even_without_results() {
		let mut cursor = ResultCursor::default();
		assert_eq!(cursor.handle(NavKey::Escape, 0), NavOutcome::Dismiss);
		assert_eq!(cursor.handle(NavKey::Down, 0), NavOutcome::Ignore);
	}

	#[test]
	fn unknown_keys_are_not_navigation() {
		assert_eq!(NavKey::from_key("ArrowUp"), Some(NavKey::Up));
		assert_eq!(NavKey::from_key("a"), None);
	}
}
