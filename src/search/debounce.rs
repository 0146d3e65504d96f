/// Handle for one scheduled fire; only the newest one is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single-slot, most-recent-wins debounce.
///
/// Each [`push`](Self::push) replaces the pending value and invalidates every
/// earlier ticket, so a burst of inputs inside one quiescence window yields
/// exactly one [`fire`](Self::fire) carrying the last value. The timer itself
/// lives with the caller.
#[derive(Debug)]
pub struct Debouncer<T> {
	generation: u64,
	pending: Option<T>,
}

impl<T> Default for Debouncer<T> {
	fn default() -> Self {
		Self {
			generation: 0,
			pending: None,
		}
	}
}

impl<T> Debouncer<T> {
	pub fn push(&mut self, value: T) -> Ticket {
		self.generation = self.generation.wrapping_add(1);
		self.pending = Some(value);
		Ticket(self.generation)
	}

	/// The pending value, if `ticket` is still the newest.
	pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
		if ticket.0 != self.generation {
			return None;
		}
		self.pending.take()
	}

	pub fn cancel(&mut self) {
		self.generation = self.generation.wrapping_add(1);
		self.pending = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn burst_fires_once_with_last_value() {
		let mut debouncer = Debouncer::default();
		let tickets: Vec<Ticket> = ["a", "ai", "air", "airc", "aircr"]
			.into_iter()
			.map(|q| debouncer.push(q.to_string()))
			.collect();

		let fired: Vec<String> = tickets.into_iter().filter_map(|t| debouncer.fire(t)).collect();
		assert_eq!(fired, vec!["aircr".to_string()]);
		assert_eq!(debouncer.fire(Ticket(5)), None);
	}

	#[test]
	fn ticket_fires_at_most_once() {
		let mut debouncer = Debouncer::default();
		let ticket = debouncer.push(1);
		assert_eq!(debouncer.fire(ticket), Some(1));
		assert_eq!(debouncer.fire(ticket), None);
	}

	#[test]
	fn cancel_drops_pending_value() {
		let mut debouncer = Debouncer::default();
		let ticket = debouncer.push("x");
		debouncer.cancel();
		assert_eq!(debouncer.fire(ticket), None);
	}

	#[test]
	fn dismissed_query_stays_dead_but_next_one_fires() {
		let mut debouncer = Debouncer::default();
		let stale = debouncer.push("air".to_string());
		debouncer.cancel();
		assert_eq!(debouncer.fire(stale), None);

		let fresh = debouncer.push("bridge".to_string());
		assert_eq!(debouncer.fire(stale), None);
		assert_eq!(debouncer.fire(fresh), Some("bridge".to_string()));
	}

	#[test]
	fn separate_windows_fire_separately() {
		let mut debouncer = Debouncer::default();
		let first = debouncer.push("a");
		assert_eq!(debouncer.fire(first), Some("a"));
		let second = debouncer.push("b");
		assert_eq!(debouncer.fire(second), Some("b"));
	}
}
