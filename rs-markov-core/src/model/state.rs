use rand::Rng;

use serde::{Deserialize, Serialize};


/// Observed successors of one context.
///
/// A `State` is a node of the Markov chain. Its outgoing edges are kept as a
/// plain list where every training occurrence appends one entry, so a
/// successor seen three times appears three times. Picking an entry
/// uniformly from the list is therefore a frequency-weighted choice.
///
/// ## Responsibilities:
/// - Accumulate successor occurrences during learning
/// - Sample the next token
/// - Merge with another state of the same context
///
/// ## Invariants
/// - Insertion order is preserved, so a seeded RNG replays the same walk
/// - A state stored in a table is never empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct State<T> {
	successors: Vec<T>,
}

impl<T> Default for State<T> {
	fn default() -> Self {
		Self { successors: Vec::new() }
	}
}

impl<T> State<T> {
	/// Creates an empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `next`.
	pub fn add_transition(&mut self, next: T) {
		self.successors.push(next);
	}

	/// Samples the next token uniformly from the occurrence list.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&T> {
		if self.successors.is_empty() {
			return None;
		}
		let index = rng.random_range(0..self.successors.len());
		self.successors.get(index)
	}

	/// Number of recorded occurrences (not distinct successors).
	pub fn len(&self) -> usize {
		self.successors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.successors.is_empty()
	}

	/// Occurrence list in training order.
	pub fn successors(&self) -> &[T] {
		&self.successors
	}

	/// Number of times `token` was observed.
	pub fn count(&self, token: &T) -> usize
	where
		T: PartialEq,
	{
		self.successors.iter().filter(|t| *t == token).count()
	}
}

impl<T: Clone> State<T> {
	/// Appends the occurrences of `other` after the ones already recorded.
	pub fn merge(&mut self, other: &Self) {
		self.successors.extend_from_slice(&other.successors);
	}
}

impl<T> From<Vec<T>> for State<T> {
	fn from(successors: Vec<T>) -> Self {
		Self { successors }
	}
}
