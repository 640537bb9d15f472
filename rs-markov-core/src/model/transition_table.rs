use std::collections::BTreeMap;

use rand::Rng;
use rand::prelude::IteratorRandom;

use super::state::State;

/// Mapping from a context to the observed successors of that context.
///
/// Keys are kept in a `BTreeMap` so that iteration order, and thus any
/// random pick over the keys, only depends on the table content and the RNG.
///
/// # Invariants
/// - A stored state always holds at least one occurrence
/// - The table only grows until `clear` is called
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable<K, T> {
	states: BTreeMap<K, State<T>>,
}

impl<K, T> Default for TransitionTable<K, T> {
	fn default() -> Self {
		Self { states: BTreeMap::new() }
	}
}

impl<K: Ord, T> TransitionTable<K, T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one `key -> next` occurrence, creating the state if needed.
	pub fn add(&mut self, key: K, next: T) {
		self.states.entry(key).or_default().add_transition(next);
	}

	/// Returns the state of `key`, treating empty states as absent.
	pub fn get(&self, key: &K) -> Option<&State<T>> {
		self.states.get(key).filter(|state| !state.is_empty())
	}

	pub fn contains(&self, key: &K) -> bool {
		self.get(key).is_some()
	}

	/// Samples a successor of `key`.
	pub fn predict<R: Rng>(&self, key: &K, rng: &mut R) -> Option<&T> {
		self.get(key)?.predict(rng)
	}

	/// Picks a key uniformly at random.
	///
	/// Returns `None` if the table is empty.
	pub fn random_key<R: Rng>(&self, rng: &mut R) -> Option<&K> {
		self.states.keys().choose(rng)
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.states.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, &State<T>)> {
		self.states.iter()
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Sum of the occurrence list lengths over every key.
	pub fn total_transitions(&self) -> usize {
		self.states.values().map(State::len).sum()
	}

	pub fn clear(&mut self) {
		self.states.clear();
	}

	/// Inserts a whole state, appending to an existing one.
	///
	/// Empty states are dropped so the non-empty invariant holds.
	pub fn insert_state(&mut self, key: K, state: State<T>)
	where
		T: Clone,
	{
		if state.is_empty() {
			return;
		}
		match self.states.get_mut(&key) {
			Some(existing) => existing.merge(&state),
			None => {
				self.states.insert(key, state);
			}
		}
	}

	/// Merges another table into this one.
	///
	/// Matching states get the other occurrences appended; missing ones are
	/// cloned.
	pub fn merge(&mut self, other: &Self)
	where
		K: Clone,
		T: Clone,
	{
		for (key, state) in &other.states {
			self.insert_state(key.clone(), state.clone());
		}
	}
}
