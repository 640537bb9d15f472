use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::error::{MarkovError, UNTRAINED_MESSAGE};
use crate::io::{build_output_path, read_file};
use super::format::render_words;
use super::snapshot::Snapshot;
use super::state::State;
use super::token::ContextKey;
use super::tokenizer::{ends_sentence, is_sentence_start, normalize_words};
use super::transition_table::TransitionTable;

/// Default number of context words.
pub const DEFAULT_ORDER: usize = 2;

/// Summary of a forward chain, as reported after training.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChainStats {
	pub order: usize,
	pub unique_key_count: usize,
	pub start_context_count: usize,
	pub total_transition_count: usize,
}

/// Word-level Markov chain walking forward only.
///
/// Each context of `order` consecutive words maps to the list of words
/// observed right after it. Contexts that opened a sentence are also kept
/// apart to start generation on a sentence-initial context.
///
/// # Responsibilities
/// - Learn from raw text, merging into what was learned before
/// - Generate text from an optional seed phrase
/// - Snapshot / restore, merge, statistics
///
/// # Invariants
/// - `order >= 1`, fixed for the lifetime of the chain
/// - Every key holds exactly `order` words and at least one successor
/// - `start_contexts` has no duplicates and keeps first-seen order
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardChain {
	order: usize,
	chain: TransitionTable<ContextKey, String>,
	start_contexts: Vec<ContextKey>,
	start_index: HashSet<ContextKey>,
}

impl Default for ForwardChain {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			chain: TransitionTable::new(),
			start_contexts: Vec::new(),
			start_index: HashSet::new(),
		}
	}
}

impl ForwardChain {
	/// Creates an empty chain using `order` words of context.
	///
	/// # Errors
	/// Returns an error if `order` is 0 or `order + 1` overflows.
	pub fn new(order: usize) -> Result<Self, MarkovError> {
		if order == 0 || order.checked_add(1).is_none() {
			return Err(MarkovError::InvalidOrder(order));
		}
		Ok(Self { order, ..Self::default() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn is_empty(&self) -> bool {
		self.chain.is_empty()
	}

	/// Successors observed after `key`, in training order.
	pub fn successors(&self, key: &ContextKey) -> Option<&[String]> {
		self.chain.get(key).map(State::successors)
	}

	/// Sentence-initial contexts in first-seen order.
	pub fn start_contexts(&self) -> &[ContextKey] {
		&self.start_contexts
	}

	/// Learns from `text`, merging into the existing chain.
	///
	/// Text too short for the order is skipped with a warning and leaves
	/// the chain unchanged.
	pub fn train(&mut self, text: &str) {
		if let Err(e) = self.try_train(text) {
			warn!("Training skipped: {e}");
		}
	}

	/// Learns from `text`.
	///
	/// # Errors
	/// Returns [`MarkovError::InsufficientTrainingData`] if the text holds
	/// fewer than `order + 1` words. Nothing is recorded in that case.
	pub fn try_train(&mut self, text: &str) -> Result<(), MarkovError> {
		let words = normalize_words(text);
		if words.len() < self.order + 1 {
			return Err(MarkovError::InsufficientTrainingData {
				needed: self.order + 1,
				found: words.len(),
			});
		}

		for i in 0..words.len() - self.order {
			let key = ContextKey::from_slice(&words[i..i + self.order]);
			if is_sentence_start(&words, i) {
				self.add_start_context(key.clone());
			}
			self.chain.add(key, words[i + self.order].clone());
		}

		debug!("Trained on {} words", words.len());
		Ok(())
	}

	fn add_start_context(&mut self, key: ContextKey) {
		if self.start_index.insert(key.clone()) {
			self.start_contexts.push(key);
		}
	}

	/// Picks a sentence-initial context, or any context if none was seen.
	fn random_start_key<R: Rng>(&self, rng: &mut R) -> Option<ContextKey> {
		if self.start_contexts.is_empty() {
			return self.chain.random_key(rng).cloned();
		}
		let index = rng.random_range(0..self.start_contexts.len());
		self.start_contexts.get(index).cloned()
	}

	/// Resolves the seed into the initial output and context.
	///
	/// A seed whose last `order` words form a known context is kept whole;
	/// anything else falls back to a random start context.
	fn resolve_seed<R: Rng>(&self, seed: Option<&str>, rng: &mut R) -> Option<(Vec<String>, ContextKey)> {
		if let Some(seed) = seed {
			let words = normalize_words(seed);
			if words.len() >= self.order {
				let key = ContextKey::from_slice(&words[words.len() - self.order..]);
				if self.chain.contains(&key) {
					return Some((words, key));
				}
			}
			debug!("Seed {seed:?} is unknown, using a random start");
		}
		let key = self.random_start_key(rng)?;
		Some((key.tokens().to_vec(), key))
	}

	/// Checks a requested length against the order.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidMaxTokens`] if `max_tokens < order + 1`.
	pub fn check_max_tokens(&self, max_tokens: usize) -> Result<(), MarkovError> {
		if max_tokens < self.order + 1 {
			return Err(MarkovError::InvalidMaxTokens { max_tokens, order: self.order });
		}
		Ok(())
	}

	/// Random walk returning the raw words.
	///
	/// At most `max_tokens - order` words are appended after the seed. The
	/// walk also stops on a context without successor, or on a word closing
	/// a sentence once the output holds at least half of `max_tokens`.
	///
	/// # Errors
	/// Returns [`MarkovError::UntrainedModel`] if the chain is empty.
	pub fn try_generate<R: Rng>(
		&self,
		max_tokens: usize,
		seed: Option<&str>,
		rng: &mut R,
	) -> Result<Vec<String>, MarkovError> {
		if self.chain.is_empty() {
			return Err(MarkovError::UntrainedModel);
		}
		let (mut result, mut key) = self
			.resolve_seed(seed, rng)
			.ok_or(MarkovError::UntrainedModel)?;

		for _ in 0..max_tokens.saturating_sub(self.order) {
			let next = match self.chain.predict(&key, rng) {
				Some(next) => next.clone(),
				None => break,
			};

			result.push(next.clone());
			let sentence_end = ends_sentence(&next);
			key.shift(next);

			if sentence_end && result.len() * 2 >= max_tokens {
				break;
			}
		}

		Ok(result)
	}

	/// Generates text of at most `max_tokens` words.
	///
	/// Never fails: an empty chain yields a fixed message.
	pub fn generate<R: Rng>(&self, max_tokens: usize, seed: Option<&str>, rng: &mut R) -> String {
		match self.try_generate(max_tokens, seed, rng) {
			Ok(words) => render_words(&words),
			Err(MarkovError::UntrainedModel) => UNTRAINED_MESSAGE.to_owned(),
			Err(e) => e.user_message(),
		}
	}

	/// Clears the chain and the start contexts. The order is kept.
	pub fn reset(&mut self) {
		self.chain.clear();
		self.start_contexts.clear();
		self.start_index.clear();
	}

	pub fn stats(&self) -> ChainStats {
		ChainStats {
			order: self.order,
			unique_key_count: self.chain.len(),
			start_context_count: self.start_contexts.len(),
			total_transition_count: self.chain.total_transitions(),
		}
	}

	/// Merges another chain into this one.
	///
	/// Successor lists are appended, start contexts deduplicated.
	///
	/// # Errors
	/// Returns an error if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), MarkovError> {
		if self.order != other.order {
			return Err(MarkovError::OrderMismatch { left: self.order, right: other.order });
		}
		self.chain.merge(&other.chain);
		for key in &other.start_contexts {
			self.add_start_context(key.clone());
		}
		Ok(())
	}

	/// Captures the chain as a snapshot.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			order: self.order,
			chain: self
				.chain
				.iter()
				.map(|(key, state)| (key.joined(), state.successors().to_vec()))
				.collect(),
			start_words: self.start_contexts.iter().map(ContextKey::joined).collect(),
		}
	}

	/// Rebuilds a chain from a snapshot.
	///
	/// # Errors
	/// Returns an error if the order is 0 or a key does not hold exactly
	/// `order` words.
	pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, MarkovError> {
		let mut chain = Self::new(snapshot.order)?;
		let parse = |joined: &str| {
			let key = ContextKey::parse(joined);
			if key.len() == snapshot.order {
				Ok(key)
			} else {
				Err(MarkovError::Snapshot(format!(
					"key {joined:?} does not hold {} words",
					snapshot.order
				)))
			}
		};

		for (joined, successors) in &snapshot.chain {
			chain.chain.insert_state(parse(joined)?, State::from(successors.clone()));
		}
		for joined in &snapshot.start_words {
			chain.add_start_context(parse(joined)?);
		}
		Ok(chain)
	}

	/// Replaces the whole state, order included, with the snapshot content.
	pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), MarkovError> {
		*self = Self::from_snapshot(snapshot)?;
		Ok(())
	}

	/// Builds a chain from many independent documents.
	///
	/// Lines are split into chunks trained on worker threads. Partial chains
	/// are merged back in chunk order, so the result is the same as training
	/// on every line sequentially. Lines too short for the order are skipped.
	pub fn from_corpus_lines(order: usize, lines: &[String]) -> Result<Self, MarkovError> {
		let mut final_chain = Self::new(order)?;
		if lines.is_empty() {
			return Ok(final_chain);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		let mut handles = Vec::new();
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			handles.push(thread::spawn(move || {
				// Order already validated above
				let mut partial = Self { order, ..Self::default() };
				for line in chunk {
					if let Err(e) = partial.try_train(&line) {
						debug!("Corpus line skipped: {e}");
					}
				}
				// The receiver outlives every sender
				let _ = tx.send((index, partial));
			}));
		}
		drop(tx);

		let mut partials = Self::join_workers(handles, rx)?;
		partials.sort_by_key(|(index, _)| *index);
		for (_, partial) in &partials {
			final_chain.merge(partial)?;
		}

		let stats = final_chain.stats();
		info!(
			"Corpus trained: {} lines, {} states, {} transitions, {} start contexts",
			lines.len(),
			stats.unique_key_count,
			stats.total_transition_count,
			stats.start_context_count
		);
		Ok(final_chain)
	}

	/// Collects the partial chains of every worker.
	///
	/// # Errors
	/// Returns [`MarkovError::Corpus`] if a worker panicked, since its chunk
	/// would be missing from the result.
	fn join_workers(
		handles: Vec<JoinHandle<()>>,
		rx: Receiver<(usize, Self)>,
	) -> Result<Vec<(usize, Self)>, MarkovError> {
		let spawned = handles.len();
		let mut panicked = 0;
		for handle in handles {
			if handle.join().is_err() {
				panicked += 1;
			}
		}
		let partials: Vec<(usize, Self)> = rx.iter().collect();
		if panicked > 0 || partials.len() != spawned {
			return Err(MarkovError::Corpus(format!(
				"{} of {spawned} chunks trained, {panicked} workers panicked",
				partials.len()
			)));
		}
		Ok(partials)
	}

	/// Loads a chain for a corpus text file, one document per line.
	///
	/// A binary snapshot next to the corpus (`corpus.bin` for `corpus.txt`)
	/// is used when present and built with the same order. Otherwise the
	/// corpus is trained and the snapshot written for the next run.
	pub fn from_corpus_file<P: AsRef<Path>>(order: usize, filepath: P) -> Result<Self, MarkovError> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		if binary_data_path.exists() {
			let bytes = std::fs::read(&binary_data_path)?;
			let chain = Self::from_snapshot(Snapshot::from_bytes(&bytes)?)?;
			if chain.order == order {
				info!("Loaded cached chain from {}", binary_data_path.display());
				return Ok(chain);
			}
			info!("Cached chain has order {}, rebuilding", chain.order);
		}

		let lines = read_file(&filepath)?;
		let chain = Self::from_corpus_lines(order, &lines)?;
		std::fs::write(&binary_data_path, chain.snapshot().to_bytes()?)?;
		Ok(chain)
	}
}
