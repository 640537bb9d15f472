use std::collections::VecDeque;

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

use crate::error::MarkovError;
use super::format::render_tokens;
use super::token::Token;
use super::tokenizer::split_tokens;
use super::transition_table::TransitionTable;

/// Default cap on expansion rounds of a single reply.
pub const DEFAULT_MAX_ROUNDS: usize = 256;

/// Summary of a bidirectional chain.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BidirectionalStats {
	pub unique_key_count: usize,
	pub reverse_key_count: usize,
	pub total_transition_count: usize,
}

/// Single-token Markov chain walked both ways from an anchor.
///
/// `forward` maps a token to the tokens seen right after it, `reverse` to
/// the tokens seen right before it. Every stream is bracketed by the
/// boundary token, so a walk in either direction ends on it.
///
/// # Invariants
/// - Each `a -> b` occurrence in `forward` has a `b -> a` occurrence in
///   `reverse`, and the other way around
/// - The boundary never sits inside a context: it only starts streams and
///   closes them
#[derive(Clone, Debug, PartialEq)]
pub struct BidirectionalChain {
	forward: TransitionTable<Token, Token>,
	reverse: TransitionTable<Token, Token>,
	max_rounds: usize,
}

impl Default for BidirectionalChain {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_ROUNDS)
	}
}

impl BidirectionalChain {
	/// Creates an empty chain whose walks stop after `max_rounds` rounds.
	pub fn new(max_rounds: usize) -> Self {
		Self {
			forward: TransitionTable::new(),
			reverse: TransitionTable::new(),
			max_rounds,
		}
	}

	pub fn max_rounds(&self) -> usize {
		self.max_rounds
	}

	pub fn forward(&self) -> &TransitionTable<Token, Token> {
		&self.forward
	}

	pub fn reverse(&self) -> &TransitionTable<Token, Token> {
		&self.reverse
	}

	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}

	/// Learns from one utterance and returns the number of words ingested.
	///
	/// # Errors
	/// Returns [`MarkovError::NoTokensFound`] if nothing could be tokenized.
	pub fn train(&mut self, input: &str) -> Result<usize, MarkovError> {
		let tokens = split_tokens(input)?;
		self.train_tokens(&tokens);
		Ok(tokens.len() - 1)
	}

	/// Learns from a token stream, closing it with the boundary.
	pub fn train_tokens(&mut self, tokens: &[Token]) {
		let nexts = tokens.iter().skip(1).chain(std::iter::once(&Token::Boundary));
		for (token, next) in tokens.iter().zip(nexts) {
			self.forward.add(token.clone(), next.clone());
			self.reverse.add(next.clone(), token.clone());
		}
	}

	/// Picks the anchor of a reply among the known tokens of `input`.
	///
	/// Keeps the tokens with the fewest recorded successors, then the
	/// longest of those. Ties keep the first one in input order. The
	/// boundary is never an anchor.
	pub fn main_token(&self, input: &str) -> Option<Token> {
		let tokens = split_tokens(input).ok()?;
		let candidates: Vec<(&Token, usize)> = tokens
			.iter()
			.filter(|token| !token.is_boundary())
			.filter_map(|token| self.forward.get(token).map(|state| (token, state.len())))
			.collect();

		let min_count = candidates.iter().map(|(_, count)| *count).min()?;
		candidates
			.into_iter()
			.filter(|(_, count)| *count == min_count)
			.fold(None, |best: Option<&Token>, (token, _)| match best {
				Some(b) if b.char_len() >= token.char_len() => Some(b),
				_ => Some(token),
			})
			.cloned()
	}

	/// Expands `anchor` both ways until each side reaches the boundary.
	///
	/// Each round prepends a predecessor and appends a successor, for the
	/// sides still open. The walk is forced to stop after `max_rounds`
	/// rounds; the reply is then returned as it stands.
	pub fn generate_from<R: Rng>(&self, anchor: &Token, rng: &mut R) -> Vec<Token> {
		let mut output = VecDeque::from([anchor.clone()]);
		let mut backward = anchor.clone();
		let mut forward = anchor.clone();

		let mut rounds = 0;
		while !(backward.is_boundary() && forward.is_boundary()) {
			if rounds == self.max_rounds {
				warn!("Reply expansion stopped after {rounds} rounds");
				break;
			}
			rounds += 1;

			if !backward.is_boundary() {
				// A token without recorded neighbour closes its side
				backward = self.reverse.predict(&backward, rng).cloned().unwrap_or(Token::Boundary);
				output.push_front(backward.clone());
			}
			if !forward.is_boundary() {
				forward = self.forward.predict(&forward, rng).cloned().unwrap_or(Token::Boundary);
				output.push_back(forward.clone());
			}
		}

		debug!("Reply expanded in {rounds} rounds");
		output.into()
	}

	/// Anchor selection and expansion without learning.
	///
	/// # Errors
	/// Returns [`MarkovError::NoAnchorFound`] if no input token is known.
	pub fn try_reply<R: Rng>(&self, input: &str, rng: &mut R) -> Result<String, MarkovError> {
		let anchor = self.main_token(input).ok_or(MarkovError::NoAnchorFound)?;
		Ok(render_tokens(&self.generate_from(&anchor, rng)))
	}

	/// Learns from `input`, then answers it.
	///
	/// Never fails: errors become a conversational message.
	pub fn respond<R: Rng>(&mut self, input: &str, rng: &mut R) -> String {
		if let Err(e) = self.train(input) {
			debug!("Nothing learned from {input:?}: {e}");
		}
		self.try_reply(input, rng).unwrap_or_else(|e| e.user_message())
	}

	/// Forgets everything learned so far.
	pub fn reset(&mut self) {
		self.forward.clear();
		self.reverse.clear();
	}

	pub fn stats(&self) -> BidirectionalStats {
		BidirectionalStats {
			unique_key_count: self.forward.len(),
			reverse_key_count: self.reverse.len(),
			total_transition_count: self.forward.total_transitions(),
		}
	}
}
