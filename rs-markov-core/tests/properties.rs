use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::model::token::ContextKey;
use rs_markov_core::model::tokenizer::normalize_words;
use rs_markov_core::{BidirectionalChain, ChainStats, ForwardChain};

/// Sentences over a tiny vocabulary so contexts repeat.
fn text_strategy() -> impl Strategy<Value = String> {
	prop::collection::vec(
		prop::sample::select(vec!["o", "gato", "cão", "subiu", "miou.", "latiu!", "sim?", "no", "telhado"]),
		0..40,
	)
	.prop_map(|words| words.join(" "))
}

proptest! {
	#[test]
	fn every_training_context_is_covered(text in text_strategy(), order in 1usize..4) {
		let mut chain = ForwardChain::new(order).unwrap();
		chain.train(&text);
		let words = normalize_words(&text);
		if words.len() > order {
			for window in words.windows(order + 1) {
				let key = ContextKey::from_slice(&window[..order]);
				let successors = chain.successors(&key);
				prop_assert!(successors.is_some_and(|s| s.contains(&window[order])));
			}
		} else {
			prop_assert!(chain.is_empty());
		}
	}

	#[test]
	fn generation_is_bounded(text in text_strategy(), order in 1usize..4, extra in 1usize..30, seed in any::<u64>()) {
		let mut chain = ForwardChain::new(order).unwrap();
		chain.train(&text);
		let max_tokens = order + extra;
		let mut rng = StdRng::seed_from_u64(seed);
		match chain.try_generate(max_tokens, None, &mut rng) {
			Ok(words) => prop_assert!(words.len() <= max_tokens),
			Err(_) => prop_assert!(chain.is_empty()),
		}
	}

	#[test]
	fn snapshot_keeps_statistics(text in text_strategy(), order in 1usize..4) {
		let mut chain = ForwardChain::new(order).unwrap();
		chain.train(&text);
		let json = chain.snapshot().to_json().unwrap();
		let restored = ForwardChain::from_snapshot(
			rs_markov_core::model::snapshot::Snapshot::from_json(&json).unwrap()
		).unwrap();
		prop_assert_eq!(restored.stats(), chain.stats());
	}

	#[test]
	fn retraining_doubles_transitions(text in text_strategy(), order in 1usize..3) {
		let mut chain = ForwardChain::new(order).unwrap();
		chain.train(&text);
		let once = chain.stats();
		chain.train(&text);
		let twice = chain.stats();
		prop_assert_eq!(twice.total_transition_count, once.total_transition_count * 2);
		prop_assert_eq!(twice.unique_key_count, once.unique_key_count);
		prop_assert_eq!(twice.start_context_count, once.start_context_count);
	}

	#[test]
	fn reset_zeroes_counts(text in text_strategy(), order in 1usize..4) {
		let mut chain = ForwardChain::new(order).unwrap();
		chain.train(&text);
		chain.reset();
		prop_assert_eq!(chain.stats(), ChainStats { order, ..ChainStats::default() });
	}

	#[test]
	fn forward_and_reverse_mirror(lines in prop::collection::vec(text_strategy(), 1..5)) {
		let mut chain = BidirectionalChain::default();
		for line in &lines {
			let _ = chain.train(line);
		}
		for (token, state) in chain.forward().iter() {
			for next in state.successors() {
				let back = chain.reverse().get(next).map_or(0, |s| s.count(token));
				let forth = state.count(next);
				prop_assert_eq!(back, forth);
			}
		}
		prop_assert_eq!(chain.forward().total_transitions(), chain.reverse().total_transitions());
	}

	#[test]
	fn bidirectional_replies_terminate(lines in prop::collection::vec(text_strategy(), 1..5), seed in any::<u64>()) {
		let mut chain = BidirectionalChain::new(64);
		let mut rng = StdRng::seed_from_u64(seed);
		for line in &lines {
			let reply = chain.respond(line, &mut rng);
			prop_assert!(!reply.is_empty() || line.trim().is_empty());
		}
	}
}
