//! Chain models and the pieces they are made of.
//!
//! - Tokenization of both variants (`tokenizer`)
//! - Successor lists (`State`) and transition tables (`TransitionTable`)
//! - The forward n-gram chain (`ForwardChain`)
//! - The bidirectional unigram chain (`BidirectionalChain`)
//! - Output formatting and snapshots

/// Forward n-gram chain (`order >= 1`).
///
/// Handles text ingestion, sentence-start tracking, seeded random walks,
/// merging, statistics and snapshots.
pub mod forward_chain;

/// Bidirectional unigram chain with anchor selection and outward expansion.
pub mod bidirectional_chain;

/// Successor list of one context, frequency encoded by repetition.
pub mod state;

/// Ordered map from context to `State`.
pub mod transition_table;

/// Token and context key types.
pub mod token;

/// Text to token rules of both variants.
pub mod tokenizer;

/// Joining and capitalization of generated sequences.
pub mod format;

/// Serializable form of a forward chain.
pub mod snapshot;
