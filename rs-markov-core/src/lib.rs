//! Markov chain text generation library.
//!
//! This crate provides two word-level chain variants and the chat sessions
//! built on them:
//! - A forward n-gram chain trained up front and walked from a seed phrase
//! - A bidirectional unigram chain that learns every message and expands a
//!   reply both ways around one of its words
//! - Snapshot / restore of the forward chain (JSON or compact binary)
//! - Chat sessions driven through a single `Responder` interface
//!
//! The crate performs no terminal or network I/O; surfaces call into it.

/// Chains, tokenization, formatting and snapshots.
pub mod model;

/// Chat sessions and their factory.
pub mod chat;

/// Session settings.
pub mod config;

/// Error taxonomy and fixed conversational messages.
pub mod error;

/// File helpers (corpus reading, snapshot files).
pub mod io;

pub use chat::{ChatBot, LearningBot, Responder};
pub use config::{ChainConfig, Variant};
pub use error::MarkovError;
pub use model::bidirectional_chain::BidirectionalChain;
pub use model::forward_chain::{ChainStats, ForwardChain};
