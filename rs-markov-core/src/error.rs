//! Error taxonomy shared by both chain variants.
//!
//! Chat-facing entry points never surface these directly: they turn them
//! into one of the conversational messages below so that a surrounding
//! chat loop keeps running.

use std::io;

/// Message returned when generation is attempted on an empty chain.
pub const UNTRAINED_MESSAGE: &str = "Erro: O modelo não foi treinado ainda.";

/// Message returned by a chatbot that has never been trained.
pub const NOT_READY_MESSAGE: &str = "Desculpe, preciso ser treinado antes de conversar!";

/// Message returned when no input token is known to the bidirectional chain.
pub const NO_ANCHOR_MESSAGE: &str = "Erro ao buscar palavra principal.";

/// Acknowledgement returned after a memory reset.
pub const RESET_MESSAGE: &str = "Memória reiniciada.";

/// Opening line of a continuously learning session.
pub const GREETING_MESSAGE: &str =
	"Olá eu sou um robô e ainda estou aprendendo a falar. Quanto mais você fala comigo mais eu aprendo!";

#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
	#[error("the model has not been trained yet")]
	UntrainedModel,

	#[error("text too short to train the model: need {needed} tokens, found {found}")]
	InsufficientTrainingData { needed: usize, found: usize },

	#[error("no tokens found in input")]
	NoTokensFound,

	#[error("no known token found in input")]
	NoAnchorFound,

	#[error("order must be >= 1 and leave room for one successor, got {0}")]
	InvalidOrder(usize),

	#[error("max_tokens must be >= {} for order {order}, got {max_tokens}", .order + 1)]
	InvalidMaxTokens { max_tokens: usize, order: usize },

	#[error("order mismatch: {left} != {right}")]
	OrderMismatch { left: usize, right: usize },

	#[error("{0} is not supported by this chain")]
	Unsupported(&'static str),

	#[error("invalid snapshot: {0}")]
	Snapshot(String),

	#[error("corpus training failed: {0}")]
	Corpus(String),

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl From<serde_json::Error> for MarkovError {
	fn from(e: serde_json::Error) -> Self {
		Self::Snapshot(e.to_string())
	}
}

impl From<postcard::Error> for MarkovError {
	fn from(e: postcard::Error) -> Self {
		Self::Snapshot(e.to_string())
	}
}

impl MarkovError {
	/// Conversational rendering used by the chat surfaces.
	pub fn user_message(&self) -> String {
		match self {
			Self::UntrainedModel => UNTRAINED_MESSAGE.to_owned(),
			Self::NoAnchorFound | Self::NoTokensFound => NO_ANCHOR_MESSAGE.to_owned(),
			other => format!("Erro: {other}"),
		}
	}
}
