use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::model::bidirectional_chain::DEFAULT_MAX_ROUNDS;
use crate::model::forward_chain::DEFAULT_ORDER;

/// Reply length of the forward chatbot.
pub const DEFAULT_MAX_TOKENS: usize = 30;

/// Which chain drives a chat session.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
	/// Trained up front, answers by walking forward from the message.
	#[default]
	Forward,
	/// Learns from every message and answers around one of its words.
	Bidirectional,
}

impl FromStr for Variant {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"forward" => Ok(Self::Forward),
			"bidirectional" => Ok(Self::Bidirectional),
			_ => Err(format!(
				"invalid variant: {s:?} (expected \"forward\" or \"bidirectional\")"
			)),
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Forward => f.write_str("forward"),
			Self::Bidirectional => f.write_str("bidirectional"),
		}
	}
}

/// Settings of a chat session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
	pub variant: Variant,
	/// Context words of the forward chain.
	pub order: usize,
	/// Reply length ceiling of the forward chain.
	pub max_tokens: usize,
	/// Expansion round cap of the bidirectional chain.
	pub max_rounds: usize,
	/// Fixed RNG seed, OS entropy when unset.
	pub seed: Option<u64>,
}

impl Default for ChainConfig {
	fn default() -> Self {
		Self {
			variant: Variant::default(),
			order: DEFAULT_ORDER,
			max_tokens: DEFAULT_MAX_TOKENS,
			max_rounds: DEFAULT_MAX_ROUNDS,
			seed: None,
		}
	}
}

impl ChainConfig {
	/// RNG of a session: seeded when `seed` is set.
	pub fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	#[test]
	fn variant_parsing() {
		assert_eq!("Forward".parse::<Variant>(), Ok(Variant::Forward));
		assert_eq!("bidirectional".parse::<Variant>(), Ok(Variant::Bidirectional));
		assert!("sideways".parse::<Variant>().is_err());
		assert_eq!(Variant::Bidirectional.to_string(), "bidirectional");
	}

	#[test]
	fn partial_json_uses_defaults() {
		let config: ChainConfig = serde_json::from_str(r#"{"order": 3, "variant": "bidirectional"}"#).unwrap();
		assert_eq!(config.order, 3);
		assert_eq!(config.variant, Variant::Bidirectional);
		assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
		assert_eq!(config.seed, None);
	}

	#[test]
	fn seeded_rng_is_reproducible() {
		let config = ChainConfig { seed: Some(9), ..ChainConfig::default() };
		let a: u64 = config.rng().random();
		let b: u64 = config.rng().random();
		assert_eq!(a, b);
	}
}
