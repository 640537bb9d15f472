use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// Serializable state of a [`ForwardChain`](super::forward_chain::ForwardChain).
///
/// Keys are stored space-joined. Forward chain words never contain
/// whitespace, so the joined form is unambiguous.
///
/// The JSON form is `{"order": 2, "chain": [["o gato", ["subiu", ...]], ...],
/// "startWords": ["o gato", ...]}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Snapshot {
	pub order: usize,
	pub chain: Vec<(String, Vec<String>)>,
	#[serde(rename = "startWords")]
	pub start_words: Vec<String>,
}

impl Snapshot {
	pub fn to_json(&self) -> Result<String, MarkovError> {
		Ok(serde_json::to_string(self)?)
	}

	pub fn from_json(json: &str) -> Result<Self, MarkovError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Compact binary form (postcard).
	pub fn to_bytes(&self) -> Result<Vec<u8>, MarkovError> {
		Ok(postcard::to_stdvec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarkovError> {
		Ok(postcard::from_bytes(bytes)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Snapshot {
		Snapshot {
			order: 1,
			chain: vec![
				("gato".to_owned(), vec!["subiu".to_owned(), "miou.".to_owned()]),
				("o".to_owned(), vec!["gato".to_owned(), "gato".to_owned()]),
			],
			start_words: vec!["o".to_owned()],
		}
	}

	#[test]
	fn json_layout() {
		let json = sample().to_json().unwrap();
		assert_eq!(
			json,
			r#"{"order":1,"chain":[["gato",["subiu","miou."]],["o",["gato","gato"]]],"startWords":["o"]}"#
		);
	}

	#[test]
	fn reads_exported_json() {
		let json = r#"{"order":1,"chain":[["gato",["subiu","miou."]],["o",["gato","gato"]]],"startWords":["o"]}"#;
		assert_eq!(Snapshot::from_json(json).unwrap(), sample());
	}

	#[test]
	fn binary_form() {
		let bytes = sample().to_bytes().unwrap();
		assert_eq!(Snapshot::from_bytes(&bytes).unwrap(), sample());
	}

	#[test]
	fn garbage_is_rejected() {
		assert!(matches!(Snapshot::from_json("{"), Err(MarkovError::Snapshot(_))));
		assert!(matches!(Snapshot::from_bytes(&[0xff, 0xff]), Err(MarkovError::Snapshot(_))));
	}
}
