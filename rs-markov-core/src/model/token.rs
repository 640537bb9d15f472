use std::fmt;

/// Token of the bidirectional chain.
///
/// `Boundary` marks "no more text in this direction". It is a variant of
/// its own so it can never be confused with a word of the input.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
	Boundary,
	Word(String),
}

impl Token {
	pub fn word(text: &str) -> Self {
		Self::Word(text.to_owned())
	}

	pub fn is_boundary(&self) -> bool {
		matches!(self, Self::Boundary)
	}

	/// Surface text, `None` for the boundary.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Boundary => None,
			Self::Word(w) => Some(w),
		}
	}

	/// Character length of the surface form, 0 for the boundary.
	pub fn char_len(&self) -> usize {
		self.as_str().map_or(0, |w| w.chars().count())
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Boundary => f.write_str("∅"),
			Self::Word(w) => f.write_str(w),
		}
	}
}

/// The `order` consecutive tokens identifying a forward chain entry.
///
/// Compared and hashed structurally, so tokens containing spaces cannot
/// collide the way a joined string key would.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextKey(Vec<String>);

impl ContextKey {
	pub fn new(tokens: Vec<String>) -> Self {
		Self(tokens)
	}

	pub fn from_slice(tokens: &[String]) -> Self {
		Self(tokens.to_vec())
	}

	/// Parses the space-joined form used by snapshots.
	pub fn parse(joined: &str) -> Self {
		Self(joined.split(' ').map(str::to_owned).collect())
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Slides the window: drops the oldest token and appends `next`.
	pub fn shift(&mut self, next: String) {
		if !self.0.is_empty() {
			self.0.remove(0);
		}
		self.0.push(next);
	}

	/// Space-joined form.
	pub fn joined(&self) -> String {
		self.0.join(" ")
	}
}

impl fmt::Display for ContextKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.joined())
	}
}
