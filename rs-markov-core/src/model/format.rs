//! Surface formatting of generated token sequences.

use super::token::Token;

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Forward chain output: words joined by single spaces, first letter
/// capitalized.
pub fn render_words(words: &[String]) -> String {
	capitalize(&words.join(" "))
}

/// Bidirectional chain output: space-joined, case kept as tokenized.
/// Boundary markers are not rendered.
pub fn render_tokens(tokens: &[Token]) -> String {
	tokens
		.iter()
		.filter_map(Token::as_str)
		.collect::<Vec<_>>()
		.join(" ")
}
