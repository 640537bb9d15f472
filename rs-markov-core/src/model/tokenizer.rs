//! Tokenization rules of both chain variants.
//!
//! - Forward chain: lower-cased whitespace split, punctuation stays attached
//!   to the word so sentence ends can be detected.
//! - Bidirectional chain: case-preserving pattern scan with a leading
//!   boundary token.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::MarkovError;
use super::token::Token;

/// Dash variants treated as whitespace by the forward tokenizer.
const DASHES: [char; 2] = ['—', '–'];

/// Alternation used by the bidirectional tokenizer.
///
/// Structured patterns come first: with leftmost-first matching a letter or
/// digit run would otherwise always win and they could never match.
const TOKEN_PATTERN: &str = concat!(
	r"R\$\d+,\d{2}",               // currency value: R$12,50
	r"|\d{3}\.\d{3}\.\d{3}-\d{2}", // document number: 123.456.789-09
	r"|\(\d{2}\)\s*\d{5}-\d{4}",   // phone: (11) 91234-5678
	r"|\p{L}+",
	r"|\d+",
	r"|[,!:;.?]+",
);

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	// Constant pattern, covered by the tests below
	Regex::new(TOKEN_PATTERN).expect("token pattern must compile")
});

/// Splits text into lower-cased words for the forward chain.
///
/// Dashes become whitespace, empty fragments are dropped.
pub fn normalize_words(text: &str) -> Vec<String> {
	text.to_lowercase()
		.replace(DASHES, " ")
		.split_whitespace()
		.map(str::to_owned)
		.collect()
}

/// Whether `word` closes a sentence (`.`, `!` or `?`).
pub fn ends_sentence(word: &str) -> bool {
	word.ends_with(['.', '!', '?'])
}

/// A word is sentence-initial if it is the first one or follows a word
/// closing a sentence.
pub fn is_sentence_start(words: &[String], index: usize) -> bool {
	match index {
		0 => true,
		i => words.get(i - 1).is_some_and(|prev| ends_sentence(prev)),
	}
}

/// Scans `input` into case-preserved tokens, prefixed by the boundary.
///
/// # Errors
/// Returns [`MarkovError::NoTokensFound`] if nothing matched.
pub fn split_tokens(input: &str) -> Result<Vec<Token>, MarkovError> {
	let mut tokens = vec![Token::Boundary];
	tokens.extend(TOKEN_REGEX.find_iter(input).map(|m| Token::word(m.as_str())));
	if tokens.len() == 1 {
		return Err(MarkovError::NoTokensFound);
	}
	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(tokens: &[Token]) -> Vec<&str> {
		tokens.iter().filter_map(Token::as_str).collect()
	}

	#[test]
	fn forward_normalization() {
		assert_eq!(
			normalize_words("  O Gato—subiu\tno  TELHADO. "),
			vec!["o", "gato", "subiu", "no", "telhado."]
		);
		assert_eq!(normalize_words("a – b"), vec!["a", "b"]);
		assert!(normalize_words(" \n ").is_empty());
	}

	#[test]
	fn sentence_boundaries() {
		let w = normalize_words("o gato miou. o cachorro! latiu? sim");
		assert!(is_sentence_start(&w, 0));
		assert!(!is_sentence_start(&w, 1));
		assert!(is_sentence_start(&w, 3));
		assert!(is_sentence_start(&w, 5));
		assert!(is_sentence_start(&w, 6));
		assert!(!is_sentence_start(&w, 4));
	}

	#[test]
	fn bidirectional_split_keeps_case_and_punctuation() {
		let tokens = split_tokens("Olá, Mundo! 42 vezes...").unwrap();
		assert_eq!(tokens[0], Token::Boundary);
		assert_eq!(words(&tokens), vec!["Olá", ",", "Mundo", "!", "42", "vezes", "..."]);
	}

	#[test]
	fn structured_patterns() {
		let tokens = split_tokens("custa R$12,50 cpf 123.456.789-09 tel (11) 91234-5678").unwrap();
		assert_eq!(
			words(&tokens),
			vec!["custa", "R$12,50", "cpf", "123.456.789-09", "tel", "(11) 91234-5678"]
		);
	}

	#[test]
	fn no_tokens_is_an_error() {
		assert!(matches!(split_tokens("   @#$ "), Err(MarkovError::NoTokensFound)));
		assert!(matches!(split_tokens(""), Err(MarkovError::NoTokensFound)));
	}
}
