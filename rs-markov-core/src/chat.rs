//! Chat sessions built on the chains.
//!
//! A surface (console, HTTP server, desktop window) owns one session and
//! only talks to it through [`Responder`]. Sessions are not shared: each
//! one holds its chain and its RNG.

use std::fs;
use std::path::Path;

use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{ChainConfig, Variant};
use crate::error::{GREETING_MESSAGE, MarkovError, NOT_READY_MESSAGE, RESET_MESSAGE};
use crate::io::load_snapshot;
use crate::model::bidirectional_chain::BidirectionalChain;
use crate::model::forward_chain::{ChainStats, ForwardChain};

/// Conversational interface shared by every session kind.
pub trait Responder {
	/// Answers one user message. Never fails.
	fn respond(&mut self, input: &str) -> String;

	/// Forgets what was learned and returns an acknowledgement.
	fn reset(&mut self) -> String;

	/// First message shown to the user.
	fn greeting(&self) -> &str {
		GREETING_MESSAGE
	}

	/// Learns from extra text without answering.
	fn train(&mut self, text: &str);

	/// Current statistics as JSON.
	fn stats_json(&self) -> serde_json::Value;

	/// Free generation, only supported by the forward chain.
	fn generate(&mut self, _max_tokens: usize, _seed: Option<&str>) -> Result<String, MarkovError> {
		Err(MarkovError::Unsupported("generate"))
	}
}

/// Chatbot answering with the forward chain.
///
/// The chain is trained up front; each message is used as the generation
/// seed so the reply continues it when possible.
pub struct ChatBot<R> {
	markov: ForwardChain,
	trained: bool,
	max_tokens: usize,
	rng: R,
}

impl<R: Rng> ChatBot<R> {
	pub fn new(markov: ForwardChain, max_tokens: usize, rng: R) -> Self {
		let trained = !markov.is_empty();
		Self { markov, trained, max_tokens, rng }
	}

	pub fn chain(&self) -> &ForwardChain {
		&self.markov
	}

	pub fn is_trained(&self) -> bool {
		self.trained
	}

	/// Trains the chain and logs a summary.
	pub fn train_text(&mut self, text: &str) -> ChainStats {
		self.markov.train(text);
		self.trained = true;
		let stats = self.markov.stats();
		info!(
			"Chatbot trained: {} unique states, {} total transitions, {} start contexts",
			stats.unique_key_count, stats.total_transition_count, stats.start_context_count
		);
		stats
	}
}

impl<R: Rng> Responder for ChatBot<R> {
	fn respond(&mut self, input: &str) -> String {
		if !self.trained {
			return NOT_READY_MESSAGE.to_owned();
		}
		self.markov.generate(self.max_tokens, Some(input), &mut self.rng)
	}

	fn reset(&mut self) -> String {
		self.markov.reset();
		self.trained = false;
		RESET_MESSAGE.to_owned()
	}

	fn train(&mut self, text: &str) {
		self.train_text(text);
	}

	fn stats_json(&self) -> serde_json::Value {
		serde_json::to_value(self.markov.stats()).unwrap_or_default()
	}

	fn generate(&mut self, max_tokens: usize, seed: Option<&str>) -> Result<String, MarkovError> {
		self.markov.check_max_tokens(max_tokens)?;
		Ok(self.markov.generate(max_tokens, seed, &mut self.rng))
	}
}

/// Continuously learning session on the bidirectional chain.
///
/// Every message is learned before being answered.
pub struct LearningBot<R> {
	chain: BidirectionalChain,
	rng: R,
}

impl<R: Rng> LearningBot<R> {
	pub fn new(chain: BidirectionalChain, rng: R) -> Self {
		Self { chain, rng }
	}

	pub fn chain(&self) -> &BidirectionalChain {
		&self.chain
	}
}

impl<R: Rng> Responder for LearningBot<R> {
	fn respond(&mut self, input: &str) -> String {
		self.chain.respond(input, &mut self.rng)
	}

	fn reset(&mut self) -> String {
		self.chain.reset();
		RESET_MESSAGE.to_owned()
	}

	fn train(&mut self, text: &str) {
		for line in text.lines() {
			if let Err(e) = self.chain.train(line) {
				debug!("Line skipped: {e}");
			}
		}
		let stats = self.chain.stats();
		info!(
			"Learning bot trained: {} unique tokens, {} total transitions",
			stats.unique_key_count, stats.total_transition_count
		);
	}

	fn stats_json(&self) -> serde_json::Value {
		serde_json::to_value(self.chain.stats()).unwrap_or_default()
	}
}

/// Small Portuguese corpus used when no training file is given.
pub const SAMPLE_TEXT: &str = "\
Olá, como você está? Eu estou bem, obrigado por perguntar.
O clima hoje está ótimo para sair. Gosto muito de dias ensolarados.
Você gosta de programar? Programação é uma atividade muito interessante.
Rust é uma linguagem muito poderosa e versátil.
Cadeias de Markov são úteis para gerar texto aleatório mas coerente.
Machine learning envolve muitos conceitos matemáticos interessantes.
A inteligência artificial está mudando o mundo rapidamente.
É importante estudar e aprender coisas novas todos os dias.
Livros são fontes excelentes de conhecimento e entretenimento.
Música pode influenciar nosso humor de maneira positiva.
Exercícios físicos são importantes para a saúde do corpo e da mente.
Viajar permite conhecer novas culturas e pessoas interessantes.
A natureza é bela e merece ser preservada por todos nós.
Tecnologia facilita nossa comunicação com pessoas distantes.
Amizade é um dos valores mais importantes na vida.
Família é a base de apoio que todos precisam.
Educação transforma vidas e abre portas para o futuro.
Criatividade é essencial para resolver problemas complexos.
Colaboração torna projetos maiores possíveis de serem realizados.
Persistência é a chave para alcançar objetivos difíceis.
";

/// Builds the session described by `config`.
///
/// - `chain`: pre-built forward chain, ignored by the bidirectional variant
/// - `text`: extra training text; the bidirectional variant learns it one
///   line per utterance
pub fn session(
	config: &ChainConfig,
	corpus: Option<ForwardChain>,
	text: Option<&str>,
) -> Result<Box<dyn Responder + Send>, MarkovError> {
	let rng: StdRng = config.rng();
	let mut bot: Box<dyn Responder + Send> = match config.variant {
		Variant::Forward => {
			let chain = match corpus {
				Some(chain) => chain,
				None => ForwardChain::new(config.order)?,
			};
			Box::new(ChatBot::new(chain, config.max_tokens, rng))
		}
		Variant::Bidirectional => Box::new(LearningBot::new(BidirectionalChain::new(config.max_rounds), rng)),
	};
	if let Some(text) = text {
		bot.train(text);
	}
	Ok(bot)
}

/// Opens a session from files.
///
/// The forward variant prefers `snapshot`, then `corpus` (one document per
/// line, with a cached binary next to it), then `SAMPLE_TEXT`. The
/// bidirectional variant learns `corpus` when given and starts empty
/// otherwise.
pub fn open_session<P: AsRef<Path>>(
	config: &ChainConfig,
	corpus: Option<P>,
	snapshot: Option<P>,
) -> Result<Box<dyn Responder + Send>, MarkovError> {
	match config.variant {
		Variant::Forward => match (snapshot, corpus) {
			(Some(path), _) => {
				let chain = ForwardChain::from_snapshot(load_snapshot(path)?)?;
				session(config, Some(chain), None)
			}
			(None, Some(path)) => {
				let chain = ForwardChain::from_corpus_file(config.order, path)?;
				session(config, Some(chain), None)
			}
			(None, None) => session(config, None, Some(SAMPLE_TEXT)),
		},
		Variant::Bidirectional => {
			let text = corpus.map(fs::read_to_string).transpose()?;
			session(config, None, text.as_deref())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	#[test]
	fn untrained_chatbot_asks_for_training() {
		let mut bot = ChatBot::new(ForwardChain::default(), 30, StdRng::seed_from_u64(1));
		assert_eq!(bot.respond("olá"), NOT_READY_MESSAGE);
		bot.train_text("olá como você está? eu estou bem.");
		assert!(bot.is_trained());
		assert_ne!(bot.respond("olá como"), NOT_READY_MESSAGE);
	}

	#[test]
	fn chatbot_reply_continues_message() {
		let mut bot = ChatBot::new(ForwardChain::new(1).unwrap(), 6, StdRng::seed_from_u64(3));
		bot.train_text("O gato subiu no telhado. O gato miou.");
		let reply = bot.respond("o gato");
		assert!(reply.starts_with("O gato subiu") || reply.starts_with("O gato miou."));
	}

	#[test]
	fn reset_acknowledges() {
		let mut bot = LearningBot::new(BidirectionalChain::default(), StdRng::seed_from_u64(0));
		bot.respond("bom dia");
		assert_eq!(Responder::reset(&mut bot), RESET_MESSAGE);
		assert!(bot.chain().is_empty());
		assert_eq!(bot.greeting(), GREETING_MESSAGE);
	}

	#[test]
	fn factory_builds_requested_variant() {
		let config = ChainConfig { variant: Variant::Bidirectional, seed: Some(1), ..ChainConfig::default() };
		let mut bot = session(&config, None, Some("bom dia\nboa noite")).unwrap();
		assert_eq!(bot.stats_json()["totalTransitionCount"], 6);
		assert!(matches!(bot.generate(10, None), Err(MarkovError::Unsupported(_))));
		assert!(!bot.respond("bom").is_empty());

		let forward = ChainConfig { seed: Some(1), ..ChainConfig::default() };
		let mut bot = session(&forward, None, None).unwrap();
		assert_eq!(bot.respond("oi"), NOT_READY_MESSAGE);
		assert_eq!(bot.stats_json()["order"], 2);
	}

	#[test]
	fn generate_checks_length() {
		let config = ChainConfig { seed: Some(2), ..ChainConfig::default() };
		let mut bot = open_session::<&Path>(&config, None, None).unwrap();
		assert!(matches!(bot.generate(2, None), Err(MarkovError::InvalidMaxTokens { max_tokens: 2, order: 2 })));
		let text = bot.generate(12, Some("cadeias de markov")).unwrap();
		assert!(text.starts_with("Cadeias de markov"));
		assert!(text.split(' ').count() <= 12);
	}
}
