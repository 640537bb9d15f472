use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;

use rs_markov_core::chat::{open_session, Responder as ChatResponder};
use rs_markov_core::{ChainConfig, MarkovError, Variant};

/// HTTP chat server backed by one Markov chain session.
#[derive(Debug, Parser)]
#[command(name = "rs-markov-server")]
struct Args {
	/// Chain variant: forward or bidirectional
	#[arg(long, default_value = "forward")]
	variant: Variant,

	/// Context words of the forward chain
	#[arg(long, default_value_t = 2)]
	order: usize,

	/// Reply length of the forward chain
	#[arg(long, default_value_t = 30)]
	max_tokens: usize,

	/// Expansion round cap of the bidirectional chain
	#[arg(long, default_value_t = 256)]
	max_rounds: usize,

	/// Training corpus, one document per line
	#[arg(long)]
	corpus: Option<PathBuf>,

	/// Forward chain snapshot (.json or binary)
	#[arg(long)]
	snapshot: Option<PathBuf>,

	/// Fixed RNG seed
	#[arg(long)]
	seed: Option<u64>,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info")]
	log_level: String,
}

impl Args {
	fn chain_config(&self) -> ChainConfig {
		ChainConfig {
			variant: self.variant,
			order: self.order,
			max_tokens: self.max_tokens,
			max_rounds: self.max_rounds,
			seed: self.seed,
		}
	}
}

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_tokens: Option<usize>,
	seed: Option<String>,
}

struct SharedData {
	bot: Box<dyn ChatResponder + Send>,
	max_tokens: usize,
}

/// HTTP POST endpoint `/v1/respond`
///
/// The request body is the user message, the response body the reply.
#[post("/v1/respond")]
async fn post_respond(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let message = body.trim();
	if message.is_empty() {
		return HttpResponse::BadRequest().body("Empty message");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.bot.respond(message))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Free generation from an optional seed. Only the forward chain supports it.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let max_tokens = query.max_tokens.unwrap_or(shared_data.max_tokens);
	let seed = query.seed.as_deref().filter(|s| !s.trim().is_empty());
	match shared_data.bot.generate(max_tokens, seed) {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e @ (MarkovError::Unsupported(_) | MarkovError::InvalidMaxTokens { .. })) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Learns from the request body and returns the statistics.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::BadRequest().body("Missing training text");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.bot.train(&body);
	HttpResponse::Ok().json(shared_data.bot.stats_json())
}

#[post("/v1/reset")]
async fn post_reset(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.bot.reset())
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.bot.stats_json())
}

#[get("/v1/greeting")]
async fn get_greeting(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.bot.greeting().to_owned())
}

/// Main entry point for the server.
///
/// Opens the chat session, wraps it in a `Mutex` so requests are served
/// one at a time, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let args = Args::parse();

	env_logger::Builder::from_default_env()
		.filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Info))
		.init();

	let config = args.chain_config();
	let bot = match open_session(&config, args.corpus.as_ref(), args.snapshot.as_ref()) {
		Ok(bot) => bot,
		Err(e) => {
			error!("Failed to open session: {e}");
			return Err(std::io::Error::other(e.to_string()));
		}
	};

	let shared_data = SharedData { bot, max_tokens: config.max_tokens };
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("Serving {} chain on {}:{}", config.variant, args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(post_respond)
			.service(get_generated)
			.service(put_train)
			.service(post_reset)
			.service(get_stats)
			.service(get_greeting)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
