use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use rs_markov_core::chat::{open_session, Responder};
use rs_markov_core::{ChainConfig, Variant};

/// Words ending the conversation.
const EXIT_WORDS: [&str; 2] = ["sair", "exit"];

/// Interactive console chat on a Markov chain.
#[derive(Debug, Parser)]
#[command(name = "rs-markov-chat")]
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

    /// Training corpus, one document per line (built-in sample otherwise)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Forward chain snapshot (.json or binary)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Runs the prompt loop until an exit word or end of input.
///
/// Empty lines are skipped; `/reset` clears the session memory.
fn chat_loop<I: BufRead, O: Write>(bot: &mut dyn Responder, input: I, mut output: O) -> io::Result<()> {
    writeln!(output, "\n=== Chatbot Markov ===")?;
    writeln!(output, "Digite suas mensagens (ou \"sair\" para encerrar)\n")?;
    writeln!(output, "Bot: {}\n", bot.greeting())?;

    write!(output, "Você: ")?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;
        let message = line.trim();

        if EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
            break;
        }

        if !message.is_empty() {
            let reply = if message == "/reset" { bot.reset() } else { bot.respond(message) };
            writeln!(output, "Bot: {reply}\n")?;
        }

        write!(output, "Você: ")?;
        output.flush()?;
    }

    writeln!(output, "\nAté logo! 👋\n")?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    let config = ChainConfig {
        variant: args.variant,
        order: args.order,
        max_tokens: args.max_tokens,
        max_rounds: args.max_rounds,
        seed: args.seed,
    };
    let mut bot = open_session(&config, args.corpus.as_ref(), args.snapshot.as_ref())?;
    info!("Session ready: {}", bot.stats_json());

    chat_loop(bot.as_mut(), io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rs_markov_core::error::RESET_MESSAGE;

    fn run(variant: Variant, script: &str) -> String {
        let config = ChainConfig { variant, seed: Some(3), ..ChainConfig::default() };
        let mut bot = open_session::<&std::path::Path>(&config, None, None).unwrap();
        let mut output = Vec::new();
        chat_loop(bot.as_mut(), script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn exit_word_stops_the_loop() {
        let transcript = run(Variant::Bidirectional, "bom dia\nSAIR\nnunca lido\n");
        assert!(transcript.contains("Bot: bom dia\n"));
        assert!(!transcript.contains("nunca"));
        assert!(transcript.ends_with("Até logo! 👋\n\n"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let transcript = run(Variant::Forward, "\n   \n");
        assert_eq!(transcript.matches("Bot: ").count(), 1);
    }

    #[test]
    fn reset_command() {
        let transcript = run(Variant::Bidirectional, "oi\n/reset\n");
        assert!(transcript.contains(&format!("Bot: {RESET_MESSAGE}")));
    }
}
