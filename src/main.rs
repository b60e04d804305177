use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use hanta::{
    config::{ConfigStore, FileConfigStore},
    hangul, scorer,
    session::{TypingMode, TypingSession},
    word_generator::{TextGenConfig, TextGenerator},
};
use log::info;
use serde_json::json;
use std::error::Error;

/// hangul syllable engine and typing scorer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Decompose and compose Hangul syllables, generate Korean practice texts, and score typing attempts against them."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// score an input against a target text
    Score {
        /// text to be typed
        #[clap(short = 't', long)]
        target: String,

        /// what the learner typed so far
        #[clap(short = 'i', long, default_value = "")]
        input: String,

        /// seconds since the first keystroke
        #[clap(short = 'e', long, default_value_t = 0.0)]
        elapsed: f64,
    },

    /// split every syllable of a text into initial/medial/final jamo
    Decompose { text: String },

    /// build a syllable from jamo, e.g. `compose ㅎ ㅏ ㄴ`
    Compose {
        initial: String,
        medial: String,
        #[clap(default_value = "", value_name = "FINAL")]
        final_: String,
    },

    /// print a practice text built from the configured language
    Text {
        #[clap(short = 'm', long, value_enum)]
        mode: Option<TypingMode>,

        /// number of words in word-list mode
        #[clap(short = 'w', long)]
        words: Option<usize>,

        /// number of sentences in sentence mode
        #[clap(short = 's', long)]
        sentences: Option<usize>,

        /// language file to pull words from
        #[clap(short = 'l', long)]
        language: Option<String>,

        /// remember the given options as the new defaults
        #[clap(long)]
        save: bool,
    },

    /// replay an input keystroke by keystroke through a session and print its result
    Replay {
        #[clap(short = 't', long)]
        target: String,

        #[clap(short = 'i', long)]
        input: String,

        /// total seconds the replay is spread over
        #[clap(short = 'e', long, default_value_t = 60.0)]
        elapsed: f64,

        #[clap(short = 'm', long, value_enum, default_value_t = TypingMode::Sentence)]
        mode: TypingMode,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Score {
            target,
            input,
            elapsed,
        } => {
            let stats = scorer::calculate(&target, &input, elapsed);
            let out = json!({
                "statistics": stats,
                "complete": scorer::is_complete(&stats, &target),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Decompose { text } => {
            let out: Vec<_> = text
                .chars()
                .map(|c| json!({ "char": c, "jamo": hangul::decompose(c) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Compose {
            initial,
            medial,
            final_,
        } => {
            println!("{}", hangul::compose(&initial, &medial, &final_));
        }
        Command::Text {
            mode,
            words,
            sentences,
            language,
            save,
        } => {
            let store = FileConfigStore::new();
            let mut cfg = store.load();
            cfg.mode = mode.unwrap_or(cfg.mode);
            cfg.number_of_words = words.unwrap_or(cfg.number_of_words);
            cfg.number_of_sentences = sentences.unwrap_or(cfg.number_of_sentences);
            cfg.language = language.unwrap_or(cfg.language);

            let text = TextGenerator::new(TextGenConfig::from(&cfg)).generate()?;
            if save {
                store.save(&cfg)?;
                info!("saved config to {}", store.path().display());
            }
            println!("{text}");
        }
        Command::Replay {
            target,
            input,
            elapsed,
            mode,
        } => {
            let mut session = TypingSession::new(target, mode);
            let t0 = Local::now();
            let typed: Vec<char> = input.chars().collect();
            let step_ms = elapsed.max(0.0) * 1000.0 / typed.len().max(1) as f64;

            for k in 1..=typed.len() {
                let prefix: String = typed[..k].iter().collect();
                let at = t0 + Duration::milliseconds((step_ms * k as f64) as i64);
                session.update_input_at(&prefix, at);
            }
            let end = t0 + Duration::milliseconds((elapsed.max(0.0) * 1000.0) as i64);
            let complete = session.is_complete_at(end);
            session.complete_at(end);

            let result = session
                .result()
                .ok_or("nothing was typed, no session to report")?;
            let out = json!({ "result": result, "complete": complete });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
