//! Lyric phonemizer command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use runtime::logging::{LogFormat, init_logging};
use std::path::PathBuf;
use tracing::info;

mod commands;

/// Syllable-based lyric phonemizer CLI
#[derive(Debug, Parser)]
#[command(name = "phonemizer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level; defaults to the configuration's
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format (json or text); defaults to the configuration's
    #[arg(long, global = true)]
    log_format: Option<LogFormatArg>,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Json,
    Text,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Text => LogFormat::Text,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look words up through the G2P chain
    G2p {
        /// Words to resolve
        #[arg(required = true)]
        words: Vec<String>,

        /// Language id (see `languages`)
        #[arg(long, default_value = "ru-cvc")]
        lang: String,

        /// Language record file, overriding `--lang`
        #[arg(long)]
        language_file: Option<PathBuf>,

        /// Voicebank alias list; its directory may hold a local dictionary
        #[arg(long)]
        voicebank: Option<PathBuf>,
    },

    /// Phonemize a phrase, one note per lyric
    Phonemize {
        /// Lyrics; `+`, `+~` and `+*` continue the previous note group
        #[arg(required = true)]
        lyrics: Vec<String>,

        /// Language id (see `languages`)
        #[arg(long, default_value = "ru-cvc")]
        lang: String,

        /// Language record file, overriding `--lang`
        #[arg(long)]
        language_file: Option<PathBuf>,

        /// Voicebank alias list (one alias per line)
        #[arg(long)]
        voicebank: Option<PathBuf>,

        /// Subbank as `LOW-HIGH:SUFFIX` or `COLOR=LOW-HIGH:SUFFIX`
        #[arg(long)]
        subbank: Vec<String>,

        /// MIDI tone of every note
        #[arg(long, default_value = "60")]
        tone: i32,

        /// Note length in ticks
        #[arg(long, default_value = "480")]
        duration: i32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List built-in languages
    Languages,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .unwrap_or_else(|| config.logging.level.clone());
    let format = match cli.log_format {
        Some(arg) => arg.into(),
        None => config.logging.format.parse().unwrap_or_default(),
    };
    init_logging(&level, format);
    runtime::metrics::register_metrics();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting phonemizer CLI");

    match cli.command {
        Commands::G2p {
            words,
            lang,
            language_file,
            voicebank,
        } => {
            let language = commands::load_language(&lang, language_file.as_deref())?;
            commands::g2p::run(&words, language, config, voicebank.as_deref())
                .context("G2P lookup failed")?;
        }
        Commands::Phonemize {
            lyrics,
            lang,
            language_file,
            voicebank,
            subbank,
            tone,
            duration,
            json,
        } => {
            let options = commands::phonemize::PhonemizeOptions {
                lyrics,
                language: commands::load_language(&lang, language_file.as_deref())?,
                voicebank,
                subbanks: subbank,
                tone,
                duration,
                json,
            };
            commands::phonemize::run(options, config).context("phonemization failed")?;
        }
        Commands::Languages => {
            commands::languages::run().context("listing languages failed")?;
        }
    }

    Ok(())
}
