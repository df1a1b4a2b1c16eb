//! faqctl - Helwan Commerce FAQ assistant
//!
//! Gated chat over a single knowledge document.

use anyhow::Result;
use clap::Parser;
use faqctl::cli::{join_words, Cli, Commands};
use faqctl::commands;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "faqctl=info,faq_common=info,faq_shared=warn";

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        1 => EnvFilter::new("faqctl=debug,faq_common=debug,faq_shared=debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Chat => commands::chat(config),
        Commands::Ask { question } => commands::ask(config, &join_words(&question)),
        Commands::Classify { question, strict } => {
            commands::classify(config, &join_words(&question), strict)
        }
        Commands::Validate { response, knowledge } => {
            commands::validate(config, &response, knowledge.as_deref())
        }
        Commands::Rules => commands::rules(config),
        Commands::Config => commands::show_config(config),
    }
}
