//! Command-line definition.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "faqctl")]
#[command(about = "Helwan Commerce FAQ assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (overrides $FAQBOT_CONFIG and the default location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat session
    Chat,

    /// Answer a single question
    Ask {
        /// The question, words joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show whether a question would reach the model, and why
    Classify {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Reject questions no rule recognises
        #[arg(long)]
        strict: bool,
    },

    /// Check an answer against the knowledge document
    Validate {
        /// Answer text to check
        #[arg(long)]
        response: String,

        /// Knowledge file (default: the configured one)
        #[arg(long)]
        knowledge: Option<PathBuf>,
    },

    /// Print the effective rule tables as TOML
    Rules,

    /// Print the effective configuration as TOML
    Config,
}

/// Join positional words back into one question
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify_strict() {
        let cli = Cli::try_parse_from(["faqctl", "classify", "--strict", "BIS", "fees"]).unwrap();
        match cli.command {
            Commands::Classify { question, strict } => {
                assert!(strict);
                assert_eq!(join_words(&question), "BIS fees");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["faqctl", "chat", "-vv", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["faqctl", "ask"]).is_err());
    }
}
