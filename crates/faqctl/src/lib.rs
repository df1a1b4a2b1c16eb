//! faqctl - command-line front end for the FAQ assistant.

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod output;
pub mod repl;

pub use assistant::Assistant;
