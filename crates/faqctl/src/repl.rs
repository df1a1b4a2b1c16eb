//! Interactive chat loop and single-turn answering.

use crate::assistant::Assistant;
use crate::output;
use anyhow::Result;
use faq_shared::conversation::Session;
use faq_shared::gate::TurnOutcome;
use faq_shared::model::ChatModel;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Quit,
    Clear,
    History,
    UnknownCommand(String),
    Question(String),
}

pub fn parse_input(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    if !line.starts_with('/') {
        return ReplInput::Question(line.to_string());
    }
    match line.to_lowercase().as_str() {
        "/quit" | "/exit" | "/q" => ReplInput::Quit,
        "/clear" => ReplInput::Clear,
        "/history" => ReplInput::History,
        _ => ReplInput::UnknownCommand(line.to_string()),
    }
}

/// Run one turn and write the user-visible text to `out`.
///
/// When validation is enforced the answer is buffered, since it may still
/// be replaced; otherwise chunks are written as they arrive.
pub fn answer_turn(
    assistant: &Assistant,
    session: &mut Session,
    model: &dyn ChatModel,
    question: &str,
    out: &mut dyn Write,
) -> io::Result<TurnOutcome> {
    let live = assistant.streams_live();
    let mut streamed = false;
    let mut write_error: Option<io::Error> = None;

    let outcome = {
        let mut on_chunk = |chunk: &str| {
            if !live || write_error.is_some() {
                return;
            }
            streamed = true;
            if let Err(e) = out.write_all(chunk.as_bytes()).and_then(|_| out.flush()) {
                write_error = Some(e);
            }
        };
        assistant.gate.run_turn(session, question, model, &mut on_chunk)
    };

    if let Some(e) = write_error {
        return Err(e);
    }

    match (&outcome, streamed) {
        (TurnOutcome::Answered { .. }, true) => writeln!(out)?,
        (_, true) => {
            writeln!(out)?;
            writeln!(out, "{}", outcome.text())?;
        }
        (_, false) => writeln!(out, "{}", outcome.text())?,
    }
    out.flush()?;

    output::print_outcome_note(&outcome);
    Ok(outcome)
}

/// Read questions from `input` until EOF or `/quit`
pub fn run_loop<R: BufRead, W: Write>(
    assistant: &Assistant,
    model: &dyn ChatModel,
    input: R,
    mut out: W,
) -> Result<Session> {
    let mut session = assistant.new_session();
    let mut lines = input.lines();

    loop {
        write!(out, "{} ", "you>".green().bold())?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                writeln!(out)?;
                break;
            }
        };

        match parse_input(&line) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::Clear => {
                session.clear();
                writeln!(out, "{}", "Conversation cleared.".dimmed())?;
            }
            ReplInput::History => {
                writeln!(out, "{}", output::format_history(session.history()))?;
            }
            ReplInput::UnknownCommand(cmd) => {
                writeln!(
                    out,
                    "{} {} (try /clear, /history, /quit)",
                    "Unknown command:".yellow(),
                    cmd
                )?;
            }
            ReplInput::Question(question) => {
                answer_turn(assistant, &mut session, model, &question, &mut out)?;
                writeln!(out)?;
            }
        }
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), ReplInput::Empty);
        assert_eq!(parse_input("/QUIT"), ReplInput::Quit);
        assert_eq!(parse_input("/exit"), ReplInput::Quit);
        assert_eq!(parse_input(" /clear "), ReplInput::Clear);
        assert_eq!(parse_input("/history"), ReplInput::History);
        assert_eq!(
            parse_input("/help"),
            ReplInput::UnknownCommand("/help".to_string())
        );
        assert_eq!(
            parse_input("  BIS fees? "),
            ReplInput::Question("BIS fees?".to_string())
        );
    }
}
