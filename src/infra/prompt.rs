//! Operator confirmation on the terminal

use std::io::{self, BufRead, IsTerminal, Write};

use crate::core::provision::Confirm;

/// Asks a y/n question on stderr and reads the answer from stdin
///
/// Without a terminal there is nobody to ask, so the answer is no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        if !io::stdin().is_terminal() {
            tracing::warn!("Not a terminal, answering no to: {question}");
            return false;
        }

        eprint!("{question} y/n: ");
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(_) => is_yes(&input),
            Err(e) => {
                tracing::warn!("Failed to read answer: {e}");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
