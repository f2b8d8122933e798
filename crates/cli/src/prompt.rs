use financeapp_core::services::confirm::Confirmation;
use std::io::{BufRead, IsTerminal, Write};

/// Asks on the terminal. When stdin is not a terminal there is nobody to
/// ask, so the action proceeds.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirmation for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return true;
        }

        let mut stderr = std::io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return true;
        }

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim")
}
