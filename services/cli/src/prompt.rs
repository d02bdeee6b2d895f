use dialoguer::Confirm;
use job_tracker::applications::ConfirmationPrompt;
use tracing::warn;

/// Asks on the terminal unless `--yes` was given.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub(crate) fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmationPrompt for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "confirmation prompt unavailable; treating as declined");
                false
            }
        }
    }
}
