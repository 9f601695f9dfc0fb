use std::path::Path;

use buildsweep_core::{CleanError, ConfirmationSource, Decision};
use dialoguer::{theme::ColorfulTheme, Select};

const CHOICES: &[&str] = &[
    "delete",
    "skip",
    "delete all remaining without asking",
    "abort",
];

/// Terminal confirmation prompt offering the four per-item answers.
pub struct PromptConfirmation;

impl ConfirmationSource for PromptConfirmation {
    fn decide(&mut self, target: &Path) -> Result<Decision, CleanError> {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {}?", target.display()))
            .items(CHOICES)
            .default(0)
            .interact()
            .map_err(|err| CleanError::Other(format!("confirmation prompt failed: {err}")))?;

        Ok(match selection {
            0 => Decision::Confirm,
            1 => Decision::Skip,
            2 => Decision::ConfirmAll,
            _ => Decision::Abort,
        })
    }
}
