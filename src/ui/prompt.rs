//! Interactive prompts using dialoguer.
//!
//! If stdin is not a terminal, every y/N prompt behaves as if the user
//! answered N, surfacing as `EngineError::UserCancelled` upstream. Callers
//! never need to special-case closed stdin themselves.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::cell::Cell;
use std::io::IsTerminal;

thread_local! {
    // Lets in-process unit tests drive an accept-path without a real TTY.
    // Unset (the default) outside of tests.
    static FORCE_ANSWER: Cell<Option<bool>> = const { Cell::new(None) };
}

/// Ask a y/N question. Returns `Ok(false)` without prompting if stdin is not
/// a terminal.
pub fn confirm(message: &str) -> Result<bool> {
    if let Some(forced) = FORCE_ANSWER.with(|f| f.get()) {
        return Ok(forced);
    }

    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    let result = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()?;

    Ok(result)
}

/// Test-only override for `confirm`'s answer, bypassing the TTY check.
#[cfg(test)]
pub fn set_forced_answer(answer: Option<bool>) {
    FORCE_ANSWER.with(|f| f.set(answer));
}
