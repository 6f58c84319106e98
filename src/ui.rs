// UI layer: the few interactive bits of the uploader. Credentials are asked
// for with `dialoguer` when the environment does not provide them, and an
// `indicatif` spinner shows note progress while the vault is walked.

use crate::api::Credentials;
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::time::Duration;

/// Install `env_logger` (default level `info`, `RUST_LOG` overrides) behind a
/// bridge that hides the progress bars while each record is written.
pub fn init_logging(multi: MultiProgress) -> Result<MultiProgress> {
    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let level = logger.filter();
    LogWrapper::new(multi.clone(), logger)
        .try_init()
        .context("Logger already initialised")?;
    log::set_max_level(level);
    Ok(multi)
}

/// Ask for the admin account used to authenticate against the API.
///
/// `Password` hides the input in the terminal.
pub fn prompt_credentials() -> Result<Credentials> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;
    Ok(Credentials { email, password })
}

/// Spinner handed to the run report. Ticks on its own so it keeps moving
/// while a slow request is in flight.
pub fn progress_spinner(multi: &MultiProgress) -> ProgressBar {
    let spinner = multi.add(ProgressBar::new_spinner());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Uploading...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn logging_goes_through_the_progress_bridge_once() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let multi = init_logging(multi).unwrap();

        let spinner = progress_spinner(&multi);
        log::warn!("logged while the spinner is ticking");
        spinner.finish_and_clear();

        let again = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        assert!(init_logging(again).is_err());
    }
}
