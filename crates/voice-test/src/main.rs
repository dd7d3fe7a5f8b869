//! Voice-Test: record or upload a voice sample, attach contact info, and
//! submit it to the review endpoint.

mod config;
mod console;
mod error;
mod popup;
mod popup_command;
mod submission;
mod submission_state;
#[cfg(test)]
mod tests;
mod view;

pub(crate) use {
    error::{AppError, Result as AppResult},
    popup::Popup,
    popup_command::PopupCommand,
    submission::{HttpSubmissionClient, SubmissionClient, SubmissionRequest},
    submission_state::SubmissionState,
    view::PopupView,
};

use crate::config::Config;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use voice_test_core::CaptureSupport;

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("voice_test=debug,voice_test_core=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // Endpoint problems are not fatal at startup; the submission client
    // re-checks and reports inline at submit time.
    if let Err(e) = config.validate_endpoint() {
        warn!("Submission endpoint not usable yet: {:?}", e);
    }

    let support = CaptureSupport::detect();

    let client = Arc::new(HttpSubmissionClient::new(
        config.submit.endpoint_url.clone(),
        config.timeout(),
    ));

    let (popup, command_tx, mut view_rx) = Popup::open(
        support,
        config.audio.selected_device.clone(),
        config.close_delay(),
        client,
    );

    // View printer: render the initial snapshot, then every change.
    tokio::spawn(async move {
        let snapshot = view_rx.borrow().clone();
        println!("{}", view::render(&snapshot));
        while view_rx.changed().await.is_ok() {
            let snapshot = view_rx.borrow().clone();
            println!("{}", view::render(&snapshot));
        }
    });

    // Stdin command reader. End of input closes the popup, same as the
    // cancel command.
    tokio::spawn(async move {
        println!("{}", console::USAGE);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match console::parse_line(&line) {
                        Some(command) => {
                            if command_tx.send(command).await.is_err() {
                                break;
                            }
                        }
                        None => println!("{}", console::USAGE),
                    }
                }
                Ok(None) => {
                    let _ = command_tx.send(PopupCommand::Close).await;
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    let _ = command_tx.send(PopupCommand::Close).await;
                    break;
                }
            }
        }
    });

    if let Err(e) = popup.run().await {
        error!(error = ?e, "Popup error");
        std::process::exit(1);
    }

    info!("Voice-test shut down successfully");
}
