//! The voice-test popup controller.
//!
//! Every state transition runs through [`Popup::dispatch`], fed by one
//! mpsc channel: user commands from the front end, plus completions
//! reported back by spawned work (submission outcome, delayed close).
//! The front end renders [`PopupView`] snapshots from a watch channel.

use crate::{
    AppError, AppResult, PopupCommand, PopupView, SubmissionClient, SubmissionRequest,
    SubmissionState,
    view::{RETRY_MESSAGE, SUCCESS_MESSAGE},
};

use std::{panic::Location, path::Path, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use voice_test_core::{
    ActiveAudio, AudioCapturer, CaptureSupport, ContactInfo, PreviewPlayer, RecordingSession,
    SessionState, UploadedFile,
};

/// Cadence for observing background state: mid-stream device failures and
/// preview playback running out.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Modal state for one voice-test submission.
///
/// Owns the microphone session and the preview player; both are released
/// on stop/error and unconditionally on close, never held past the
/// session's terminal state.
pub struct Popup {
    pub(crate) session: RecordingSession,
    pub(crate) active_audio: Option<ActiveAudio>,
    pub(crate) contact: ContactInfo,
    pub(crate) submission: SubmissionState,
    pub(crate) player: Option<PreviewPlayer>,
    pub(crate) support: CaptureSupport,
    pub(crate) selected_device: Option<String>,
    pub(crate) close_delay: Duration,
    pub(crate) client: Arc<dyn SubmissionClient>,
    pub(crate) command_tx: mpsc::Sender<PopupCommand>,
    pub(crate) command_rx: mpsc::Receiver<PopupCommand>,
    pub(crate) view_tx: watch::Sender<PopupView>,
    pub(crate) message: Option<String>,
    pub(crate) closed: bool,
}

impl Popup {
    /// Open a popup: probe results, device selection and close delay come
    /// from the caller. Returns the command sender for the front end and
    /// the view receiver it renders from.
    pub fn open(
        support: CaptureSupport,
        selected_device: Option<String>,
        close_delay: Duration,
        client: Arc<dyn SubmissionClient>,
    ) -> (Self, mpsc::Sender<PopupCommand>, watch::Receiver<PopupView>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (view_tx, view_rx) = watch::channel(PopupView::default());

        let mut popup = Self {
            session: RecordingSession::new(),
            active_audio: None,
            contact: ContactInfo::new(),
            submission: SubmissionState::Editing,
            player: None,
            support,
            selected_device,
            close_delay,
            client,
            command_tx: command_tx.clone(),
            command_rx,
            view_tx,
            message: None,
            closed: false,
        };

        if let CaptureSupport::Unavailable { reason } = &popup.support {
            popup.message = Some(format!(
                "Recording unavailable ({}); use file upload instead",
                reason
            ));
        }
        popup.publish_view();

        (popup, command_tx, view_rx)
    }

    /// Run the popup event loop until close.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> AppResult<()> {
        info!("Voice-test popup opened");

        let mut poll = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    self.dispatch(command);
                    self.publish_view();
                    if self.closed {
                        break;
                    }
                }

                _ = poll.tick() => {
                    if self.poll_background() {
                        self.publish_view();
                    }
                }

                else => {
                    info!("Command channel closed, closing popup");
                    self.close();
                    self.publish_view();
                    break;
                }
            }
        }

        info!("Voice-test popup closed");

        Ok(())
    }

    /// Single entry point for every transition. Errors become inline
    /// popup messages; nothing escapes to the caller.
    pub(crate) fn dispatch(&mut self, command: PopupCommand) {
        // While a submission is in flight all inputs are disabled; only
        // its completion and close may pass.
        if self.submission == SubmissionState::Submitting
            && !matches!(
                command,
                PopupCommand::SubmissionFinished { .. } | PopupCommand::Close
            )
        {
            self.message = Some("Submission in progress, please wait".to_string());
            return;
        }

        self.message = None;

        if let Err(e) = self.handle_command(command) {
            warn!(error = ?e, "Popup command rejected");
            self.message = Some(e.to_string());
        }
    }

    fn handle_command(&mut self, command: PopupCommand) -> AppResult<()> {
        match command {
            PopupCommand::StartRecording => self.handle_start(),
            PopupCommand::PauseRecording => Ok(self.session.pause()?),
            PopupCommand::ResumeRecording => Ok(self.session.resume()?),
            PopupCommand::StopRecording => self.handle_stop(),
            PopupCommand::UploadFile { path } => self.handle_upload(&path),
            PopupCommand::RemoveAudio => self.handle_remove(),
            PopupCommand::SetContact { value } => self.handle_contact(&value),
            PopupCommand::TogglePlayback => self.handle_toggle_playback(),
            PopupCommand::Submit => self.handle_submit(),
            PopupCommand::SubmissionFinished { outcome } => {
                self.handle_submission_finished(outcome)
            }
            PopupCommand::Close => {
                self.close();
                Ok(())
            }
        }
    }

    /// Submit is enabled exactly when contact info and an active audio
    /// payload are both present.
    pub(crate) fn is_form_valid(&self) -> bool {
        self.contact.is_present() && self.active_audio.is_some()
    }

    #[track_caller]
    fn handle_start(&mut self) -> AppResult<()> {
        if let CaptureSupport::Unavailable { reason } = &self.support {
            self.message = Some(format!(
                "Recording unavailable ({}); use file upload instead",
                reason
            ));
            return Ok(());
        }

        let capturer = AudioCapturer::open(self.selected_device.as_deref())?;
        self.session.start(Box::new(capturer))?;

        Ok(())
    }

    fn handle_stop(&mut self) -> AppResult<()> {
        let audio = self.session.stop()?;

        // The freshly produced recording becomes the payload; switching
        // the active payload stops any in-progress preview.
        self.player = None;
        self.active_audio = Some(ActiveAudio::Recorded(audio));
        self.mark_editing();
        self.message = Some("Recording ready to submit".to_string());

        Ok(())
    }

    fn handle_upload(&mut self, path: &Path) -> AppResult<()> {
        // Rejected files change no state; the error surfaces inline.
        let file = UploadedFile::load(path)?;

        self.player = None;
        // The upload replaces a finalized recording as the payload.
        if self.session.state() == SessionState::Stopped {
            self.session.clear();
        }
        self.message = Some(format!("{} ready to submit", file.file_name));
        self.active_audio = Some(ActiveAudio::Uploaded(file));
        self.mark_editing();

        Ok(())
    }

    fn handle_remove(&mut self) -> AppResult<()> {
        self.player = None;
        self.active_audio = None;
        if self.session.state() == SessionState::Stopped {
            self.session.clear();
        }
        self.mark_editing();
        self.message = Some("Audio removed".to_string());

        Ok(())
    }

    fn handle_contact(&mut self, value: &str) -> AppResult<()> {
        self.contact.set(value);
        self.mark_editing();

        Ok(())
    }

    fn handle_toggle_playback(&mut self) -> AppResult<()> {
        // A drained player is equivalent to no player: the next toggle
        // starts preview from the beginning.
        if self.player.as_ref().is_some_and(|p| p.is_finished()) {
            self.player = None;
        }

        if let Some(player) = self.player.as_mut() {
            player.toggle()?;
            return Ok(());
        }

        let audio = self
            .active_audio
            .as_ref()
            .ok_or(AppError::Validation {
                missing: "audio payload",
                location: ErrorLocation::from(Location::caller()),
            })?;

        let decoded = audio.decode_for_preview()?;
        self.player = Some(PreviewPlayer::start(decoded)?);

        Ok(())
    }

    #[track_caller]
    fn handle_submit(&mut self) -> AppResult<()> {
        // Programmatic submission without preconditions names the missing
        // piece rather than failing generically.
        if !self.contact.is_present() {
            return Err(AppError::Validation {
                missing: "contact info",
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let audio = self.active_audio.as_ref().ok_or(AppError::Validation {
            missing: "audio payload",
            location: ErrorLocation::from(Location::caller()),
        })?;

        let request = SubmissionRequest::new(&self.contact, audio);
        self.submission = SubmissionState::Submitting;

        info!(
            file_name = %request.file_name,
            byte_len = request.bytes.len(),
            "Submitting voice test"
        );

        let client = Arc::clone(&self.client);
        let command_tx = self.command_tx.clone();

        tokio::spawn(async move {
            let outcome = client.submit(request).await.map_err(|e| e.to_string());
            // The popup may have closed mid-flight; a dead channel makes
            // this late completion a no-op.
            let _ = command_tx
                .send(PopupCommand::SubmissionFinished { outcome })
                .await;
        });

        Ok(())
    }

    fn handle_submission_finished(&mut self, outcome: Result<(), String>) -> AppResult<()> {
        if self.submission != SubmissionState::Submitting {
            debug!("Ignoring stale submission outcome");
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                self.submission = SubmissionState::Submitted;
                self.message = Some(SUCCESS_MESSAGE.to_string());
                info!("Submission accepted");

                let command_tx = self.command_tx.clone();
                let close_delay = self.close_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(close_delay).await;
                    let _ = command_tx.send(PopupCommand::Close).await;
                });
            }
            Err(reason) => {
                warn!(%reason, "Submission failed");
                // Captured audio and contact info are preserved so the
                // user can retry without redoing capture.
                self.submission = SubmissionState::Failed(reason.clone());
                self.message = Some(format!("{} ({})", RETRY_MESSAGE, reason));
            }
        }

        Ok(())
    }

    /// Close the popup: release the microphone and preview device, revoke
    /// the payload and reset every field.
    fn close(&mut self) {
        self.player = None;
        self.session.clear();
        self.active_audio = None;
        self.contact.clear();
        self.submission = SubmissionState::Editing;
        self.message = None;
        self.closed = true;
    }

    /// A failed submission becomes editable again on the next mutation.
    fn mark_editing(&mut self) {
        if matches!(self.submission, SubmissionState::Failed(_)) {
            self.submission = SubmissionState::Editing;
        }
    }

    /// Observe background state outside the command flow. Returns true
    /// when the view changed.
    pub(crate) fn poll_background(&mut self) -> bool {
        let mut changed = false;

        if let Some(reason) = self.session.poll_failure() {
            error!(%reason, "Capture device failed mid-session");
            // Abort per the error path: device released, chunks discarded.
            self.session.abort();
            self.message = Some(format!("Recording failed: {}", reason));
            changed = true;
        }

        if self.player.as_ref().is_some_and(|p| p.is_finished()) {
            // Playback ran out; the control resets to its play affordance.
            self.player = None;
            changed = true;
        }

        changed
    }

    pub(crate) fn publish_view(&self) {
        let view = self.view();
        if *self.view_tx.borrow() != view {
            let _ = self.view_tx.send(view);
        }
    }

    pub(crate) fn view(&self) -> PopupView {
        PopupView {
            recording_supported: self.support.is_available(),
            support_notice: match &self.support {
                CaptureSupport::Unavailable { reason } => Some(reason.clone()),
                CaptureSupport::Available => None,
            },
            session: self.session.state(),
            audio: self.active_audio.as_ref().map(ActiveAudio::label),
            email: self.contact.email().to_string(),
            phone: self.contact.phone().to_string(),
            playback: self.player.as_ref().map(PreviewPlayer::state),
            submission: self.submission.clone(),
            can_submit: self.is_form_valid(),
            message: self.message.clone(),
            closed: self.closed,
        }
    }
}
