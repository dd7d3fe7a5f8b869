//! Snapshot of the popup shown to the user, published over a watch
//! channel so the front end only renders state the controller produced.

use crate::SubmissionState;

use voice_test_core::{PlaybackState, SessionState};

/// Confirmation shown when the server accepts a submission.
pub(crate) const SUCCESS_MESSAGE: &str = "Đã gửi thành công!";

/// Retry prompt shown when a submission fails.
pub(crate) const RETRY_MESSAGE: &str = "Gửi thất bại, vui lòng thử lại.";

/// Everything the front end needs to draw the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    /// Recording controls may be offered.
    pub recording_supported: bool,
    /// Why recording is unavailable, when it is.
    pub support_notice: Option<String>,
    /// Recording session state.
    pub session: SessionState,
    /// Label of the active audio payload, if any.
    pub audio: Option<String>,
    /// Email as routed by the contact field.
    pub email: String,
    /// Phone as routed by the contact field.
    pub phone: String,
    /// Preview playback state while a player is live.
    pub playback: Option<PlaybackState>,
    /// Submission lifecycle state.
    pub submission: SubmissionState,
    /// Submit is enabled: contact present and audio payload present.
    pub can_submit: bool,
    /// Inline notice or error for the user.
    pub message: Option<String>,
    /// The popup has closed.
    pub closed: bool,
}

impl Default for PopupView {
    fn default() -> Self {
        Self {
            recording_supported: false,
            support_notice: None,
            session: SessionState::Idle,
            audio: None,
            email: String::new(),
            phone: String::new(),
            playback: None,
            submission: SubmissionState::Editing,
            can_submit: false,
            message: None,
            closed: false,
        }
    }
}

/// Render a view snapshot as terminal lines.
pub(crate) fn render(view: &PopupView) -> String {
    if view.closed {
        return "── voice test closed ──".to_string();
    }

    let mut lines = vec!["── voice test ──".to_string()];

    if let Some(notice) = &view.support_notice {
        lines.push(format!("note: recording unavailable ({})", notice));
    }

    if view.recording_supported {
        lines.push(format!("mic: {}", view.session));
    }
    lines.push(format!(
        "audio: {}",
        view.audio.as_deref().unwrap_or("none")
    ));

    let contact = if !view.email.is_empty() {
        format!("email {}", view.email)
    } else if !view.phone.is_empty() {
        format!("phone {}", view.phone)
    } else {
        "none".to_string()
    };
    lines.push(format!("contact: {}", contact));

    if let Some(playback) = view.playback {
        let label = match playback {
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        lines.push(format!("preview: {}", label));
    }

    let ready = if view.can_submit && view.submission == SubmissionState::Editing {
        " (ready)"
    } else {
        ""
    };
    lines.push(format!("submit: {}{}", view.submission, ready));

    if let Some(message) = &view.message {
        lines.push(format!("» {}", message));
    }

    lines.join("\n")
}
