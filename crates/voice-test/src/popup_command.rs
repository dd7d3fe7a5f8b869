use std::path::PathBuf;

/// Commands dispatched to the popup controller. User commands come from
/// the front end; `SubmissionFinished` is reported back by the in-flight
/// submission task.
#[derive(Debug, Clone)]
pub enum PopupCommand {
    /// Start a new recording session.
    StartRecording,
    /// Pause the active recording session.
    PauseRecording,
    /// Resume a paused recording session.
    ResumeRecording,
    /// Stop and finalize the recording session.
    StopRecording,
    /// Select an audio file as the payload.
    UploadFile {
        /// Path of the selected file.
        path: PathBuf,
    },
    /// Discard the active audio payload.
    RemoveAudio,
    /// Route a raw contact input value.
    SetContact {
        /// The value as typed.
        value: String,
    },
    /// Toggle preview playback of the active payload.
    TogglePlayback,
    /// Submit the form.
    Submit,
    /// Outcome of the in-flight submission request.
    SubmissionFinished {
        /// Ok on HTTP success, otherwise the user-facing failure reason.
        outcome: Result<(), String>,
    },
    /// Close the popup, releasing every held resource.
    Close,
}
