use std::fmt;

/// Submission lifecycle for the popup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Form is editable; nothing in flight.
    #[default]
    Editing,
    /// Request in flight; inputs are disabled.
    Submitting,
    /// Server accepted the submission; popup closes after a short delay.
    Submitted,
    /// Submission failed; captured state is preserved for retry.
    Failed(String),
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Editing => f.write_str("editing"),
            SubmissionState::Submitting => f.write_str("submitting"),
            SubmissionState::Submitted => f.write_str("submitted"),
            SubmissionState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
