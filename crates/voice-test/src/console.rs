//! Line-command parsing for the terminal front end.

use crate::PopupCommand;

use std::path::PathBuf;

/// Shown on startup and whenever a line does not parse.
pub(crate) const USAGE: &str = "commands: record | pause | resume | stop | upload <path> | \
     remove | contact <email-or-phone> | play | submit | close";

/// Parse one input line into a popup command. `None` means the line did
/// not parse and the usage notice should be shown.
pub(crate) fn parse_line(line: &str) -> Option<PopupCommand> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word {
        "record" | "start" => Some(PopupCommand::StartRecording),
        "pause" => Some(PopupCommand::PauseRecording),
        "resume" => Some(PopupCommand::ResumeRecording),
        "stop" => Some(PopupCommand::StopRecording),
        "upload" if !rest.is_empty() => Some(PopupCommand::UploadFile {
            path: PathBuf::from(rest),
        }),
        "remove" => Some(PopupCommand::RemoveAudio),
        // an empty value is valid: it clears both contact fields
        "contact" => Some(PopupCommand::SetContact {
            value: rest.to_string(),
        }),
        "play" => Some(PopupCommand::TogglePlayback),
        "submit" => Some(PopupCommand::Submit),
        "close" | "cancel" => Some(PopupCommand::Close),
        _ => None,
    }
}
