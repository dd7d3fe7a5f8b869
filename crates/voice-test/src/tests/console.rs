use crate::{PopupCommand, console};

use std::path::PathBuf;

/// WHAT: Every command word parses to its popup command
/// WHY: The front end is the only way a user reaches the controller
#[test]
fn given_valid_lines_when_parsed_then_commands_produced() {
    assert!(matches!(
        console::parse_line("record"),
        Some(PopupCommand::StartRecording)
    ));
    assert!(matches!(
        console::parse_line("  pause  "),
        Some(PopupCommand::PauseRecording)
    ));
    assert!(matches!(
        console::parse_line("resume"),
        Some(PopupCommand::ResumeRecording)
    ));
    assert!(matches!(
        console::parse_line("stop"),
        Some(PopupCommand::StopRecording)
    ));
    assert!(matches!(
        console::parse_line("remove"),
        Some(PopupCommand::RemoveAudio)
    ));
    assert!(matches!(
        console::parse_line("play"),
        Some(PopupCommand::TogglePlayback)
    ));
    assert!(matches!(
        console::parse_line("submit"),
        Some(PopupCommand::Submit)
    ));
    assert!(matches!(
        console::parse_line("close"),
        Some(PopupCommand::Close)
    ));
    assert!(matches!(
        console::parse_line("cancel"),
        Some(PopupCommand::Close)
    ));
}

/// WHAT: Upload carries its path and requires one
/// WHY: A bare "upload" has nothing to load and must show usage
#[test]
#[allow(clippy::panic)]
fn given_upload_lines_when_parsed_then_path_required() {
    match console::parse_line("upload /tmp/voice sample.mp3") {
        Some(PopupCommand::UploadFile { path }) => {
            assert_eq!(path, PathBuf::from("/tmp/voice sample.mp3"));
        }
        other => panic!("unexpected parse: {:?}", other),
    }

    assert!(console::parse_line("upload").is_none());
    assert!(console::parse_line("upload   ").is_none());
}

/// WHAT: Contact accepts any value, including an empty one
/// WHY: An empty contact value clears both routed fields
#[test]
#[allow(clippy::panic)]
fn given_contact_lines_when_parsed_then_value_captured() {
    match console::parse_line("contact a@b.com") {
        Some(PopupCommand::SetContact { value }) => assert_eq!(value, "a@b.com"),
        other => panic!("unexpected parse: {:?}", other),
    }

    match console::parse_line("contact") {
        Some(PopupCommand::SetContact { value }) => assert_eq!(value, ""),
        other => panic!("unexpected parse: {:?}", other),
    }
}

/// WHAT: Unknown words do not parse
/// WHY: The front end shows usage instead of guessing
#[test]
fn given_unknown_line_when_parsed_then_none() {
    assert!(console::parse_line("transcribe now").is_none());
    assert!(console::parse_line("").is_none());
}
