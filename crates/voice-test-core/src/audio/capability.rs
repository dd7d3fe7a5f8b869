//! Feature detection performed before enabling recording controls.

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::{info, instrument, warn};

/// Whether in-app recording is possible on this machine.
///
/// Probed once when the popup opens: an audio host that can enumerate
/// input devices, a default input device, and a usable input
/// configuration. Anything missing downgrades the popup to
/// upload-only mode with a visible notice; it is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSupport {
    /// Recording controls may be offered.
    Available,
    /// Recording is impossible; the reason is shown to the user.
    Unavailable {
        /// Human-readable explanation for the downgrade.
        reason: String,
    },
}

impl CaptureSupport {
    /// Probe the default audio host. Never holds a device open.
    #[instrument]
    pub fn detect() -> Self {
        let host = cpal::default_host();

        match host.input_devices() {
            Ok(mut devices) => {
                if devices.next().is_none() {
                    return Self::unavailable("no audio input devices present");
                }
            }
            Err(e) => {
                return Self::unavailable(format!("input devices cannot be enumerated: {}", e));
            }
        }

        let Some(device) = host.default_input_device() else {
            return Self::unavailable("no default input device");
        };

        if let Err(e) = device.default_input_config() {
            return Self::unavailable(format!("no usable input configuration: {}", e));
        }

        info!("Recording capability available");
        CaptureSupport::Available
    }

    /// True when recording controls may be offered.
    pub fn is_available(&self) -> bool {
        matches!(self, CaptureSupport::Available)
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "Recording capability unavailable, upload-only mode");
        CaptureSupport::Unavailable { reason }
    }
}
