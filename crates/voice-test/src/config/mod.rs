mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod submit_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    submit_config::SubmitConfig,
};

pub(crate) const DEFAULT_ENDPOINT_URL: &str = "https://voicetest.lingosubmit.com/api/voice-test";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CLOSE_DELAY_MS: u64 = 2_000;

pub(crate) fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn default_close_delay_ms() -> u64 {
    DEFAULT_CLOSE_DELAY_MS
}
