use serde::Deserialize;

/// Top-level config file. Every field is optional; flags given on the
/// command line take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub recorder: Option<RecorderSection>,
    pub player: Option<PlayerSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecorderSection {
    pub output_dir: Option<String>,
    pub file_name: Option<String>,
    pub immediate_write: Option<bool>,
    pub event_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerSection {
    pub speed: Option<f64>,
    #[serde(rename = "loop", alias = "loop_playback")]
    pub loop_playback: Option<bool>,
    #[serde(rename = "debug", alias = "debug_catch_up")]
    pub debug_catch_up: Option<bool>,
    pub event_capacity: Option<usize>,
}
