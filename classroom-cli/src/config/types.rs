use serde::Deserialize;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawClassroomConfig {
    #[serde(default)]
    pub timing: RawTimingConfig,

    #[serde(default)]
    pub roster: RawRosterConfig,
}

/// Timer delays as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTimingConfig {
    /// Ticks between start_working and the automatic submission
    pub work_delay_ms: Option<u64>,

    /// Ticks between submission and grading
    pub grade_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRosterConfig {
    pub cancel_timers_on_remove: Option<bool>,
}
