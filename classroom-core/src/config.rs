//! Simulation configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay between starting work and the automatic submission check
pub const DEFAULT_WORK_DELAY_MS: u64 = 500;

/// Delay between submission and grading
pub const DEFAULT_GRADE_DELAY_MS: u64 = 500;

/// Per-transition timer delays, in ticks (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub work_delay_ms: u64,
    pub grade_delay_ms: u64,
}

impl TimingConfig {
    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    pub fn grade_delay(&self) -> Duration {
        Duration::from_millis(self.grade_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            work_delay_ms: DEFAULT_WORK_DELAY_MS,
            grade_delay_ms: DEFAULT_GRADE_DELAY_MS,
        }
    }
}

/// Roster behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Cancel a student's pending timers when it is removed from the roster.
    ///
    /// Off by default: removed students keep progressing on their own.
    pub cancel_timers_on_remove: bool,
}

/// Complete simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassroomConfig {
    pub timing: TimingConfig,
    pub roster: RosterConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_delays() {
        let config = ClassroomConfig::default();
        assert_eq!(config.timing.work_delay(), Duration::from_millis(500));
        assert_eq!(config.timing.grade_delay(), Duration::from_millis(500));
        assert!(!config.roster.cancel_timers_on_remove);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: ClassroomConfig = toml::from_str(
            r#"
[timing]
grade_delay_ms = 50
"#,
        )
        .unwrap();

        assert_eq!(config.timing.work_delay_ms, DEFAULT_WORK_DELAY_MS);
        assert_eq!(config.timing.grade_delay_ms, 50);
        assert!(!config.roster.cancel_timers_on_remove);
    }

    #[test]
    fn toml_round_trip() {
        let config = ClassroomConfig {
            timing: TimingConfig {
                work_delay_ms: 10,
                grade_delay_ms: 20,
            },
            roster: RosterConfig {
                cancel_timers_on_remove: true,
            },
        };

        let text = toml::to_string(&config).unwrap();
        let parsed: ClassroomConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
