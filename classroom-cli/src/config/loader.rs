use super::types::{RawClassroomConfig, RawRosterConfig, RawTimingConfig};
use anyhow::{Context, Result};
use classroom_core::{ClassroomConfig, RosterConfig, TimingConfig};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Env var that relocates the project config directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "CLASSROOM_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

/// Where each config layer is read from, in merge order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// None when the platform has no home directory
    pub user: Option<PathBuf>,
    pub project: PathBuf,
}

impl std::fmt::Display for ConfigPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.user {
            Some(path) => writeln!(f, "User config:    {}", path.display())?,
            None => writeln!(f, "User config:    (no home directory)")?,
        }
        write!(f, "Project config: {}", self.project.display())
    }
}

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<ClassroomConfig> {
        let paths = Self::paths();
        Self::load_layers(paths.user.as_deref(), &paths.project)
    }

    /// Both layer locations as currently resolved
    pub fn paths() -> ConfigPaths {
        ConfigPaths {
            user: Self::user_config_path(),
            project: Self::project_config_path(),
        }
    }

    /// Load and merge the given layers, later layers winning
    pub fn load_layers(user: Option<&Path>, project: &Path) -> Result<ClassroomConfig> {
        let mut raw = RawClassroomConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user
            && let Some(user_config) = Self::read_raw(user_path)?
        {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_raw(project)? {
            raw = Self::merge_raw(raw, project_config);
        }

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "classroom").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with CLASSROOM_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_DIR_ENV) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".classroom/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<Option<RawClassroomConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config layer");
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawClassroomConfig, overlay: RawClassroomConfig) -> RawClassroomConfig {
        RawClassroomConfig {
            timing: RawTimingConfig {
                work_delay_ms: overlay.timing.work_delay_ms.or(base.timing.work_delay_ms),
                grade_delay_ms: overlay.timing.grade_delay_ms.or(base.timing.grade_delay_ms),
            },
            roster: RawRosterConfig {
                cancel_timers_on_remove: overlay
                    .roster
                    .cancel_timers_on_remove
                    .or(base.roster.cancel_timers_on_remove),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawClassroomConfig) -> ClassroomConfig {
        let timing = TimingConfig::default();
        let roster = RosterConfig::default();
        ClassroomConfig {
            timing: TimingConfig {
                work_delay_ms: raw.timing.work_delay_ms.unwrap_or(timing.work_delay_ms),
                grade_delay_ms: raw.timing.grade_delay_ms.unwrap_or(timing.grade_delay_ms),
            },
            roster: RosterConfig {
                cancel_timers_on_remove: raw
                    .roster
                    .cancel_timers_on_remove
                    .unwrap_or(roster.cancel_timers_on_remove),
            },
        }
    }
}
