use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/navdemo.toml";

/// Demo runner configuration, loaded from TOML with defaults on any failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavDemoConfig {
    /// Ticks to simulate before giving up on the run.
    pub max_ticks: u64,
    /// Blocks per tick the demo agent covers at speed modifier 1.0.
    pub agent_speed: f64,
    /// Agent bounding-box width in blocks.
    pub agent_width: f64,
    /// Agent bounding-box height in blocks.
    pub agent_height: f64,
    /// Half extent of the generated square arena.
    pub world_half_extent: i32,
    /// Per-column probability of an obstacle pillar in the scatter scenario.
    pub obstacle_density: f64,
    /// Maximum path length handed to the searcher.
    pub max_path_len: f32,
}

impl Default for NavDemoConfig {
    fn default() -> Self {
        Self {
            max_ticks: 600,
            agent_speed: 0.25,
            agent_width: 0.6,
            agent_height: 1.8,
            world_half_extent: 24,
            obstacle_density: 0.08,
            max_path_len: 48.0,
        }
    }
}

impl NavDemoConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<NavDemoConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    NavDemoConfig::default()
                }
            },
            Err(_) => NavDemoConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = NavDemoConfig::load_from_path(Path::new("/definitely/not/here.toml"));
        assert_eq!(cfg.max_ticks, 600);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg: NavDemoConfig = toml::from_str("agent_speed = 0.5").unwrap();
        assert_eq!(cfg.agent_speed, 0.5);
        assert_eq!(cfg.world_half_extent, 24);
    }
}
