//! Simulation configuration.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use surface::Color;
use tracing::info;

/// Above this the frame budget rounds down to nothing.
pub const MAX_FPS: u32 = 10_000;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub autonomous: AutonomousConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the file is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "world size must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.clock.max_fps == 0 || self.clock.max_fps > MAX_FPS {
            return Err(SimError::InvalidConfig(format!(
                "clock.max_fps must be within 1..={}, got {}",
                MAX_FPS, self.clock.max_fps
            )));
        }
        if self.clock.max_delta < 1.0 / self.clock.max_fps as f32 {
            return Err(SimError::InvalidConfig(format!(
                "clock.max_delta ({}) is below one frame at {} fps",
                self.clock.max_delta, self.clock.max_fps
            )));
        }
        if self.player.mass == 0 || self.autonomous.mass == 0 {
            return Err(SimError::InvalidConfig("entity masses must be at least 1".into()));
        }
        if self.player.cells == 0 || self.autonomous.cells == 0 {
            return Err(SimError::InvalidConfig("entities need at least one cell".into()));
        }
        if self.player.max_cells < self.player.cells {
            return Err(SimError::InvalidConfig(format!(
                "player.max_cells ({}) is below player.cells ({})",
                self.player.max_cells, self.player.cells
            )));
        }
        if self.autonomous.respawn_cooldown <= 0.0 {
            return Err(SimError::InvalidConfig(
                "autonomous.respawn_cooldown must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// World bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_size")]
    pub width: f32,
    #[serde(default = "default_world_size")]
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_size(),
            height: default_world_size(),
        }
    }
}

fn default_world_size() -> f32 {
    720.0
}

/// Frame clock settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Target frame rate; one frame at this rate is the smallest Δt.
    #[serde(default = "default_max_fps")]
    pub max_fps: u32,
    /// Largest Δt handed to the simulation after a stall, in seconds.
    #[serde(default = "default_max_delta")]
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_fps: default_max_fps(),
            max_delta: default_max_delta(),
        }
    }
}

fn default_max_fps() -> u32 {
    144
}
fn default_max_delta() -> f32 {
    0.25
}

/// Player entity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_mass")]
    pub mass: u32,
    #[serde(default = "default_cells")]
    pub cells: usize,
    #[serde(default = "default_player_color")]
    pub color: Color,
    #[serde(default = "default_player_max_cells")]
    pub max_cells: usize,
    #[serde(default = "default_player_min_split_mass")]
    pub min_split_mass: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mass: default_player_mass(),
            cells: default_cells(),
            color: default_player_color(),
            max_cells: default_player_max_cells(),
            min_split_mass: default_player_min_split_mass(),
        }
    }
}

fn default_player_mass() -> u32 {
    4096
}
fn default_cells() -> usize {
    2
}
fn default_player_color() -> Color {
    Color::new(255, 0, 0)
}
fn default_player_max_cells() -> usize {
    16
}
fn default_player_min_split_mass() -> u32 {
    64
}

/// Autonomous entity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutonomousConfig {
    /// Entities spawned when the level starts.
    #[serde(default = "default_autonomous_count")]
    pub count: usize,
    #[serde(default = "default_autonomous_mass")]
    pub mass: u32,
    #[serde(default = "default_cells")]
    pub cells: usize,
    /// Seconds between respawn checks.
    #[serde(default = "default_respawn_cooldown")]
    pub respawn_cooldown: f32,
    /// Respawns stop while at least this many autonomous entities are alive.
    #[serde(default = "default_autonomous_count")]
    pub max_count: usize,
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self {
            count: default_autonomous_count(),
            mass: default_autonomous_mass(),
            cells: default_cells(),
            respawn_cooldown: default_respawn_cooldown(),
            max_count: default_autonomous_count(),
        }
    }
}

fn default_autonomous_count() -> usize {
    10
}
fn default_autonomous_mass() -> u32 {
    512
}
fn default_respawn_cooldown() -> f32 {
    1.0
}

/// Draw pass settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Cells at or above this mass get their mass drawn as a label.
    #[serde(default = "default_label_min_mass")]
    pub label_min_mass: u32,
    #[serde(default = "default_outline_width")]
    pub outline_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label_min_mass: default_label_min_mass(),
            outline_width: default_outline_width(),
        }
    }
}

fn default_label_min_mass() -> u32 {
    1024
}
fn default_outline_width() -> f32 {
    4.0
}

/// Runner settings, ignored by the library itself.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunConfig {
    /// Stop after this many frames (0 = run until the level ends).
    #[serde(default)]
    pub frames: u64,
    /// RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}
