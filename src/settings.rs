use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyTable;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_settings_system);
    }
}

/// Everything tunable about the game, read once at startup from `settings.ron`.
///
/// Every field is `#[serde(default)]`, so a settings file only needs to list
/// the values it changes:
///
/// ```ron
/// (
///     difficulties: (hard: (round_seconds: 20, circle_size: 60.0, decoys: 12, spawn_interval: 0.6, points: 50)),
///     palette: [(255, 0, 0), (0, 0, 255)],
/// )
/// ```
#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub difficulties: DifficultyTable,
    /// Target colours as sRGB bytes. One is picked at random for each spawn.
    pub palette: Vec<(u8, u8, u8)>,
    pub spawn: SpawnSettings,
    pub pulse: PulseSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulties: DifficultyTable::default(),
            palette: vec![
                (0xE9, 0x1E, 0x63),
                (0x9C, 0x27, 0xB0),
                (0x21, 0x96, 0xF3),
                (0x4C, 0xAF, 0x50),
                (0xFF, 0x98, 0x00),
            ],
            spawn: SpawnSettings::default(),
            pulse: PulseSettings::default(),
        }
    }
}

impl Settings {
    /// Resets the spawn and pulse sections to their defaults when they hold
    /// values the game cannot use. Returns the name of each replaced section
    /// and why. Difficulty rows are checked by `DifficultyTable::sanitize`.
    pub fn sanitize_sections(&mut self) -> Vec<(&'static str, InvalidSection)> {
        let mut replaced = Vec::new();
        if let Err(reason) = self.spawn.validate() {
            self.spawn = SpawnSettings::default();
            replaced.push(("spawn", reason));
        }
        if let Err(reason) = self.pulse.validate() {
            self.pulse = PulseSettings::default();
            replaced.push(("pulse", reason));
        }
        replaced
    }

    pub fn palette_colors(&self) -> Vec<Color> {
        self.palette
            .iter()
            .map(|&(r, g, b)| Color::srgb_u8(r, g, b))
            .collect()
    }
}

/// Where targets and decoys may appear, in world units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnSettings {
    /// Keeps targets away from the left, right and bottom window edges.
    pub inset: f32,
    /// Space kept free at the top of the window for the HUD.
    pub hud_reserve: f32,
    pub decoy_min_distance: f32,
    pub decoy_max_distance: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            inset: 120.0,
            hud_reserve: 220.0,
            decoy_min_distance: 160.0,
            decoy_max_distance: 300.0,
        }
    }
}

/// The target grows and shrinks between `min_scale` and `max_scale`,
/// taking `half_period` seconds for each direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PulseSettings {
    pub min_scale: f32,
    pub max_scale: f32,
    pub half_period: f32,
}

impl SpawnSettings {
    pub fn validate(&self) -> Result<(), InvalidSection> {
        non_negative("inset", self.inset)?;
        non_negative("hud_reserve", self.hud_reserve)?;
        non_negative("decoy_min_distance", self.decoy_min_distance)?;
        non_negative("decoy_max_distance", self.decoy_max_distance)?;
        ordered(
            ("decoy_min_distance", self.decoy_min_distance),
            ("decoy_max_distance", self.decoy_max_distance),
        )
    }
}

impl PulseSettings {
    pub fn validate(&self) -> Result<(), InvalidSection> {
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        positive("half_period", self.half_period)?;
        ordered(("min_scale", self.min_scale), ("max_scale", self.max_scale))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidSection {
    #[error("{0} must be a finite number of at least 0, got {1}")]
    Negative(&'static str, f32),
    #[error("{0} must be a finite number above 0, got {1}")]
    NotPositive(&'static str, f32),
    #[error("{0} ({1}) is larger than {2} ({3})")]
    Inverted(&'static str, f32, &'static str, f32),
}

fn non_negative(field: &'static str, value: f32) -> Result<(), InvalidSection> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidSection::Negative(field, value))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), InvalidSection> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InvalidSection::NotPositive(field, value))
    }
}

fn ordered(low: (&'static str, f32), high: (&'static str, f32)) -> Result<(), InvalidSection> {
    if low.1 <= high.1 {
        Ok(())
    } else {
        Err(InvalidSection::Inverted(low.0, low.1, high.0, high.1))
    }
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.9,
            max_scale: 1.4,
            half_period: 0.6,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

pub fn parse_settings(contents: &str) -> Result<Settings, SettingsError> {
    Ok(ron::from_str::<Settings>(contents)?)
}

// =============================================================================
// Storage backend: native. Reads from the filesystem.
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use std::path::PathBuf;

    use super::{parse_settings, Settings, SettingsError};
    use bevy::prelude::*;

    const SETTINGS_ENV: &str = "FOCUS_SETTINGS";
    const SETTINGS_FILE: &str = "settings.ron";

    /// Candidate locations, most specific first.
    fn settings_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            paths.push(PathBuf::from(path));
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("focus").join(SETTINGS_FILE));
        }
        paths.push(PathBuf::from(SETTINGS_FILE));
        paths
    }

    pub fn read(path: &std::path::Path) -> Result<Settings, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        parse_settings(&contents)
    }

    /// Returns the first settings file that exists and parses, or None.
    pub fn load() -> Option<Settings> {
        for path in settings_paths() {
            if !path.exists() {
                debug!("No settings file at {:?}", path);
                continue;
            }

            match read(&path) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    return Some(settings);
                }
                Err(e) => {
                    // A broken file shouldn't stop the game from starting.
                    error!("{} ({:?}). Using defaults.", e, path);
                    return None;
                }
            }
        }

        info!("No settings file found. Using defaults.");
        None
    }
}

// =============================================================================
// Storage backend: WASM. The browser has no filesystem to read settings.ron from.
// =============================================================================

#[cfg(target_arch = "wasm32")]
mod storage {
    use super::Settings;
    use bevy::prelude::*;

    pub fn load() -> Option<Settings> {
        warn!("Settings files are not supported on the web. Using defaults.");
        None
    }
}

/// Inserts `Settings` before any Startup system runs, so everything else can
/// read it through `Res<Settings>`.
fn load_settings_system(mut commands: Commands) {
    let mut settings = storage::load().unwrap_or_default();

    for (difficulty, reason) in settings.difficulties.sanitize() {
        warn!(
            "Invalid {} tuning in settings: {}. Using the builtin values.",
            difficulty.label(),
            reason
        );
    }

    for (section, reason) in settings.sanitize_sections() {
        warn!("Invalid {} settings: {}. Using the defaults.", section, reason);
    }

    if settings.palette.is_empty() {
        warn!("Settings palette is empty. Targets will be white.");
    }

    commands.insert_resource(settings);
}
