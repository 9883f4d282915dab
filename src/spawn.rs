use std::f32::consts::TAU;

use bevy::{prelude::*, window::PrimaryWindow};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{difficulty::DifficultyConfig, settings::SpawnSettings};

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayArea>()
            .insert_resource(GameRng::from_entropy())
            .add_systems(PreUpdate, track_play_area_system);
    }
}

/// RNG used for every spawn roll. Seeded from entropy in the game and from a
/// fixed seed in tests so layouts can be reproduced.
#[derive(Resource)]
pub struct GameRng(pub ChaCha8Rng);

impl GameRng {
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Visible world-space rectangle. The default 2D camera puts the origin in
/// the middle of the window with one world unit per logical pixel.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayArea(pub Rect);

impl Default for PlayArea {
    fn default() -> Self {
        Self(Rect::from_center_size(Vec2::ZERO, Vec2::new(1280.0, 720.0)))
    }
}

fn track_play_area_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut area: ResMut<PlayArea>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    let rect = Rect::from_center_size(Vec2::ZERO, size);
    if area.0 != rect {
        debug!("Play area is now {}x{}", size.x, size.y);
        area.0 = rect;
    }
}

/// One target plus its decoys. They appear together and are replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnCycle {
    pub target: Vec2,
    pub color: Color,
    pub decoys: Vec<Vec2>,
}

/// Rolls a fresh target position, colour and decoy ring.
pub fn roll_cycle(
    rng: &mut impl Rng,
    config: &DifficultyConfig,
    area: Rect,
    spawn: &SpawnSettings,
    palette: &[Color],
) -> SpawnCycle {
    let target = Vec2::new(
        uniform_in(rng, area.min.x + spawn.inset, area.max.x - spawn.inset),
        uniform_in(rng, area.min.y + spawn.inset, area.max.y - spawn.hud_reserve),
    );

    let color = if palette.is_empty() {
        Color::WHITE
    } else {
        palette[rng.gen_range(0..palette.len())]
    };

    let decoys = (0..config.decoys)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let distance = uniform_in(rng, spawn.decoy_min_distance, spawn.decoy_max_distance);
            target + Vec2::from_angle(angle) * distance
        })
        .collect();

    SpawnCycle {
        target,
        color,
        decoys,
    }
}

/// Uniform sample from `[low, high)`. An empty range collapses to its midpoint
/// so a window smaller than the insets still gets a target.
fn uniform_in(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        (low + high) / 2.0
    }
}
