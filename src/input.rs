use bevy::{prelude::*, window::PrimaryWindow};

use crate::round::RoundSet;

pub struct TapInputPlugin;

impl Plugin for TapInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<Tap>()
            .add_systems(Update, emit_taps_system.in_set(RoundSet::Input));
    }
}

/// A click or touch on the play field, already converted to world coordinates.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub position: Vec2,
}

/// Turns new left clicks and new touches into `Tap` messages.
/// Only runs on the game screen, so menu clicks never reach the round.
fn emit_taps_system(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut taps: MessageWriter<Tap>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let mut screen_points: Vec<Vec2> = touches.iter_just_pressed().map(|t| t.position()).collect();

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
            screen_points.push(cursor);
        }
    }

    for point in screen_points {
        match camera.viewport_to_world_2d(camera_transform, point) {
            Ok(position) => {
                taps.write(Tap { position });
            }
            Err(e) => debug!("Dropped tap at {:?}: {:?}", point, e),
        }
    }
}
