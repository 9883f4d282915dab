use bevy::prelude::*;

use crate::{targets::Disc, theme};

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(theme::BACKGROUND))
            .add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, attach_disc_meshes);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Gives every newly spawned disc a filled circle mesh and a flat colour material.
/// Discs only live for one spawn cycle, so there is nothing to update afterwards.
///
/// `Added<Disc>` matches entities whose `Disc` was inserted since this system
/// last ran. Running in `PostUpdate` picks up everything `respawn_system`
/// spawned in `Update` before the frame is drawn. The disc may already be
/// gone again (round ended in the same frame), hence `try_insert`.
fn attach_disc_meshes(
    mut commands: Commands,
    discs: Query<(Entity, &Disc), Added<Disc>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, disc) in discs.iter() {
        commands.entity(entity).try_insert((
            Mesh2d(meshes.add(Circle::new(disc.radius))),
            MeshMaterial2d(materials.add(disc.color)),
        ));
    }
}
