use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Focus".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            settings::SettingsPlugin,
            screen::ScreenPlugin,
            menu::MenuPlugin,
            round::RoundPlugin,
            spawn::SpawnPlugin,
            targets::TargetsPlugin,
            pulse::PulsePlugin,
            input::TapInputPlugin,
            hud::HudPlugin,
            render::RenderPlugin,
        ))
        .run();
}

mod difficulty;
mod hud;
mod input;
mod menu;
mod pulse;
mod render;
mod round;
mod screen;
mod settings;
mod spawn;
mod targets;
mod theme;
