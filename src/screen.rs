// screen.rs - Top-level navigation between the menu, the game and the rules page.
//
// Each screen spawns its own UI/entities in OnEnter and tags them with a marker
// component; the matching OnExit despawns everything with that marker. Nothing
// survives a screen change, so a new round always starts from scratch.

use bevy::prelude::*;

use crate::difficulty::Difficulty;

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Screen>()
            .init_resource::<SelectedDifficulty>()
            .add_systems(
                Update,
                (
                    back_button_system,
                    escape_to_menu_system.run_if(not(in_state(Screen::Menu))),
                ),
            )
            .add_systems(OnEnter(Screen::Menu), log_screen_system)
            .add_systems(OnEnter(Screen::Game), log_screen_system)
            .add_systems(OnEnter(Screen::Rules), log_screen_system);
    }
}

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Menu,
    Game,
    Rules,
}

/// Which tuning the next round uses. Set by the menu buttons.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedDifficulty(pub Difficulty);

/// Any button that leads back to the main menu (HUD back, game-over panel, rules page).
#[derive(Component)]
pub struct BackButton;

fn back_button_system(
    query: Query<&Interaction, (Changed<Interaction>, With<BackButton>)>,
    mut next_state: ResMut<NextState<Screen>>,
) {
    for interaction in query.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(Screen::Menu);
        }
    }
}

/// Escape works like the system back gesture on a phone.
fn escape_to_menu_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<Screen>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(Screen::Menu);
    }
}

fn log_screen_system(screen: Res<State<Screen>>) {
    info!("Entered {:?} screen", screen.get());
}

/// Despawns every entity tagged with `T`. Register it in OnExit of the screen that spawned them.
pub fn despawn_all<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        // despawn removes the entity and all its children
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[derive(Component)]
    struct Scratch;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, ScreenPlugin))
            .init_resource::<ButtonInput<KeyCode>>();
        app.update();
        app
    }

    fn go_to(app: &mut App, screen: Screen) {
        app.world_mut().resource_mut::<NextState<Screen>>().set(screen);
        app.update();
    }

    fn current(app: &App) -> Screen {
        *app.world().resource::<State<Screen>>().get()
    }

    #[test]
    fn starts_on_the_menu() {
        let app = app();
        assert_eq!(current(&app), Screen::Menu);
        assert_eq!(app.world().resource::<SelectedDifficulty>().0, Difficulty::Easy);
    }

    #[test]
    fn escape_returns_to_menu() {
        let mut app = app();
        go_to(&mut app, Screen::Rules);
        assert_eq!(current(&app), Screen::Rules);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        // first update queues the transition, second applies it
        app.update();
        app.update();

        assert_eq!(current(&app), Screen::Menu);
    }

    #[test]
    fn pressing_a_back_button_returns_to_menu() {
        let mut app = app();
        go_to(&mut app, Screen::Game);

        app.world_mut().spawn((BackButton, Interaction::Pressed));
        app.update();
        app.update();

        assert_eq!(current(&app), Screen::Menu);
    }

    #[test]
    fn despawn_all_only_touches_tagged_entities() {
        let mut app = App::new();
        app.add_systems(Update, despawn_all::<Scratch>);
        let tagged = app.world_mut().spawn(Scratch).id();
        let untagged = app.world_mut().spawn_empty().id();

        app.update();

        assert!(app.world().get_entity(tagged).is_err());
        assert!(app.world().get_entity(untagged).is_ok());
    }
}
