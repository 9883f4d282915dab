// menu.rs - Main menu and rules page.
//
// Both screens are plain Bevy UI trees spawned on OnEnter and despawned on
// OnExit through a marker component. Buttons carry a `MenuButton` that says
// what they do; one system reacts to every press.

use bevy::prelude::*;

use crate::{
    difficulty::Difficulty,
    screen::{despawn_all, BackButton, Screen, SelectedDifficulty},
    theme,
};

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Menu), spawn_menu_ui)
            .add_systems(
                Update,
                handle_menu_buttons.run_if(in_state(Screen::Menu)),
            )
            .add_systems(OnExit(Screen::Menu), despawn_all::<MenuUi>)
            .add_systems(OnEnter(Screen::Rules), spawn_rules_ui)
            .add_systems(OnExit(Screen::Rules), despawn_all::<RulesUi>)
            .add_systems(Update, button_hover_system);
    }
}

pub const RULES_TEXT: &str =
    "Tap the flashing target circle before the countdown runs out to score points. \
     Grey circles are decoys and are worth nothing. \
     Harder levels give less time, smaller targets, more decoys and more points per hit.";

#[derive(Component)]
struct MenuUi;

#[derive(Component)]
struct RulesUi;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Play(Difficulty),
    Rules,
}

fn spawn_menu_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            MenuUi,
        ))
        .with_children(|parent| {
            // rules button sits alone in the top-left corner
            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::FlexStart,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn(theme::button(MenuButton::Rules, "Rules", 120.0, 56.0, theme::ACCENT));
                });

            parent
                .spawn((
                    Node {
                        margin: UiRect::top(Val::Px(100.0)),
                        padding: UiRect::axes(Val::Px(36.0), Val::Px(18.0)),
                        ..default()
                    },
                    BackgroundColor(theme::ACCENT),
                ))
                .with_children(|plate| {
                    plate.spawn(theme::text("Focus", theme::TITLE_SIZE, Color::WHITE));
                });

            // pushes the difficulty buttons to the bottom half
            parent.spawn(Node {
                flex_grow: 1.0,
                ..default()
            });

            for difficulty in Difficulty::ALL {
                parent
                    .spawn(Node {
                        padding: UiRect::vertical(Val::Px(8.0)),
                        ..default()
                    })
                    .with_children(|slot| {
                        slot.spawn(theme::button(
                            MenuButton::Play(difficulty),
                            difficulty.label(),
                            240.0,
                            80.0,
                            theme::ACCENT,
                        ));
                    });
            }

            parent.spawn(Node {
                height: Val::Px(80.0),
                ..default()
            });
        });
}

fn handle_menu_buttons(
    query: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    mut selected: ResMut<SelectedDifficulty>,
    mut next_state: ResMut<NextState<Screen>>,
) {
    for (interaction, button) in query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            MenuButton::Play(difficulty) => {
                selected.0 = *difficulty;
                next_state.set(Screen::Game);
            }
            MenuButton::Rules => next_state.set(Screen::Rules),
        }
    }
}

fn spawn_rules_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::axes(Val::Px(24.0), Val::Px(24.0)),
                ..default()
            },
            RulesUi,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::FlexStart,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn(theme::button(BackButton, "Back", 120.0, 64.0, theme::ACCENT));
                });

            parent.spawn((
                theme::text("Rules", theme::TITLE_SIZE, Color::BLACK),
                Node {
                    margin: UiRect::vertical(Val::Px(60.0)),
                    ..default()
                },
            ));

            parent.spawn((
                theme::text(RULES_TEXT, theme::BODY_TEXT_SIZE, Color::BLACK),
                Node {
                    width: Val::Percent(100.0),
                    ..default()
                },
            ));
        });
}

/// Darkens accent buttons while the pointer is over them.
fn button_hover_system(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        match interaction {
            Interaction::Hovered if background.0 == theme::ACCENT => background.0 = theme::ACCENT_HOVER,
            Interaction::None if background.0 == theme::ACCENT_HOVER => background.0 = theme::ACCENT,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::screen::ScreenPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, ScreenPlugin, MenuPlugin))
            .init_resource::<ButtonInput<KeyCode>>();
        app.update();
        app
    }

    fn press(app: &mut App, wanted: MenuButton) {
        let mut query = app.world_mut().query::<(Entity, &MenuButton)>();
        let entity = query
            .iter(app.world())
            .find(|(_, button)| **button == wanted)
            .map(|(entity, _)| entity)
            .unwrap();
        app.world_mut().entity_mut(entity).insert(Interaction::Pressed);
        app.update();
        app.update();
    }

    fn current(app: &App) -> Screen {
        *app.world().resource::<State<Screen>>().get()
    }

    #[test]
    fn menu_offers_every_difficulty_and_the_rules() {
        let mut app = app();
        let mut query = app.world_mut().query::<&MenuButton>();
        let buttons: Vec<MenuButton> = query.iter(app.world()).copied().collect();

        assert_eq!(buttons.len(), 4);
        assert!(buttons.contains(&MenuButton::Rules));
        for difficulty in Difficulty::ALL {
            assert!(buttons.contains(&MenuButton::Play(difficulty)));
        }
    }

    #[test]
    fn picking_a_difficulty_starts_the_game() {
        let mut app = app();

        press(&mut app, MenuButton::Play(Difficulty::Hard));

        assert_eq!(current(&app), Screen::Game);
        assert_eq!(app.world().resource::<SelectedDifficulty>().0, Difficulty::Hard);
        // menu UI is gone
        let mut query = app.world_mut().query::<&MenuButton>();
        assert_eq!(query.iter(app.world()).count(), 0);
    }

    #[test]
    fn rules_page_and_back() {
        let mut app = app();

        press(&mut app, MenuButton::Rules);
        assert_eq!(current(&app), Screen::Rules);

        let mut texts = app.world_mut().query::<&Text>();
        assert!(texts.iter(app.world()).any(|t| t.0 == RULES_TEXT));

        let mut back = app.world_mut().query_filtered::<Entity, With<BackButton>>();
        let back = back.iter(app.world()).next().unwrap();
        app.world_mut().entity_mut(back).insert(Interaction::Pressed);
        app.update();
        app.update();

        assert_eq!(current(&app), Screen::Menu);
    }
}
