use bevy::prelude::*;

use crate::{
    round::{start_round_system, Round, RoundEnded},
    screen::{despawn_all, BackButton, Screen},
    theme,
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Game), spawn_hud.after(start_round_system))
            .add_systems(
                Update,
                update_hud_system.run_if(
                    in_state(Screen::Game).and(resource_exists_and_changed::<Round>),
                ),
            )
            .add_systems(OnExit(Screen::Game), despawn_all::<HudUi>)
            .add_observer(on_round_ended_show_panel);
    }
}

/// Everything the HUD spawns, including the game-over panel.
#[derive(Component)]
struct HudUi;

#[derive(Component)]
struct ClockText;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct GameOverPanel;

pub fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

fn spawn_hud(mut commands: Commands, round: Res<Round>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            HudUi,
        ))
        .with_children(|parent| {
            // top bar: back + badge on the left, clock on the right
            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|bar| {
                    bar.spawn(Node {
                        column_gap: Val::Px(12.0),
                        align_items: AlignItems::Center,
                        ..default()
                    })
                    .with_children(|left| {
                        left.spawn(theme::button(BackButton, "Back", 96.0, 56.0, theme::ACCENT));
                        left.spawn((
                            Node {
                                padding: UiRect::axes(Val::Px(20.0), Val::Px(8.0)),
                                ..default()
                            },
                            BackgroundColor(theme::ACCENT),
                        ))
                        .with_children(|badge| {
                            badge.spawn(theme::text(
                                round.difficulty.label(),
                                theme::BODY_TEXT_SIZE,
                                Color::WHITE,
                            ));
                        });
                    });

                    bar.spawn((
                        theme::text(round.clock_text(), theme::TITLE_SIZE, theme::INFO_TEXT),
                        ClockText,
                    ));
                });

            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    margin: UiRect::top(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Node {
                            padding: UiRect::axes(Val::Px(32.0), Val::Px(12.0)),
                            ..default()
                        },
                        BackgroundColor(theme::SCORE_CARD),
                    ))
                    .with_children(|card| {
                        card.spawn((
                            theme::text(score_label(round.score), 36.0, theme::INFO_TEXT),
                            ScoreText,
                        ));
                    });
                });
        });
}

fn update_hud_system(
    round: Res<Round>,
    mut clock: Query<&mut Text, (With<ClockText>, Without<ScoreText>)>,
    mut score: Query<&mut Text, (With<ScoreText>, Without<ClockText>)>,
) {
    for mut text in clock.iter_mut() {
        let value = round.clock_text();
        if text.0 != value {
            text.0 = value;
        }
    }
    for mut text in score.iter_mut() {
        let value = score_label(round.score);
        if text.0 != value {
            text.0 = value;
        }
    }
}

fn on_round_ended_show_panel(
    ended: On<RoundEnded>,
    mut commands: Commands,
    existing: Query<(), With<GameOverPanel>>,
) {
    if !existing.is_empty() {
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            // draw above the HUD
            GlobalZIndex(1),
            HudUi,
            GameOverPanel,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(360.0),
                        height: Val::Px(480.0),
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(16.0),
                        ..default()
                    },
                    BackgroundColor(theme::PANEL),
                ))
                .with_children(|card| {
                    card.spawn(theme::text("Game Over!", 52.0, theme::GAME_OVER_TITLE));
                    card.spawn(theme::text("Final score", 32.0, Color::srgb(0.5, 0.5, 0.5)));
                    card.spawn(theme::text(
                        format!("{} pts", ended.score),
                        80.0,
                        theme::FINAL_SCORE,
                    ));
                    card.spawn(theme::button(BackButton, "Back to menu", 260.0, 70.0, theme::MENU_RETURN));
                });
        });
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::{
        difficulty::Difficulty,
        round::RoundPlugin,
        screen::{ScreenPlugin, SelectedDifficulty},
        settings::Settings,
    };

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, ScreenPlugin, RoundPlugin, HudPlugin))
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(Settings::default())
            .insert_resource(SelectedDifficulty(Difficulty::Medium));
        app.update();
        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Game);
        app.update();
        app
    }

    fn texts(app: &mut App) -> Vec<String> {
        let mut query = app.world_mut().query::<&Text>();
        query.iter(app.world()).map(|t| t.0.clone()).collect()
    }

    #[test]
    fn hud_shows_difficulty_clock_and_score() {
        let mut app = app();
        let texts = texts(&mut app);

        assert!(texts.contains(&"Medium".to_string()));
        assert!(texts.contains(&"00:45".to_string()));
        assert!(texts.contains(&"Score: 0".to_string()));
    }

    #[test]
    fn hud_follows_the_round() {
        let mut app = app();
        {
            let mut round = app.world_mut().resource_mut::<Round>();
            round.score = 120;
            round.time_left = 61;
        }
        app.update();

        let texts = texts(&mut app);
        assert!(texts.contains(&"Score: 120".to_string()));
        assert!(texts.contains(&"01:01".to_string()));
    }

    #[test]
    fn round_end_shows_the_final_score_once() {
        let mut app = app();
        let ended = RoundEnded {
            difficulty: Difficulty::Medium,
            score: 80,
        };
        app.world_mut().trigger(ended);
        app.world_mut().flush();
        app.world_mut().trigger(ended);
        app.world_mut().flush();
        app.update();

        let mut panels = app.world_mut().query_filtered::<(), With<GameOverPanel>>();
        assert_eq!(panels.iter(app.world()).count(), 1);
        assert!(texts(&mut app).contains(&"80 pts".to_string()));
    }

    #[test]
    fn leaving_the_game_clears_the_hud() {
        let mut app = app();
        app.world_mut().trigger(RoundEnded {
            difficulty: Difficulty::Medium,
            score: 0,
        });
        app.world_mut().flush();
        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Menu);
        app.update();

        assert!(texts(&mut app).is_empty());
    }
}
