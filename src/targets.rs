use bevy::prelude::*;

use crate::{
    input::Tap,
    pulse::Pulse,
    round::{RespawnRequested, Round, RoundEnded, RoundSet, TapOutcome},
    screen::{despawn_all, Screen},
    settings::Settings,
    spawn::{roll_cycle, GameRng, PlayArea},
    theme,
};

pub struct TargetsPlugin;

impl Plugin for TargetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, judge_taps_system.in_set(RoundSet::Hit))
            .add_systems(Update, respawn_system.in_set(RoundSet::Spawn))
            .add_systems(OnExit(Screen::Game), despawn_all::<Disc>)
            .add_observer(on_round_ended);
    }
}

/// The circle the player is supposed to tap. There is at most one.
#[derive(Component, Debug)]
#[require(Disc)]
pub struct Target;

/// Grey distractor around the target. Never hit-tested.
#[derive(Component, Debug)]
#[require(Disc)]
pub struct Decoy;

/// Anything drawn as a filled circle on the play field. The render plugin
/// turns this into a mesh; game logic only reads the `Transform`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub radius: f32,
    pub color: Color,
}

impl Default for Disc {
    fn default() -> Self {
        Disc {
            radius: 1.0,
            color: Color::WHITE,
        }
    }
}

fn judge_taps_system(
    mut taps: MessageReader<Tap>,
    mut round: ResMut<Round>,
    targets: Query<&Transform, With<Target>>,
    mut respawn: MessageWriter<RespawnRequested>,
) {
    let target = targets.iter().next().map(|t| t.translation.truncate());

    for tap in taps.read() {
        match round.register_tap(tap.position, target) {
            TapOutcome::Hit { points } => {
                info!("Hit! +{} (score {})", points, round.score);
                respawn.write(RespawnRequested);
                // the target moves this frame; later taps would be judged against a stale position
                break;
            }
            TapOutcome::Miss => debug!("Missed at {:?}", tap.position),
            TapOutcome::Ignored => {}
        }
    }

    // drop anything left after a hit so it isn't judged next frame
    taps.clear();
}

/// Replaces the target and every decoy with a fresh roll.
fn respawn_system(
    mut commands: Commands,
    mut requests: MessageReader<RespawnRequested>,
    round: Res<Round>,
    settings: Res<Settings>,
    area: Res<PlayArea>,
    mut rng: ResMut<GameRng>,
    existing: Query<Entity, With<Disc>>,
) {
    // several requests in one frame (hit and interval) still mean one new layout
    if requests.read().count() == 0 || !round.playing {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let cycle = roll_cycle(
        &mut rng.0,
        &round.config,
        area.0,
        &settings.spawn,
        &settings.palette_colors(),
    );

    // decoys sit one layer above the target
    commands.spawn((
        Target,
        Disc {
            radius: round.config.target_radius(1.0),
            color: cycle.color,
        },
        Transform::from_translation(cycle.target.extend(0.0)),
        Pulse::new(&settings.pulse),
    ));

    for decoy in cycle.decoys {
        commands.spawn((
            Decoy,
            Disc {
                radius: round.config.decoy_radius(),
                color: theme::DECOY,
            },
            Transform::from_translation(decoy.extend(1.0)),
        ));
    }
}

/// When time runs out the play field is cleared; only the game-over panel remains.
///
/// Observers run as soon as the triggering command is applied, which is
/// right after `round_clock_system` in the same frame. The HUD listens to the
/// same event, so both reactions land together and there is never a frame
/// showing the panel over stale circles.
fn on_round_ended(
    _ended: On<RoundEnded>,
    mut commands: Commands,
    circles: Query<Entity, With<Disc>>,
) {
    for entity in circles.iter() {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{state::app::StatesPlugin, time::TimeUpdateStrategy};

    use super::*;
    use crate::{
        difficulty::Difficulty,
        round::RoundPlugin,
        screen::{ScreenPlugin, SelectedDifficulty},
    };

    fn app(difficulty: Difficulty, settings: Settings) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, ScreenPlugin, RoundPlugin, TargetsPlugin))
            .add_message::<Tap>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<PlayArea>()
            .insert_resource(GameRng::seeded(1))
            .insert_resource(settings)
            .insert_resource(SelectedDifficulty(difficulty));
        app.update();

        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Game);
        app.update();
        app
    }

    fn target_position(app: &mut App) -> Vec2 {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<Target>>();
        let targets: Vec<Vec2> = query
            .iter(app.world())
            .map(|t| t.translation.truncate())
            .collect();
        assert_eq!(targets.len(), 1);
        targets[0]
    }

    fn count<T: Component>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<(), With<T>>();
        query.iter(app.world()).count()
    }

    fn tap(app: &mut App, position: Vec2) {
        app.world_mut().write_message(Tap { position });
        app.update();
    }

    #[test]
    fn entering_the_game_spawns_a_target_and_its_decoys() {
        let mut app = app(Difficulty::Medium, Settings::default());

        assert_eq!(count::<Target>(&mut app), 1);
        assert_eq!(count::<Decoy>(&mut app), 6);
        assert_eq!(app.world().resource::<Round>().time_left, 45);
    }

    #[test]
    fn hitting_the_target_scores_and_moves_it() {
        let mut app = app(Difficulty::Hard, Settings::default());
        let before = target_position(&mut app);

        tap(&mut app, before + Vec2::new(10.0, 0.0));

        assert_eq!(app.world().resource::<Round>().score, 30);
        assert_eq!(count::<Target>(&mut app), 1);
        assert_eq!(count::<Decoy>(&mut app), 9);
        assert_ne!(target_position(&mut app), before);
    }

    #[test]
    fn missing_leaves_everything_in_place() {
        let mut app = app(Difficulty::Easy, Settings::default());
        let before = target_position(&mut app);

        tap(&mut app, before + Vec2::new(500.0, 0.0));

        assert_eq!(app.world().resource::<Round>().score, 0);
        assert_eq!(target_position(&mut app), before);
    }

    #[test]
    fn tapping_a_decoy_is_a_miss() {
        let mut app = app(Difficulty::Easy, Settings::default());
        let target = target_position(&mut app);
        let mut decoys = app.world_mut().query_filtered::<&Transform, With<Decoy>>();
        let decoy = decoys
            .iter(app.world())
            .map(|t| t.translation.truncate())
            // decoys sit at least 160 away, so one beyond the hit radius always exists
            .find(|d| d.distance(target) >= 82.5)
            .unwrap();

        tap(&mut app, decoy);

        assert_eq!(app.world().resource::<Round>().score, 0);
    }

    #[test]
    fn only_one_hit_per_frame() {
        let mut app = app(Difficulty::Easy, Settings::default());
        let target = target_position(&mut app);

        app.world_mut().write_message(Tap { position: target });
        app.world_mut().write_message(Tap { position: target });
        app.update();
        app.update();

        assert_eq!(app.world().resource::<Round>().score, 10);
    }

    #[test]
    fn time_out_clears_the_field_and_stops_scoring() {
        let mut settings = Settings::default();
        settings.difficulties.easy.round_seconds = 1;
        let mut app = app(Difficulty::Easy, settings);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)));
        let target = target_position(&mut app);

        for _ in 0..8 {
            app.update();
        }

        let round = app.world().resource::<Round>();
        assert!(!round.playing);
        assert_eq!(round.time_left, 0);
        assert_eq!(count::<Disc>(&mut app), 0);

        tap(&mut app, target);
        assert_eq!(app.world().resource::<Round>().score, 0);
        assert_eq!(count::<Disc>(&mut app), 0);
    }

    #[test]
    fn leaving_the_game_discards_the_round() {
        let mut app = app(Difficulty::Medium, Settings::default());

        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Menu);
        app.update();

        assert!(app.world().get_resource::<Round>().is_none());
        assert_eq!(count::<Disc>(&mut app), 0);
    }
}
