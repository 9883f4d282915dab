use std::time::Duration;

use bevy::prelude::*;

use crate::{
    difficulty::{Difficulty, DifficultyConfig},
    screen::{Screen, SelectedDifficulty},
    settings::Settings,
};

pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        // The four sets run in this order every frame, and only while a round
        // exists on the game screen. Putting the run condition on the sets
        // means member systems (here and in `targets`/`input`) don't repeat
        // it, and nothing in them runs on the frame the round is removed.
        app.add_message::<RespawnRequested>()
            .configure_sets(
                Update,
                (RoundSet::Input, RoundSet::Clock, RoundSet::Hit, RoundSet::Spawn)
                    .chain()
                    .run_if(in_state(Screen::Game).and(resource_exists::<Round>)),
            )
            .add_systems(OnEnter(Screen::Game), start_round_system)
            .add_systems(Update, round_clock_system.in_set(RoundSet::Clock))
            .add_systems(OnExit(Screen::Game), end_round_system);
    }
}

/// Per-frame ordering of the game screen: taps are collected, the clock runs,
/// taps are judged, and only then are circles replaced.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundSet {
    Input,
    Clock,
    Hit,
    Spawn,
}

/// Ask for the current target and decoys to be replaced with a fresh roll.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RespawnRequested;

/// Triggered once when the countdown runs out.
///
/// This is an observer event rather than a message: the HUD panel and the
/// disc cleanup react in the same frame the clock hits zero, without a
/// reader system that has to be ordered after `round_clock_system`.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEnded {
    pub difficulty: Difficulty,
    pub score: u32,
}

/// State of the round in progress. Exists only while the game screen is open.
#[derive(Resource, Debug)]
pub struct Round {
    pub difficulty: Difficulty,
    pub config: DifficultyConfig,
    pub score: u32,
    /// Whole seconds remaining.
    pub time_left: u32,
    pub playing: bool,
    countdown: Timer,
    spawn_timer: Timer,
}

/// What happened during one `Round::tick`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundTick {
    pub seconds_elapsed: u32,
    pub respawns: u32,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Hit { points: u32 },
    Miss,
    /// The round is over or nothing is on screen yet.
    Ignored,
}

impl Round {
    pub fn new(difficulty: Difficulty, config: DifficultyConfig) -> Self {
        Round {
            difficulty,
            score: 0,
            time_left: config.round_seconds,
            playing: true,
            countdown: Timer::from_seconds(1.0, TimerMode::Repeating),
            spawn_timer: Timer::new(config.spawn_period(), TimerMode::Repeating),
            config,
        }
    }

    /// Advances both timers. The countdown is checked first: once it reaches
    /// zero the round stops and no more respawns are reported.
    pub fn tick(&mut self, delta: Duration) -> RoundTick {
        if !self.playing {
            return RoundTick::default();
        }

        let mut tick = RoundTick::default();

        self.countdown.tick(delta);
        let seconds = self.countdown.times_finished_this_tick().min(self.time_left);
        self.time_left -= seconds;
        tick.seconds_elapsed = seconds;

        if self.time_left == 0 {
            self.playing = false;
            tick.finished = true;
            return tick;
        }

        self.spawn_timer.tick(delta);
        tick.respawns = self.spawn_timer.times_finished_this_tick();
        tick
    }

    /// Judges a tap against the current target centre. A hit adds the
    /// difficulty's points; the spawn timer keeps running either way.
    pub fn register_tap(&mut self, tap: Vec2, target: Option<Vec2>) -> TapOutcome {
        let Some(target) = target else {
            return TapOutcome::Ignored;
        };
        if !self.playing {
            return TapOutcome::Ignored;
        }

        if is_hit(tap, target, self.config.hit_radius()) {
            // a huge `points` from the settings file must not wrap or panic
            self.score = self.score.saturating_add(self.config.points);
            TapOutcome::Hit {
                points: self.config.points,
            }
        } else {
            TapOutcome::Miss
        }
    }

    pub fn end(&mut self) {
        self.playing = false;
    }

    /// Remaining time as `MM:SS`.
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }
}

/// Strictly inside the radius counts; exactly on the edge does not.
pub fn is_hit(tap: Vec2, center: Vec2, radius: f32) -> bool {
    tap.distance(center) < radius
}

pub fn start_round_system(
    mut commands: Commands,
    selected: Res<SelectedDifficulty>,
    settings: Res<Settings>,
    mut respawn: MessageWriter<RespawnRequested>,
) {
    let difficulty = selected.0;
    let config = settings.difficulties.get(difficulty).clone();
    info!(
        "Starting {} round: {}s, {} decoys, {} points per hit",
        difficulty.label(),
        config.round_seconds,
        config.decoys,
        config.points
    );

    commands.insert_resource(Round::new(difficulty, config));
    // first target appears right away, not after the first interval
    respawn.write(RespawnRequested);
}

fn round_clock_system(
    mut commands: Commands,
    time: Res<Time>,
    mut round: ResMut<Round>,
    mut respawn: MessageWriter<RespawnRequested>,
) {
    let tick = round.tick(time.delta());

    if tick.finished {
        info!(
            "{} round over, final score {}",
            round.difficulty.label(),
            round.score
        );
        commands.trigger(RoundEnded {
            difficulty: round.difficulty,
            score: round.score,
        });
    } else if tick.respawns > 0 {
        // a long frame can cover several intervals, one fresh layout is enough
        respawn.write(RespawnRequested);
    }
}

fn end_round_system(mut commands: Commands, round: Option<ResMut<Round>>) {
    if let Some(mut round) = round {
        if round.playing {
            info!(
                "Left {} round early with {} points and {}s remaining",
                round.difficulty.label(),
                round.score,
                round.time_left
            );
        }
        round.end();
    }
    commands.remove_resource::<Round>();
}
