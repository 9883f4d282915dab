use std::time::Duration;

use bevy::prelude::*;

use crate::settings::PulseSettings;

pub struct PulsePlugin;

impl Plugin for PulsePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, pulse_system);
    }
}

/// Makes an entity breathe: its scale eases from `min` to `max`, then back,
/// forever. Used on the target so it "flashes" between spawns.
#[derive(Component, Debug, Clone)]
pub struct Pulse {
    pub min: f32,
    pub max: f32,
    pub timer: Timer,
    pub growing: bool,
}

impl Pulse {
    pub fn new(settings: &PulseSettings) -> Self {
        Pulse {
            min: settings.min_scale,
            max: settings.max_scale,
            timer: Timer::new(half_period(settings), TimerMode::Repeating),
            growing: true,
        }
    }

    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.timer.tick(delta);

        // every completed half period reverses direction
        if self.timer.times_finished_this_tick() % 2 == 1 {
            self.growing = !self.growing;
        }

        self.scale()
    }

    pub fn scale(&self) -> f32 {
        let eased_t = EaseFunction::SineInOut.sample_clamped(self.timer.fraction());
        if self.growing {
            self.min + (self.max - self.min) * eased_t
        } else {
            self.max - (self.max - self.min) * eased_t
        }
    }
}

fn half_period(settings: &PulseSettings) -> Duration {
    let millis = (settings.half_period * 1000.0).round();
    if millis.is_finite() && millis >= 1.0 {
        Duration::from_millis(millis as u64)
    } else {
        Duration::from_millis(1)
    }
}

fn pulse_system(mut query: Query<(&mut Transform, &mut Pulse)>, time: Res<Time>) {
    for (mut transform, mut pulse) in query.iter_mut() {
        let scale = pulse.advance(time.delta());
        transform.scale = Vec3::new(scale, scale, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse() -> Pulse {
        Pulse::new(&PulseSettings::default())
    }

    #[test]
    fn starts_small_and_grows() {
        let mut pulse = pulse();
        assert_eq!(pulse.scale(), 0.9);

        let halfway = pulse.advance(Duration::from_millis(300));
        assert!((halfway - 1.15).abs() < 1e-4, "{halfway}");
    }

    #[test]
    fn reverses_at_the_peak() {
        let mut pulse = pulse();

        let peak = pulse.advance(Duration::from_millis(600));
        assert!(!pulse.growing);
        assert!((peak - 1.4).abs() < 1e-4, "{peak}");

        let shrinking = pulse.advance(Duration::from_millis(300));
        assert!(shrinking < 1.4 && shrinking > 0.9);
    }

    #[test]
    fn always_within_bounds() {
        let mut pulse = pulse();
        for _ in 0..200 {
            let scale = pulse.advance(Duration::from_millis(37));
            assert!((0.9 - 1e-4..=1.4 + 1e-4).contains(&scale), "{scale}");
        }
    }

    #[test]
    fn two_half_periods_in_one_frame_keep_direction() {
        let mut pulse = pulse();
        pulse.advance(Duration::from_millis(1200));
        assert!(pulse.growing);
    }

    #[test]
    fn system_writes_the_transform_scale() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, PulsePlugin));
        let entity = app
            .world_mut()
            .spawn((Transform::default(), pulse()))
            .id();

        app.update();

        let scale = app.world().get::<Transform>(entity).unwrap().scale;
        assert_eq!(scale.z, 1.0);
        assert!(scale.x >= 0.9 && scale.x <= 1.4);
        assert_eq!(scale.x, scale.y);
    }
}
