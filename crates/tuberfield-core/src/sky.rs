//! Day/night and rain generator driving environmental events.
//!
//! The sky advances in discrete steps (one per `sky.step_ms` in the session
//! runner). Each step:
//!
//! 1. Counts toward the day/night flip, which happens every
//!    `half_day_steps` steps.
//! 2. Counts down an active shower; rain stops when it reaches zero.
//! 3. Counts down to the next rain check. At a check, if it is not already
//!    raining, rain starts with probability `rain_chance` and lasts a
//!    uniformly drawn number of steps. The next check is then scheduled.
//!
//! [`SkySimulator::step`] returns the new [`EnvironmentalEffects`] only
//! when something changed, which is when the engine should be told.

use tuberfield_soil::NoiseSource;
use tuberfield_types::EnvironmentalEffects;

use crate::config::SkyConfig;

/// Discrete-step sky state.
pub struct SkySimulator {
    config: SkyConfig,
    noise: Box<dyn NoiseSource>,
    effects: EnvironmentalEffects,
    steps: u64,
    steps_in_half_day: u32,
    rain_steps_left: u32,
    steps_until_rain_check: u32,
}

impl SkySimulator {
    /// Create a sky starting at dry daytime.
    pub fn new(config: SkyConfig, mut noise: Box<dyn NoiseSource>) -> Self {
        let steps_until_rain_check =
            noise.between(config.rain_check_min_steps, config.rain_check_max_steps);
        Self {
            config,
            noise,
            effects: EnvironmentalEffects::default(),
            steps: 0,
            steps_in_half_day: 0,
            rain_steps_left: 0,
            steps_until_rain_check,
        }
    }

    /// Current sky conditions.
    pub const fn effects(&self) -> EnvironmentalEffects {
        self.effects
    }

    /// Real-time milliseconds between steps.
    pub const fn step_interval_ms(&self) -> u64 {
        self.config.step_ms
    }

    /// Steps taken so far.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance one step. Returns the new conditions if they changed.
    pub fn step(&mut self) -> Option<EnvironmentalEffects> {
        let before = self.effects;
        self.steps = self.steps.saturating_add(1);

        self.steps_in_half_day = self.steps_in_half_day.saturating_add(1);
        if self.steps_in_half_day >= self.config.half_day_steps.max(1) {
            self.steps_in_half_day = 0;
            self.effects.is_day_time = !self.effects.is_day_time;
        }

        if self.effects.is_raining {
            self.rain_steps_left = self.rain_steps_left.saturating_sub(1);
            if self.rain_steps_left == 0 {
                self.effects.is_raining = false;
            }
        }

        self.steps_until_rain_check = self.steps_until_rain_check.saturating_sub(1);
        if self.steps_until_rain_check == 0 {
            self.rain_check();
        }

        (self.effects != before).then_some(self.effects)
    }

    fn rain_check(&mut self) {
        if !self.effects.is_raining && self.noise.chance(self.config.rain_chance) {
            self.effects.is_raining = true;
            self.rain_steps_left = self
                .noise
                .between(self.config.rain_min_steps, self.config.rain_max_steps)
                .max(1);
        }
        self.steps_until_rain_check = self
            .noise
            .between(self.config.rain_check_min_steps, self.config.rain_check_max_steps)
            .max(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tuberfield_soil::{RngNoise, StillNoise};

    use super::*;

    /// Rain always starts; ranges resolve to their lower edge.
    struct AlwaysRain;

    impl NoiseSource for AlwaysRain {
        fn chance(&mut self, _probability: f64) -> bool {
            true
        }
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
        fn spread(&mut self, _amplitude: f64) -> f64 {
            0.0
        }
        fn between(&mut self, low: u32, _high: u32) -> u32 {
            low
        }
    }

    fn steps(sky: &mut SkySimulator, count: u32) -> Vec<(u64, EnvironmentalEffects)> {
        (0..count)
            .filter_map(|_| sky.step().map(|effects| (sky.steps(), effects)))
            .collect()
    }

    #[test]
    fn starts_dry_and_sunny() {
        let sky = SkySimulator::new(SkyConfig::default(), Box::new(StillNoise));
        assert_eq!(sky.effects(), EnvironmentalEffects::default());
    }

    #[test]
    fn day_and_night_alternate_every_half_day() {
        let mut sky = SkySimulator::new(SkyConfig::default(), Box::new(StillNoise));
        let changes = steps(&mut sky, 20);
        let flips: Vec<(u64, bool)> = changes
            .iter()
            .map(|(step, effects)| (*step, effects.is_day_time))
            .collect();
        assert_eq!(flips, vec![(5, false), (10, true), (15, false), (20, true)]);
        assert!(changes.iter().all(|(_, effects)| !effects.is_raining));
    }

    #[test]
    fn rain_starts_at_check_and_lasts_its_duration() {
        let config = SkyConfig {
            half_day_steps: 1_000,
            ..SkyConfig::default()
        };
        let mut sky = SkySimulator::new(config, Box::new(AlwaysRain));
        let changes = steps(&mut sky, 40);
        // First check after 15 steps, shower of 3 steps, next check 15 later.
        assert_eq!(
            changes.iter().map(|(step, e)| (*step, e.is_raining)).collect::<Vec<_>>(),
            vec![(15, true), (18, false), (30, true), (33, false)]
        );
    }

    #[test]
    fn no_change_means_no_event() {
        let mut sky = SkySimulator::new(SkyConfig::default(), Box::new(StillNoise));
        for _ in 0..4 {
            assert_eq!(sky.step(), None);
        }
        assert!(sky.step().is_some());
    }

    #[test]
    fn random_rain_windows_respect_configuration() {
        let config = SkyConfig::default();
        let mut sky = SkySimulator::new(
            config.clone(),
            Box::new(RngNoise::new(StdRng::seed_from_u64(21))),
        );
        let mut rain_started = None;
        let mut showers = 0_u32;
        for _ in 0..5_000 {
            let was_raining = sky.effects().is_raining;
            let _ = sky.step();
            let raining = sky.effects().is_raining;
            if raining && !was_raining {
                rain_started = Some(sky.steps());
            }
            if was_raining && !raining {
                let start = rain_started.unwrap();
                let length = sky.steps() - start;
                assert!(
                    (u64::from(config.rain_min_steps)..=u64::from(config.rain_max_steps))
                        .contains(&length),
                    "shower lasted {length} steps"
                );
                showers += 1;
            }
        }
        assert!(showers > 0, "expected at least one shower in 5000 steps");
    }
}
