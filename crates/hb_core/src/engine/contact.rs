//! Contact model: batter + pitcher attributes → a sampled `BattedBall`.
//!
//! Intent plus error: the swing has an intended spray/launch profile and the
//! matchup perturbs it with Gaussian noise, the same shape the execution-error
//! model gives every action.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::engine::trajectory::BattedBall;
use crate::models::{BattingAttributes, Handedness, Pitch, PitchingAttributes};

/// Spray direction means (degrees from the left-field line).
const PULL_MEAN_RIGHT_DEG: f32 = 38.0;
const PULL_MEAN_LEFT_DEG: f32 = 52.0;

/// Extra pull per unit of power above average (degrees).
const POWER_PULL_BIAS_DEG: f32 = 10.0;

/// Spray spread for a ball kept in play (degrees).
const DIRECTION_SIGMA_DEG: f32 = 18.0;
/// Spread for a spoiled swing sliced or hooked foul (degrees).
const DIRECTION_FOUL_SIGMA_DEG: f32 = 38.0;

const DIRECTION_MIN_DEG: f32 = -45.0;
const DIRECTION_MAX_DEG: f32 = 135.0;

/// Launch angle base and spreads (degrees).
const LAUNCH_BASE_DEG: f32 = 4.0;
const LAUNCH_POWER_RANGE_DEG: f32 = 16.0;
const LAUNCH_CONTACT_TILT_DEG: f32 = 6.0;
const LAUNCH_SIGMA_DEG: f32 = 16.0;
const LAUNCH_MIN_DEG: f32 = -15.0;
const LAUNCH_MAX_DEG: f32 = 70.0;

/// Launch-angle offset per trajectory class 1..=4.
const TRAJECTORY_OFFSET_DEG: [f32; 4] = [-3.0, 0.0, 3.0, 6.0];

/// Sinking pitches drag the launch angle down per break level (degrees).
const SINKER_BIAS_PER_LEVEL_DEG: f32 = 0.9;

/// Exit velocity base and spreads (km/h).
const EXIT_BASE_KMH: f32 = 128.0;
const EXIT_POWER_RANGE_KMH: f32 = 40.0;
const EXIT_CONTACT_TILT_KMH: f32 = 25.0;
const EXIT_BREAKING_PENALTY_KMH: f32 = 12.0;
const EXIT_SIGMA_KMH: f32 = 18.0;
const EXIT_MIN_KMH: f32 = 60.0;
const EXIT_MAX_KMH: f32 = 185.0;

/// The pitch as it arrived, from the pre-contact phase.
#[derive(Debug, Clone, Copy)]
pub struct ContactPitch {
    pub pitch: Pitch,
    /// Effective break quality 0.0..=1.0 after fatigue.
    pub break_quality: f32,
    /// Sinking action 0.0..=1.0 (sinker / fork family only).
    pub sink: f32,
}

impl ContactPitch {
    pub fn from_repertoire(pitch: Pitch, pitching: &PitchingAttributes) -> Self {
        let level01 = pitch.level as f32 / 7.0;
        Self {
            pitch,
            break_quality: if pitch.kind.is_breaking() { level01 } else { 0.0 },
            sink: if pitch.kind.is_sinking() {
                pitching.sinker_level() as f32 / 7.0
            } else {
                0.0
            },
        }
    }
}

/// Sample a batted ball for an in-play swing.
pub fn sample_batted_ball<R: Rng>(
    batter: &BattingAttributes,
    bats: Handedness,
    pitch: &ContactPitch,
    rng: &mut R,
) -> BattedBall {
    let direction = sample_direction(batter, bats, DIRECTION_SIGMA_DEG, rng);
    let launch = sample_launch_angle(batter, pitch, rng);
    let exit = sample_exit_velocity(batter, pitch, rng);
    BattedBall::new(direction, launch, exit)
}

/// Re-sample a ball that went foul, pinched into fair territory.
///
/// The at-bat unit has no count to extend, so a second foul turns into the
/// same swing forced fair.
pub fn resample_fair<R: Rng>(
    batter: &BattingAttributes,
    bats: Handedness,
    pitch: &ContactPitch,
    rng: &mut R,
) -> BattedBall {
    let direction = sample_direction(batter, bats, DIRECTION_SIGMA_DEG, rng).clamp(2.0, 88.0);
    let launch = sample_launch_angle(batter, pitch, rng);
    let exit = sample_exit_velocity(batter, pitch, rng);
    BattedBall::new(direction, launch, exit)
}

/// Sample a deliberately spoiled swing: the wide spray cone that hooks and
/// slices balls out of play.
pub fn sample_spoiled<R: Rng>(
    batter: &BattingAttributes,
    bats: Handedness,
    pitch: &ContactPitch,
    rng: &mut R,
) -> BattedBall {
    let direction = sample_direction(batter, bats, DIRECTION_FOUL_SIGMA_DEG, rng);
    let launch = sample_launch_angle(batter, pitch, rng);
    let exit = sample_exit_velocity(batter, pitch, rng);
    BattedBall::new(direction, launch, exit)
}

fn sample_direction<R: Rng>(
    batter: &BattingAttributes,
    bats: Handedness,
    sigma: f32,
    rng: &mut R,
) -> f32 {
    let power01 = batter.power as f32 / 100.0;
    let pull_bias = POWER_PULL_BIAS_DEG * (power01 - 0.5) * 2.0;
    let mean = match bats {
        // Right-handed pull runs toward left field (smaller degrees).
        Handedness::Right => PULL_MEAN_RIGHT_DEG - pull_bias,
        Handedness::Left => PULL_MEAN_LEFT_DEG + pull_bias,
    };
    gaussian(mean, sigma, rng).clamp(DIRECTION_MIN_DEG, DIRECTION_MAX_DEG)
}

fn sample_launch_angle<R: Rng>(
    batter: &BattingAttributes,
    pitch: &ContactPitch,
    rng: &mut R,
) -> f32 {
    let power01 = batter.power as f32 / 100.0;
    let contact01 = batter.contact as f32 / 100.0;
    let mean = LAUNCH_BASE_DEG
        + LAUNCH_POWER_RANGE_DEG * power01
        - LAUNCH_CONTACT_TILT_DEG * (contact01 - 0.5)
        + TRAJECTORY_OFFSET_DEG[batter.trajectory_class()]
        - SINKER_BIAS_PER_LEVEL_DEG * 7.0 * pitch.sink;
    gaussian(mean, LAUNCH_SIGMA_DEG, rng).clamp(LAUNCH_MIN_DEG, LAUNCH_MAX_DEG)
}

fn sample_exit_velocity<R: Rng>(
    batter: &BattingAttributes,
    pitch: &ContactPitch,
    rng: &mut R,
) -> f32 {
    let power01 = batter.power as f32 / 100.0;
    let contact01 = batter.contact as f32 / 100.0;
    let mean = EXIT_BASE_KMH
        + EXIT_POWER_RANGE_KMH * (power01 - 0.5)
        + EXIT_CONTACT_TILT_KMH * (contact01 - 0.5)
        - EXIT_BREAKING_PENALTY_KMH * pitch.break_quality;
    gaussian(mean, EXIT_SIGMA_KMH, rng).clamp(EXIT_MIN_KMH, EXIT_MAX_KMH)
}

fn gaussian<R: Rng>(mean: f32, sigma: f32, rng: &mut R) -> f32 {
    // Normal::new only fails on non-finite sigma; ours are compile-time.
    match Normal::new(mean, sigma) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}
