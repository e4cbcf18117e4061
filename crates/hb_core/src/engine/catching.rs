//! Catch and interception success models.
//!
//! A routine play with margin to spare is automatic; the roll only enters on
//! the edge of the glove. A catchable ball that is missed is an error; a
//! hot grounder through the wickets is a hit.

use rand::Rng;

use crate::engine::physics_constants::ground;
use crate::models::DefenseSkill;

/// How the glove got to the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatchKind {
    /// Settled under it with time to spare.
    Standard,
    /// Arrived on the dead run as the ball came down.
    Running,
    /// Laid out for a ball past the reach envelope.
    Diving,
}

/// Spare seconds at the landing spot that make an air catch routine.
pub const SETTLE_TIME_S: f32 = 0.3;

/// Extra meters past glove reach coverable on the dead run.
pub const RUNNING_REACH_EXTRA_M: f32 = 1.5;

/// Dive envelope past the running reach (m).
pub const DIVING_REACH_EXTRA_M: f32 = 1.5;

/// Standard catches miss only on the last sliver of margin.
const STANDARD_EDGE_MISS: f32 = 0.03;

/// Running catch: 0.65 + up to 0.30 from the fielding rating.
const RUNNING_BASE: f32 = 0.65;
const RUNNING_SKILL_RANGE: f32 = 0.003;

/// Diving catch: 0.15 + up to 0.30 from the fielding rating.
const DIVING_BASE: f32 = 0.15;
const DIVING_SKILL_RANGE: f32 = 0.003;

/// Ground intercept: hot-ball penalty per m/s above the hot threshold,
/// floored, plus a small penalty at the edge of the reach envelope.
const GROUND_HOT_PENALTY_PER_MPS: f32 = 0.012;
const GROUND_HOT_FLOOR: f32 = 0.80;
const GROUND_REACH_EDGE_PENALTY: f32 = 0.08;

/// Success probability for an air ball.
///
/// `margin_s` is how long the fielder was camped before the ball arrived.
pub fn air_catch_probability(kind: CatchKind, skill: &DefenseSkill, margin_s: f32) -> f32 {
    match kind {
        CatchKind::Standard => {
            if margin_s >= SETTLE_TIME_S {
                1.0
            } else {
                // Margin-dependent edge: the closer to zero, the more a
                // late glove can clank it.
                1.0 - STANDARD_EDGE_MISS * (1.0 - (margin_s / SETTLE_TIME_S).clamp(0.0, 1.0))
            }
        }
        CatchKind::Running => (RUNNING_BASE + RUNNING_SKILL_RANGE * skill.fielding as f32).min(0.98),
        CatchKind::Diving => (DIVING_BASE + DIVING_SKILL_RANGE * skill.fielding as f32).min(0.60),
    }
}

/// Classify an air catch attempt by how far the landing sits from the glove.
///
/// Returns `None` when the ball is beyond even a dive.
pub fn classify_air_attempt(
    distance_at_landing_m: f32,
    reach_m: f32,
    settled_margin_s: f32,
) -> Option<CatchKind> {
    if distance_at_landing_m <= reach_m {
        if settled_margin_s >= SETTLE_TIME_S {
            Some(CatchKind::Standard)
        } else {
            Some(CatchKind::Running)
        }
    } else if distance_at_landing_m <= reach_m + RUNNING_REACH_EXTRA_M {
        Some(CatchKind::Running)
    } else if distance_at_landing_m <= reach_m + RUNNING_REACH_EXTRA_M + DIVING_REACH_EXTRA_M {
        Some(CatchKind::Diving)
    } else {
        None
    }
}

/// Success probability for gloving a rolling ball at the intercept point.
///
/// `reach_fraction_used` is how much of the reach envelope the play needed
/// (1.0 = full extension).
pub fn ground_intercept_probability(
    skill: &DefenseSkill,
    ball_speed_mps: f32,
    reach_fraction_used: f32,
) -> f32 {
    let mut p = 1.0 - STANDARD_EDGE_MISS * (skill.fielding as f32 / 100.0 - 1.0).abs();
    if ball_speed_mps > ground::HOT_SPEED_MPS {
        p -= GROUND_HOT_PENALTY_PER_MPS * (ball_speed_mps - ground::HOT_SPEED_MPS);
        p = p.max(GROUND_HOT_FLOOR);
    }
    if reach_fraction_used > 0.8 {
        p -= GROUND_REACH_EDGE_PENALTY * ((reach_fraction_used - 0.8) / 0.2).clamp(0.0, 1.0);
    }
    p.clamp(0.5, 1.0)
}

/// Whether a missed ball was catchable enough to charge an error.
///
/// Standard-reach misses are errors. Running and diving misses are scored as
/// hits, and so is any hot grounder through the wickets.
pub fn miss_is_error(kind: CatchKind) -> bool {
    matches!(kind, CatchKind::Standard)
}

pub fn ground_miss_is_error(ball_speed_mps: f32) -> bool {
    ball_speed_mps < ground::HOT_SPEED_MPS
}

/// Roll an attempt.
pub fn roll<R: Rng>(probability: f32, rng: &mut R) -> bool {
    if probability >= 1.0 {
        return true;
    }
    rng.gen::<f32>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(fielding: u8) -> DefenseSkill {
        DefenseSkill { fielding, ..Default::default() }
    }

    #[test]
    fn test_settled_catch_is_automatic() {
        assert_eq!(air_catch_probability(CatchKind::Standard, &skill(10), 0.5), 1.0);
    }

    #[test]
    fn test_running_catch_rewards_glove() {
        let bad = air_catch_probability(CatchKind::Running, &skill(10), 0.0);
        let good = air_catch_probability(CatchKind::Running, &skill(95), 0.0);
        assert!((bad - 0.68).abs() < 0.01);
        assert!((good - 0.935).abs() < 0.01);
    }

    #[test]
    fn test_diving_catch_is_a_gamble() {
        let p = air_catch_probability(CatchKind::Diving, &skill(50), 0.0);
        assert!((p - 0.30).abs() < 0.01);
        assert!(air_catch_probability(CatchKind::Diving, &skill(100), 0.0) <= 0.60);
    }

    #[test]
    fn test_attempt_classification_envelopes() {
        let reach = 0.8;
        assert_eq!(classify_air_attempt(0.5, reach, 1.0), Some(CatchKind::Standard));
        assert_eq!(classify_air_attempt(0.5, reach, 0.0), Some(CatchKind::Running));
        assert_eq!(classify_air_attempt(1.9, reach, 0.0), Some(CatchKind::Running));
        assert_eq!(classify_air_attempt(3.0, reach, 0.0), Some(CatchKind::Diving));
        assert_eq!(classify_air_attempt(4.5, reach, 0.0), None);
    }

    #[test]
    fn test_hot_grounder_penalty_floors() {
        let s = skill(50);
        let soft = ground_intercept_probability(&s, 12.0, 0.3);
        let hot = ground_intercept_probability(&s, 28.0, 0.3);
        let scorched = ground_intercept_probability(&s, 45.0, 0.3);
        assert!(soft > 0.95);
        assert!(hot < soft);
        assert!(scorched >= GROUND_HOT_FLOOR - 1e-6);
    }

    #[test]
    fn test_reach_edge_penalty() {
        let s = skill(50);
        let comfortable = ground_intercept_probability(&s, 10.0, 0.2);
        let stretched = ground_intercept_probability(&s, 10.0, 1.0);
        assert!(comfortable - stretched > 0.05);
    }

    #[test]
    fn test_error_charging_rules() {
        assert!(miss_is_error(CatchKind::Standard));
        assert!(!miss_is_error(CatchKind::Running));
        assert!(!miss_is_error(CatchKind::Diving));
        assert!(ground_miss_is_error(15.0));
        assert!(!ground_miss_is_error(25.0));
    }
}
