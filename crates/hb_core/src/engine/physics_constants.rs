//! Physics constants for at-bat resolution.
//!
//! Every value here is part of the engine's behavioral contract: changing one
//! changes simulated outcomes, so none of them are runtime-tunable.

/// Ballistic flight constants.
pub mod flight {
    /// Gravity (m/s²).
    pub const GRAVITY_MPS2: f32 = 9.8;

    /// Contact height above the plate (m).
    pub const BAT_HEIGHT_M: f32 = 1.2;

    /// Horizontal drag correction applied to the undragged carry distance.
    pub const DRAG_FACTOR: f32 = 0.63;

    /// Flight-time compression relative to the undragged parabola.
    pub const FLIGHT_TIME_FACTOR: f32 = 0.85;

    /// Carry multiplier per batter trajectory class (1..=4).
    /// Applied only when judging the fence, never to the fielding play.
    pub const TRAJECTORY_CARRY: [f32; 4] = [1.02, 1.12, 1.17, 1.22];

    /// Fraction of horizontal speed kept after the first bounce of an
    /// uncaught air ball.
    pub const LANDING_ROLL_SPEED_FACTOR: f32 = 0.30;

    /// How long an uncaught air ball keeps rolling after landing (s).
    pub const LANDING_ROLL_TIME_S: f32 = 2.0;

    /// km/h → m/s.
    #[inline]
    pub fn kmh_to_mps(kmh: f32) -> f32 {
        kmh / 3.6
    }
}

/// Outfield fence geometry.
pub mod fence {
    /// Fence distance on both foul lines (m).
    pub const BASE_M: f32 = 100.0;

    /// Extra fence depth at dead center (m).
    pub const CENTER_EXTRA_M: f32 = 22.0;

    /// Fence height, uniform around the arc (m).
    pub const HEIGHT_M: f32 = 4.0;

    /// Fair territory spans direction 0° (left-field line) to 90°
    /// (right-field line); 45° is dead center.
    pub const FAIR_MIN_DEG: f32 = 0.0;
    pub const FAIR_MAX_DEG: f32 = 90.0;

    /// Fence distance as a function of spray direction (degrees).
    ///
    /// Both lines are 100 m; center is 122 m.
    #[inline]
    pub fn distance_m(direction_deg: f32) -> f32 {
        BASE_M + CENTER_EXTRA_M * (direction_deg * std::f32::consts::PI / 90.0).sin()
    }

    #[inline]
    pub fn is_fair(direction_deg: f32) -> bool {
        (FAIR_MIN_DEG..=FAIR_MAX_DEG).contains(&direction_deg)
    }
}

/// Base path geometry.
pub mod bases {
    /// Distance between consecutive bases (m).
    pub const BASE_LENGTH_M: f32 = 27.4;

    /// Base coordinates: home at the origin, +y toward center field,
    /// +x toward the first-base side.
    pub const HOME: (f32, f32) = (0.0, 0.0);
    pub const FIRST: (f32, f32) = (19.4, 19.4);
    pub const SECOND: (f32, f32) = (0.0, 38.8);
    pub const THIRD: (f32, f32) = (-19.4, 19.4);
}

/// Ground-ball roll model (uniform deceleration profile).
pub mod ground {
    /// Hard cap on ground-ball travel (m).
    pub const MAX_ROLL_CAP_M: f32 = 55.0;

    /// Roll distance per m/s of exit speed before the cap.
    pub const ROLL_VELOCITY_FACTOR: f32 = 1.2;

    /// Average speed over the roll as a fraction of exit speed.
    /// stop_time = distance / (v * AVG_SPEED_RATIO).
    pub const AVG_SPEED_RATIO: f32 = 0.5;

    /// Launch angle at which a chopped ball loses all carry (deg, negative).
    pub const FULL_LOSS_ANGLE_DEG: f32 = -30.0;

    /// Maximum carry loss for low positive launch angles (0°..10°).
    pub const LOW_ANGLE_MAX_LOSS: f32 = 0.15;

    /// Launch angle above which no bounce attenuation applies (deg).
    pub const LOW_ANGLE_FREE_DEG: f32 = 10.0;

    /// Ball speed above which an intercept is penalized (m/s).
    pub const HOT_SPEED_MPS: f32 = 20.0;
}

/// Fielder motion and perception parameters (stat → physics mapping).
pub mod fielder {
    /// Sprint speed at speed=0 (m/s).
    pub const MAX_SPEED_BASE: f32 = 6.5;
    /// Extra sprint speed at speed=100 (m/s).
    pub const MAX_SPEED_RANGE: f32 = 2.25;

    /// Reaction delay at awareness=0 (s).
    pub const REACTION_BASE_S: f32 = 0.50;
    /// Reaction delay removed per awareness point (s).
    pub const REACTION_PER_POINT_S: f32 = 0.004;

    /// Time to reach full sprint from standstill (s).
    pub const ACCEL_TIME_S: f32 = 0.5;

    /// Speed fraction available while still reading the ball.
    pub const REACTING_SPEED_FACTOR: f32 = 0.2;

    /// Glove reach at fielding=0 (m).
    pub const CATCH_REACH_BASE_M: f32 = 0.45;
    /// Extra reach at fielding=100 (m).
    pub const CATCH_REACH_RANGE_M: f32 = 0.70;

    /// Standing catch ceiling (m): above this the ball is not yet playable.
    pub const STANDING_REACH_M: f32 = 2.5;

    /// Landing-estimate noise for a ball that never leaves the ground (m).
    pub const PERCEPTION_SIGMA_BASE_M: f32 = 12.0;
    /// Exponential decay of that noise per meter of peak height.
    pub const PERCEPTION_SIGMA_DECAY: f32 = 0.09;

    /// 0..=100 stat → 0.0..=1.0.
    #[inline]
    pub fn n100(v: u8) -> f32 {
        (v as f32 / 100.0).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn max_speed_mps(speed: u8) -> f32 {
        MAX_SPEED_BASE + MAX_SPEED_RANGE * n100(speed)
    }

    #[inline]
    pub fn catch_reach_m(fielding: u8) -> f32 {
        CATCH_REACH_BASE_M + CATCH_REACH_RANGE_M * n100(fielding)
    }

    #[inline]
    pub fn reaction_s(awareness: u8) -> f32 {
        (REACTION_BASE_S - REACTION_PER_POINT_S * awareness as f32).max(0.0)
    }

    #[inline]
    pub fn perception_sigma_m(max_height_m: f32) -> f32 {
        PERCEPTION_SIGMA_BASE_M * (-PERCEPTION_SIGMA_DECAY * max_height_m).exp()
    }
}

/// Throwing, securing and transfer times.
pub mod throws {
    /// Throw speed at arm=0 (m/s).
    pub const SPEED_BASE_MPS: f32 = 30.0;
    /// Extra throw speed at arm=100 (m/s).
    pub const SPEED_RANGE_MPS: f32 = 20.0;

    /// Secure time on a moving intercept: 0.20 + 0.20·(1 − fielding).
    pub const SECURE_BASE_S: f32 = 0.20;
    pub const SECURE_RANGE_S: f32 = 0.20;

    /// Secure time on a stopped ball: 0.15 + 0.15·(1 − fielding).
    pub const SECURE_STOPPED_BASE_S: f32 = 0.15;
    pub const SECURE_STOPPED_RANGE_S: f32 = 0.15;

    /// Glove-to-hand transfer: 0.25 + 0.15·(1 − arm).
    pub const TRANSFER_BASE_S: f32 = 0.25;
    pub const TRANSFER_RANGE_S: f32 = 0.15;

    /// Outfield pickup of a dead ball: 0.3 + 0.4·(1 − catching).
    pub const PICKUP_BASE_S: f32 = 0.3;
    pub const PICKUP_RANGE_S: f32 = 0.4;

    #[inline]
    pub fn speed_mps(arm: u8) -> f32 {
        SPEED_BASE_MPS + SPEED_RANGE_MPS * super::fielder::n100(arm)
    }
}

/// Baserunning speeds and race margins.
pub mod race {
    /// Runner sprint speed at speed=0 (m/s).
    pub const RUNNER_SPEED_BASE: f32 = 6.5;
    /// Extra sprint speed at speed=100 (m/s).
    pub const RUNNER_SPEED_RANGE: f32 = 2.5;

    /// Batter launch-out-of-the-box delay on a grounder (s).
    pub const BOX_DELAY_S: f32 = 0.65;

    /// Runner jump delay once a hit is clearly down (s).
    pub const HIT_JUMP_DELAY_S: f32 = 0.3;

    /// Defense must beat the runner to second by this much to hold a double.
    pub const DOUBLE_MARGIN_S: f32 = 0.3;

    /// Additional margin required to stretch to third.
    pub const TRIPLE_MARGIN_S: f32 = 0.9;

    /// Tag-up margin required to send the runner from third.
    pub const TAG_UP_MARGIN_S: f32 = 0.3;

    /// Double-play pivot base success rate.
    pub const DP_BASE: f32 = 0.65;
    /// Pivot bonus against the slowest batters.
    pub const DP_SLOWNESS_BONUS: f32 = 0.15;

    /// Uncaught balls landing short of this never clear a single (m).
    pub const SHORT_LANDING_SINGLE_CAP_M: f32 = 25.0;

    /// Lead runner's jump off the bag on a force (s).
    pub const FORCE_RUNNER_DELAY_S: f32 = 0.5;

    /// Runner's first step after tagging on a catch (s).
    pub const TAG_UP_JUMP_S: f32 = 0.2;

    /// Pivot man's catch-and-rethrow at the keystone (s).
    pub const PIVOT_TRANSFER_S: f32 = 0.35;

    /// Receive-and-tag allowance at a base on a throw-behind (s).
    pub const TAG_RECEIVE_S: f32 = 0.4;

    /// Cutoff handling, receive and tag allowance on throws to the plate (s).
    pub const PLATE_RELAY_ALLOWANCE_S: f32 = 1.8;

    /// Re-gather time after a bobbled or dropped ball (s).
    pub const RECOVER_S: f32 = 0.6;

    #[inline]
    pub fn runner_speed_mps(speed: u8) -> f32 {
        RUNNER_SPEED_BASE + RUNNER_SPEED_RANGE * super::fielder::n100(speed)
    }
}

/// Bounce-and-gather surcharges on uncaught balls, by landing zone.
pub mod bounce {
    /// Landing depth that splits near from deep (m).
    pub const DEEP_ZONE_M: f32 = 60.0;

    /// Fraction of the fence distance that marks a fence shot.
    pub const FENCE_ZONE_FRACTION: f32 = 0.9;

    /// Gather surcharge per zone (s).
    pub const NEAR_S: f32 = 0.3;
    pub const DEEP_S: f32 = 0.5;
    pub const FENCE_S: f32 = 0.8;
}

/// Tick-loop time steps and hard caps.
pub mod timing {
    /// Step while the ball is live and fielders pursue (s).
    pub const PURSUIT_DT_S: f32 = 0.1;

    /// Finer step once the ball is secured and throws are in flight (s).
    pub const THROW_DT_S: f32 = 0.05;

    /// Grounder simulation cap (s).
    pub const GROUNDER_CAP_S: f32 = 8.0;

    /// Air-ball simulation cap (s).
    pub const FLY_CAP_S: f32 = 12.0;

    /// Secondary runner-resolution cap (s).
    pub const RUNNER_CAP_S: f32 = 15.0;

    /// Window to run down a stopped grounder past the infield (s).
    pub const CHASE_GRACE_S: f32 = 4.0;

    /// Grace added to remaining flight time in air feasibility checks (s).
    pub const AIR_GRACE_S: f32 = 1.0;
}

// The two steps must nest evenly so a secured-ball switchover lands on a
// pursuit-tick boundary.
const _: () = assert!(timing::PURSUIT_DT_S / timing::THROW_DT_S == 2.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_profile() {
        assert!((fence::distance_m(0.0) - 100.0).abs() < 1e-3);
        assert!((fence::distance_m(90.0) - 100.0).abs() < 1e-3);
        assert!((fence::distance_m(45.0) - 122.0).abs() < 1e-3);
    }

    #[test]
    fn test_fence_symmetry() {
        for d in [5.0_f32, 20.0, 40.0] {
            let left = fence::distance_m(d);
            let right = fence::distance_m(90.0 - d);
            assert!((left - right).abs() < 1e-3, "fence not symmetric at {}", d);
        }
    }

    #[test]
    fn test_fair_bounds() {
        assert!(fence::is_fair(0.0));
        assert!(fence::is_fair(90.0));
        assert!(!fence::is_fair(-0.1));
        assert!(!fence::is_fair(90.1));
    }

    #[test]
    fn test_speed_mapping_endpoints() {
        assert!((fielder::max_speed_mps(0) - 6.5).abs() < 1e-6);
        assert!((fielder::max_speed_mps(100) - 8.75).abs() < 1e-6);
        assert!((race::runner_speed_mps(100) - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_reaction_decreases_with_awareness() {
        assert!(fielder::reaction_s(90) < fielder::reaction_s(30));
        assert!(fielder::reaction_s(0) <= fielder::REACTION_BASE_S);
    }

    #[test]
    fn test_perception_sigma_decays_with_height() {
        let low = fielder::perception_sigma_m(1.0);
        let high = fielder::perception_sigma_m(30.0);
        assert!(high < low);
        assert!(high > 0.0);
    }

    #[test]
    fn test_throw_speed_range() {
        assert!((throws::speed_mps(0) - 30.0).abs() < 1e-6);
        assert!((throws::speed_mps(100) - 50.0).abs() < 1e-6);
    }
}
