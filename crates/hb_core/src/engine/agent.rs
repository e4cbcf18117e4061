//! Fielder agents: one autonomous unit per defensive position.
//!
//! Agents live for a single at-bat. Each carries its own kinematics,
//! reaction clock and noisy read on the ball; coordination happens purely
//! through the two-phase decision pass, never through a central controller.
//!
//! ## State transitions
//! ```text
//! Ready → Reacting (contact observed)
//! Reacting → Pursuing / Covering / BackingUp / Holding (clock expired + decision)
//! Pursuing → Fielding (catch or pickup trigger)
//! Fielding → Throwing → terminal
//! any → Holding (yielded to a louder teammate)
//! ```

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::engine::field::Vec2;
use crate::engine::physics_constants::fielder as fp;
use crate::engine::trajectory::BallTrajectory;
use crate::models::{Base, DefenseSkill, FieldPosition};

/// Agent state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FielderState {
    #[default]
    Ready,
    Reacting,
    Pursuing,
    Covering,
    BackingUp,
    Holding,
    Fielding,
    Throwing,
}

impl FielderState {
    /// Whether the decision pass may still reassign this agent.
    pub fn can_redecide(&self) -> bool {
        !matches!(self, FielderState::Fielding | FielderState::Throwing)
    }

    /// Whether the agent is committed to the ball itself.
    pub fn is_on_ball(&self) -> bool {
        matches!(self, FielderState::Pursuing | FielderState::Fielding | FielderState::Throwing)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FielderState::Ready => "Ready",
            FielderState::Reacting => "Reacting",
            FielderState::Pursuing => "Pursuing",
            FielderState::Covering => "Covering",
            FielderState::BackingUp => "BackingUp",
            FielderState::Holding => "Holding",
            FielderState::Fielding => "Fielding",
            FielderState::Throwing => "Throwing",
        }
    }
}

/// What the agent is currently trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FielderAction {
    Charge,
    Retreat,
    Lateral,
    CoverBase(Base),
    Relay,
    Backup,
    #[default]
    Hold,
    FieldBall,
}

/// Noisy landing estimate formed at contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perception {
    pub landing: Vec2,
    /// 0.0..=1.0; high balls are easy reads, worm-burners are guesses.
    pub confidence: f32,
}

/// One autonomous fielder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FielderAgent {
    pub pos: FieldPosition,
    pub player_id: String,
    pub skill: DefenseSkill,

    /// Pre-pitch alignment spot; anchor for proximity scoring.
    pub home_pos: Vec2,
    pub current_pos: Vec2,
    pub target_pos: Vec2,
    pub current_speed: f32,

    /// Seconds until the first step is allowed at full effort.
    pub reaction_remaining: f32,
    pub perceived: Perception,

    pub state: FielderState,
    pub action: FielderAction,

    /// Phase-1 pursuit score in [-1, 1]; -1 means unreachable or yielded.
    pub pursuit_score: f32,
    /// Estimated seconds-from-contact to reach the pursuit target.
    pub estimated_arrival: f32,
    pub has_yielded: bool,
    /// How loudly this agent is calling for the ball, 0.0..=1.0.
    pub calling_intensity: f32,

    /// True when this slot was filled with the neutral dummy.
    pub is_substitute: bool,
}

impl FielderAgent {
    pub fn new(
        pos: FieldPosition,
        player_id: impl Into<String>,
        skill: DefenseSkill,
        start_pos: Vec2,
    ) -> Self {
        Self {
            pos,
            player_id: player_id.into(),
            skill: skill.sanitized(),
            home_pos: start_pos,
            current_pos: start_pos,
            target_pos: start_pos,
            current_speed: 0.0,
            reaction_remaining: 0.0,
            perceived: Perception { landing: start_pos, confidence: 0.0 },
            state: FielderState::Ready,
            action: FielderAction::Hold,
            pursuit_score: -1.0,
            estimated_arrival: f32::INFINITY,
            has_yielded: false,
            calling_intensity: 0.0,
            is_substitute: false,
        }
    }

    // =========================================================================
    // Derived physique
    // =========================================================================

    #[inline]
    pub fn max_speed(&self) -> f32 {
        fp::max_speed_mps(self.skill.speed)
    }

    #[inline]
    pub fn catch_reach(&self) -> f32 {
        fp::catch_reach_m(self.skill.fielding)
    }

    /// Ground covered from a standstill in `dt` seconds of full effort:
    /// a linear ramp to sprint over the acceleration window, then flat out.
    pub fn reachable_distance(&self, dt: f32) -> f32 {
        if dt <= 0.0 {
            return 0.0;
        }
        let v_max = self.max_speed();
        let t_acc = fp::ACCEL_TIME_S;
        let a = v_max / t_acc;
        let ramp = dt.min(t_acc);
        0.5 * a * ramp * ramp + v_max * (dt - t_acc).max(0.0)
    }

    /// Inverse of `reachable_distance`: seconds of full effort to cover
    /// `dist` meters from a standstill.
    pub fn time_to_cover(&self, dist: f32) -> f32 {
        if dist <= 0.0 {
            return 0.0;
        }
        let v_max = self.max_speed();
        let t_acc = fp::ACCEL_TIME_S;
        let a = v_max / t_acc;
        let ramp_dist = 0.5 * a * t_acc * t_acc;
        if dist <= ramp_dist {
            (2.0 * dist / a).sqrt()
        } else {
            t_acc + (dist - ramp_dist) / v_max
        }
    }

    /// Full latency from "now" to glove-on-ball at `dist` meters: any unexpired
    /// reaction plus the sprint.
    pub fn eta_to(&self, dist: f32) -> f32 {
        self.reaction_remaining.max(0.0) + self.time_to_cover(dist)
    }

    // =========================================================================
    // Contact observation
    // =========================================================================

    /// Observe contact: form the noisy landing read and start the reaction
    /// clock. Awareness rides on the fielding rating.
    pub fn observe_contact<R: Rng>(&mut self, traj: &BallTrajectory, rng: &mut R) {
        let sigma = fp::perception_sigma_m(traj.max_height);
        let landing = if traj.is_ground_ball {
            // Ground balls are read off the path, not a landing spot.
            traj.landing_pos
        } else {
            match Normal::new(0.0, sigma) {
                Ok(dist) => {
                    let dx: f32 = dist.sample(rng);
                    let dy: f32 = dist.sample(rng);
                    traj.landing_pos.plus(Vec2::new(dx, dy))
                }
                Err(_) => traj.landing_pos,
            }
        };
        self.perceived = Perception {
            landing,
            confidence: (1.0 - sigma / fp::PERCEPTION_SIGMA_BASE_M).clamp(0.0, 1.0),
        };
        self.reaction_remaining = fp::reaction_s(self.skill.fielding);
        self.state = FielderState::Reacting;
        self.target_pos = landing;
    }

    // =========================================================================
    // Per-tick updates
    // =========================================================================

    /// Burn reaction time; returns true once the agent is free to commit.
    pub fn tick_reaction(&mut self, dt: f32) -> bool {
        if self.reaction_remaining > 0.0 {
            self.reaction_remaining -= dt;
        }
        self.reaction_remaining <= 0.0
    }

    /// Move toward `target_pos` for one tick, honoring the acceleration ramp
    /// and the reduced effort of an agent still reading the ball.
    pub fn advance(&mut self, dt: f32) {
        let effort = if self.state == FielderState::Reacting {
            fp::REACTING_SPEED_FACTOR
        } else {
            1.0
        };
        let v_cap = self.max_speed() * effort;
        let a = self.max_speed() / fp::ACCEL_TIME_S;
        self.current_speed = (self.current_speed + a * dt).min(v_cap);
        self.current_pos = self.current_pos.stepped_toward(self.target_pos, self.current_speed * dt);
        // Arrived: plant the feet so the next read sees a set fielder.
        if self.current_pos.distance_to(self.target_pos) < 1e-4 {
            self.current_speed = 0.0;
        }
    }

    /// Yield to a teammate with the louder claim.
    pub fn yield_ball(&mut self) {
        self.has_yielded = true;
        self.pursuit_score = -1.0;
        if self.state.can_redecide() {
            self.state = FielderState::Holding;
            self.action = FielderAction::Hold;
        }
    }

    /// Commit to the glove work; no further re-decisions.
    pub fn start_fielding(&mut self) {
        self.state = FielderState::Fielding;
        self.action = FielderAction::FieldBall;
        self.current_speed = 0.0;
    }

    pub fn start_throwing(&mut self) {
        self.state = FielderState::Throwing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::trajectory::BattedBall;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_agent() -> FielderAgent {
        FielderAgent::new(
            FieldPosition::Short,
            "ss",
            DefenseSkill::default(),
            Vec2::new(-8.5, 33.5),
        )
    }

    #[test]
    fn test_reachable_distance_ramp() {
        let agent = make_agent();
        // Half the ramp covers a quarter of the ramp distance.
        let full_ramp = agent.reachable_distance(fp::ACCEL_TIME_S);
        let half_ramp = agent.reachable_distance(fp::ACCEL_TIME_S / 2.0);
        assert!((half_ramp - full_ramp / 4.0).abs() < 1e-4);
        // Past the ramp the agent covers max speed per second.
        let one_sec_more = agent.reachable_distance(fp::ACCEL_TIME_S + 1.0);
        assert!((one_sec_more - full_ramp - agent.max_speed()).abs() < 1e-3);
    }

    #[test]
    fn test_time_to_cover_inverts_reachable() {
        let agent = make_agent();
        for dist in [0.5_f32, 1.5, 4.0, 12.0, 30.0] {
            let t = agent.time_to_cover(dist);
            assert!((agent.reachable_distance(t) - dist).abs() < 1e-3, "dist {}", dist);
        }
    }

    #[test]
    fn test_observe_contact_starts_clock() {
        let mut agent = make_agent();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(45.0, 30.0, 140.0));
        agent.observe_contact(&traj, &mut rng);
        assert_eq!(agent.state, FielderState::Reacting);
        assert!(agent.reaction_remaining > 0.0);
        // A towering fly is an easy read.
        assert!(agent.perceived.confidence > 0.5);
    }

    #[test]
    fn test_ground_ball_read_is_exact() {
        let mut agent = make_agent();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(20.0, 2.0, 110.0));
        agent.observe_contact(&traj, &mut rng);
        assert_eq!(agent.perceived.landing, traj.landing_pos);
    }

    #[test]
    fn test_reacting_throttles_speed() {
        let mut reacting = make_agent();
        reacting.state = FielderState::Reacting;
        reacting.target_pos = Vec2::new(50.0, 50.0);
        let mut sprinting = reacting.clone();
        sprinting.state = FielderState::Pursuing;
        for _ in 0..20 {
            reacting.advance(0.1);
            sprinting.advance(0.1);
        }
        let covered_reacting = reacting.current_pos.distance_to(reacting.home_pos);
        let covered_sprinting = sprinting.current_pos.distance_to(sprinting.home_pos);
        assert!(covered_reacting < covered_sprinting * 0.5);
    }

    #[test]
    fn test_yield_parks_agent() {
        let mut agent = make_agent();
        agent.state = FielderState::Pursuing;
        agent.pursuit_score = 0.8;
        agent.yield_ball();
        assert!(agent.has_yielded);
        assert_eq!(agent.state, FielderState::Holding);
        assert_eq!(agent.pursuit_score, -1.0);
    }

    #[test]
    fn test_fielding_locks_redecision() {
        let mut agent = make_agent();
        agent.start_fielding();
        assert!(!agent.state.can_redecide());
        agent.yield_ball();
        assert_eq!(agent.state, FielderState::Fielding);
    }
}
