//! Core types for the autonomous fielding decision system.

use crate::engine::field::Vec2;
use crate::engine::trajectory::BallTrajectory;
use crate::models::Base;

// ============================================================================
// Constants
// ============================================================================

/// Peak height below which a ball counts as "low" (m).
pub const LOW_BALL_HEIGHT_M: f32 = 5.0;

/// How many agents may chase a low ball at once.
pub const LOW_BALL_PURSUIT_CAP: usize = 2;

/// How many agents may chase a high ball at once.
pub const HIGH_BALL_PURSUIT_CAP: usize = 1;

/// Landing distance that makes a high ball a relay candidate (m).
pub const RELAY_MIN_LANDING_M: f32 = 60.0;

/// The cutoff man stations at this fraction of the landing distance.
pub const RELAY_CUTOFF_FRACTION: f32 = 0.4;

/// Relay score is this factor times cutoff proximity.
pub const RELAY_SCORE_FACTOR: f32 = 0.8;

/// Distance normalizer for proximity/mobility factors (m).
pub const PROXIMITY_NORM_M: f32 = 40.0;

/// Distance normalizer for base-cover scores (m).
pub const COVER_NORM_M: f32 = 35.0;

/// Pursuit score blend weights; margin dominates.
pub const PROXIMITY_WEIGHT: f32 = 0.3;
pub const MOBILITY_WEIGHT: f32 = 0.2;
pub const MARGIN_WEIGHT: f32 = 0.4;

/// Ground-intercept spare-reach normalizer (m).
pub const GROUND_MARGIN_NORM_M: f32 = 5.0;

/// Cover damping on low trajectories (pursuit-first on grounders).
pub const COVER_DAMP_LOW: f32 = 0.5;

/// Fly-ball cover scaling endpoints by landing depth.
pub const COVER_FLY_NEAR_SCALE: f32 = 0.15;
pub const COVER_FLY_DEEP_SCALE: f32 = 0.7;
pub const COVER_FLY_NEAR_M: f32 = 30.0;
pub const COVER_FLY_DEEP_M: f32 = 90.0;

/// Backup runners stand this far past the pursuer's target (m).
pub const BACKUP_DEPTH_M: f32 = 8.0;

/// Distance normalizer for backup scores; deliberately wide so the far-side
/// outfielder still drifts behind the play (m).
pub const BACKUP_NORM_M: f32 = 80.0;

/// Baseline scores for non-pursuit duties.
pub const BACKUP_BASE_SCORE: f32 = 0.25;
pub const HOLD_SCORE: f32 = 0.05;

/// Ball-path scan step when hunting ground intercepts (s).
pub const INTERCEPT_SCAN_DT_S: f32 = 0.05;

// ============================================================================
// Phase-1 output
// ============================================================================

/// How a feasible pursuit would come to the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitMode {
    /// Meet a rolling ball on its path.
    PathIntercept,
    /// Meet the ball right where it dies.
    StopPoint,
    /// Run down a ball that is already dead.
    ChaseDown,
    /// Get under a ball in the air.
    AirCatch,
}

/// A ground-ball meeting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathIntercept {
    pub point: Vec2,
    /// Seconds from contact at which the ball is there.
    pub ball_time: f32,
    /// Ball speed at that instant (m/s).
    pub ball_speed: f32,
}

/// Per-agent phase-1 result: an order-independent read of one agent's own
/// chance at the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitPlan {
    /// [-1, 1]; -1 marks an unreachable ball.
    pub score: f32,
    pub target: Vec2,
    /// Estimated seconds-from-contact of glove-on-ball.
    pub arrival: f32,
    pub mode: Option<PursuitMode>,
    pub intercept: Option<PathIntercept>,
}

impl PursuitPlan {
    pub fn unreachable(target: Vec2) -> Self {
        Self { score: -1.0, target, arrival: f32::INFINITY, mode: None, intercept: None }
    }

    pub fn is_feasible(&self) -> bool {
        self.score > -1.0 && self.mode.is_some()
    }
}

// ============================================================================
// Phase-2 output
// ============================================================================

/// Final action for one agent this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub duty: Duty,
    pub target: Vec2,
    pub score: f32,
}

/// What phase-2 settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duty {
    Pursue,
    Cover(Base),
    Relay,
    Backup,
    Hold,
}

// ============================================================================
// Shared context
// ============================================================================

/// Immutable inputs every decision reads.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub traj: &'a BallTrajectory,
    /// Seconds since contact.
    pub now: f32,
    pub outs: u8,
    pub runner_on_first: bool,
    pub runner_on_second: bool,
    pub runner_on_third: bool,
}

impl<'a> DecisionContext<'a> {
    pub fn is_low_ball(&self) -> bool {
        self.traj.max_height < LOW_BALL_HEIGHT_M
    }

    pub fn pursuit_cap(&self) -> usize {
        if self.is_low_ball() {
            LOW_BALL_PURSUIT_CAP
        } else {
            HIGH_BALL_PURSUIT_CAP
        }
    }

    /// Cover-score damping for the current trajectory shape.
    pub fn cover_damping(&self) -> f32 {
        if self.is_low_ball() {
            COVER_DAMP_LOW
        } else {
            let d = self.traj.landing_distance;
            let t = ((d - COVER_FLY_NEAR_M) / (COVER_FLY_DEEP_M - COVER_FLY_NEAR_M)).clamp(0.0, 1.0);
            COVER_FLY_NEAR_SCALE + (COVER_FLY_DEEP_SCALE - COVER_FLY_NEAR_SCALE) * t
        }
    }
}
