//! Batted-ball flight and roll models.
//!
//! A `BallTrajectory` is built once per contact and is immutable afterwards;
//! every query is a pure function of time. Air balls fly a drag-corrected
//! parabola, ground balls follow a uniform-deceleration roll.

use serde::{Deserialize, Serialize};

use crate::engine::field::{self, spray_unit, Vec2};
use crate::engine::physics_constants::{fence, flight, ground};

/// Batted-ball classification by launch angle and exit velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattedBallType {
    GroundBall,
    LineDrive,
    FlyBall,
    Popup,
}

impl BattedBallType {
    pub fn name(&self) -> &'static str {
        match self {
            BattedBallType::GroundBall => "ground_ball",
            BattedBallType::LineDrive => "line_drive",
            BattedBallType::FlyBall => "fly_ball",
            BattedBallType::Popup => "popup",
        }
    }
}

/// Classify a batted ball from launch angle (deg) and exit velocity (km/h).
///
/// Monotonic in angle: raising the angle only ever advances the class along
/// ground → line → fly → popup.
pub fn classify_batted_ball_type(launch_angle_deg: f32, exit_velocity_kmh: f32) -> BattedBallType {
    if launch_angle_deg < 10.0 {
        return BattedBallType::GroundBall;
    }
    if launch_angle_deg < 12.0 && exit_velocity_kmh < 85.0 {
        // Weak contact at a low angle still beats itself into the ground.
        return BattedBallType::GroundBall;
    }
    if launch_angle_deg < 20.0 {
        BattedBallType::LineDrive
    } else if launch_angle_deg < 50.0 {
        BattedBallType::FlyBall
    } else {
        BattedBallType::Popup
    }
}

/// The ball off the bat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattedBall {
    /// Spray direction in degrees: 0° left-field line, 45° center,
    /// 90° right-field line; outside 0..=90 is foul territory.
    pub direction_deg: f32,
    pub launch_angle_deg: f32,
    pub exit_velocity_kmh: f32,
    pub ball_type: BattedBallType,
}

impl BattedBall {
    pub fn new(direction_deg: f32, launch_angle_deg: f32, exit_velocity_kmh: f32) -> Self {
        Self {
            direction_deg,
            launch_angle_deg,
            exit_velocity_kmh,
            ball_type: classify_batted_ball_type(launch_angle_deg, exit_velocity_kmh),
        }
    }

    pub fn is_fair(&self) -> bool {
        field::is_fair(self.direction_deg)
    }
}

/// Immutable flight record for one batted ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallTrajectory {
    pub direction_deg: f32,
    pub ball_type: BattedBallType,
    /// Where the ball first touches grass (air) or stops rolling (ground).
    pub landing_pos: Vec2,
    pub landing_distance: f32,
    /// Air time for air balls; roll-to-stop time for grounders.
    pub flight_time: f32,
    pub max_height: f32,
    pub is_ground_ball: bool,

    unit: Vec2,
    /// Uniform horizontal speed over the flight (air balls).
    horiz_speed: f32,
    /// Undragged initial vertical speed (air balls).
    vy0: f32,
    /// Effective initial roll speed (ground balls); equals the exit speed.
    v0_eff: f32,
}

impl BallTrajectory {
    pub fn from_batted_ball(ball: &BattedBall) -> Self {
        let v = flight::kmh_to_mps(ball.exit_velocity_kmh);
        match ball.ball_type {
            BattedBallType::GroundBall => Self::ground(ball, v),
            _ => Self::air(ball, v),
        }
    }

    fn air(ball: &BattedBall, v: f32) -> Self {
        let g = flight::GRAVITY_MPS2;
        let theta = ball.launch_angle_deg.to_radians();
        let vy0 = v * theta.sin();
        let vx = v * theta.cos();

        if v < 1.0 || vx < 0.5 {
            // Physical degeneracy: treat as a dead squib in front of the plate.
            return Self::squib(ball);
        }

        let t_up = vy0 / g;
        let max_height = flight::BAT_HEIGHT_M + vy0 * vy0 / (2.0 * g);
        let t_down = (2.0 * max_height / g).sqrt();
        let t_raw = t_up + t_down;

        let flight_time = t_raw * flight::FLIGHT_TIME_FACTOR;
        let landing_distance = vx * t_raw * flight::DRAG_FACTOR;
        let unit = spray_unit(ball.direction_deg);

        Self {
            direction_deg: ball.direction_deg,
            ball_type: ball.ball_type,
            landing_pos: unit.scaled(landing_distance),
            landing_distance,
            flight_time,
            max_height,
            is_ground_ball: false,
            unit,
            horiz_speed: landing_distance / flight_time,
            vy0,
            v0_eff: 0.0,
        }
    }

    fn ground(ball: &BattedBall, v: f32) -> Self {
        let angle = ball.launch_angle_deg;
        let bounce_factor = if angle < 0.0 {
            // Chopped into the dirt: progressively dead, gone at -30°.
            (1.0 - (-angle / -ground::FULL_LOSS_ANGLE_DEG).clamp(0.0, 1.0))
                * (1.0 - ground::LOW_ANGLE_MAX_LOSS)
        } else if angle < ground::LOW_ANGLE_FREE_DEG {
            (1.0 - ground::LOW_ANGLE_MAX_LOSS)
                + ground::LOW_ANGLE_MAX_LOSS * (angle / ground::LOW_ANGLE_FREE_DEG)
        } else {
            1.0
        };

        let max_dist = (v * ground::ROLL_VELOCITY_FACTOR).min(ground::MAX_ROLL_CAP_M) * bounce_factor;
        if v < 1.0 || max_dist < 0.5 {
            return Self::squib(ball);
        }

        let stop_time = max_dist / (v * ground::AVG_SPEED_RATIO);
        let unit = spray_unit(ball.direction_deg);

        Self {
            direction_deg: ball.direction_deg,
            ball_type: BattedBallType::GroundBall,
            landing_pos: unit.scaled(max_dist),
            landing_distance: max_dist,
            flight_time: stop_time,
            max_height: 0.0,
            is_ground_ball: true,
            unit,
            horiz_speed: 0.0,
            vy0: 0.0,
            v0_eff: 2.0 * max_dist / stop_time,
        }
    }

    /// Trivial trajectory for degenerate contact: the ball dies a meter in
    /// front of the plate. Keeps every downstream division well-defined.
    fn squib(ball: &BattedBall) -> Self {
        let unit = spray_unit(ball.direction_deg.clamp(0.0, 90.0));
        Self {
            direction_deg: ball.direction_deg,
            ball_type: BattedBallType::GroundBall,
            landing_pos: unit.scaled(1.0),
            landing_distance: 1.0,
            flight_time: 0.5,
            max_height: 0.0,
            is_ground_ball: true,
            unit,
            horiz_speed: 0.0,
            vy0: 0.0,
            v0_eff: 4.0,
        }
    }

    // =========================================================================
    // Time queries
    // =========================================================================

    /// Ball position at time `t` (seconds after contact).
    ///
    /// Past the landing instant an air ball keeps rolling a short, bounded
    /// distance; a ground ball stays at its stop point.
    pub fn position_at(&self, t: f32) -> Vec2 {
        if self.is_ground_ball {
            let p = (t / self.flight_time).clamp(0.0, 1.0);
            let dist = self.landing_distance * (2.0 * p - p * p);
            self.unit.scaled(dist)
        } else if t <= self.flight_time {
            let t = t.max(0.0);
            self.unit.scaled(self.horiz_speed * t)
        } else {
            let over = (t - self.flight_time).min(flight::LANDING_ROLL_TIME_S);
            let roll = self.horiz_speed * flight::LANDING_ROLL_SPEED_FACTOR * over;
            self.unit.scaled(self.landing_distance + roll)
        }
    }

    /// Ball height at time `t`; zero once on the ground.
    pub fn height_at(&self, t: f32) -> f32 {
        if self.is_ground_ball || t >= self.flight_time {
            return 0.0;
        }
        let g = flight::GRAVITY_MPS2;
        // Back-map the dragged clock onto the undragged parabola.
        let t_phys = t.max(0.0) / flight::FLIGHT_TIME_FACTOR;
        (flight::BAT_HEIGHT_M + self.vy0 * t_phys - 0.5 * g * t_phys * t_phys).max(0.0)
    }

    /// Horizontal ball speed at time `t`.
    pub fn speed_at(&self, t: f32) -> f32 {
        if self.is_ground_ball {
            let p = (t / self.flight_time).clamp(0.0, 1.0);
            self.v0_eff * (1.0 - p)
        } else if t <= self.flight_time {
            self.horiz_speed
        } else if t < self.flight_time + flight::LANDING_ROLL_TIME_S {
            self.horiz_speed * flight::LANDING_ROLL_SPEED_FACTOR
        } else {
            0.0
        }
    }

    pub fn is_on_ground(&self, t: f32) -> bool {
        self.is_ground_ball || t >= self.flight_time
    }

    /// Where the ball finally stops if nobody touches it.
    pub fn rest_pos(&self) -> Vec2 {
        if self.is_ground_ball {
            self.landing_pos
        } else {
            self.position_at(self.flight_time + flight::LANDING_ROLL_TIME_S)
        }
    }

    /// Spray-line unit vector for this ball.
    pub fn path_unit(&self) -> Vec2 {
        self.unit
    }

    // =========================================================================
    // Fence judgement
    // =========================================================================

    /// Carry-adjusted distance used only against the fence.
    pub fn effective_distance(&self, carry_factor: f32) -> f32 {
        self.landing_distance * carry_factor
    }

    /// Home-run test: the carry-adjusted ball must reach the fence arc and
    /// still be fence-high when it gets there.
    pub fn clears_fence(&self, carry_factor: f32) -> bool {
        if self.is_ground_ball || !field::is_fair(self.direction_deg) {
            return false;
        }
        let fence_d = fence::distance_m(self.direction_deg);
        let effective = self.effective_distance(carry_factor);
        if effective < fence_d {
            return false;
        }
        // Back-map: take the drag-scaled clock time at which the ball crosses
        // the fence arc and read the undragged parabola at that instant. Drag
        // robs range, not airtime, so the dragged ball hangs on the fatter arc.
        let t_at_fence = self.flight_time * fence_d / effective;
        self.undragged_height(t_at_fence) >= fence::HEIGHT_M
    }

    /// Height of the undragged parabola at raw time `t`.
    fn undragged_height(&self, t: f32) -> f32 {
        let g = flight::GRAVITY_MPS2;
        (flight::BAT_HEIGHT_M + self.vy0 * t - 0.5 * g * t * t).max(0.0)
    }
}
