//! Diagnostic interfaces: one-shot reads of the physics and the decision
//! table without running a full at-bat.

use serde::{Deserialize, Serialize};

use crate::engine::agent::FielderAgent;
use crate::engine::baserunning::{self, HitCap, Retrieval};
use crate::engine::decision::{decide_all, DecisionContext, Duty, PursuitMode};
use crate::engine::field::{standard_position, Vec2};
use crate::engine::outcome::AtBatResult;
use crate::engine::trajectory::{BallTrajectory, BattedBall, BattedBallType};
use crate::models::{BaseState, DefenseSkill, FieldPosition, Runner};

/// Landing and flight metadata for a hypothetical batted ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingReport {
    pub ball_type: BattedBallType,
    pub landing_pos: Vec2,
    pub landing_distance: f32,
    pub flight_time: f32,
    pub max_height: f32,
    pub is_ground_ball: bool,
    pub rest_pos: Vec2,
}

/// Compute landing and flight metadata from raw contact parameters.
pub fn calc_ball_landing(
    direction_deg: f32,
    launch_angle_deg: f32,
    exit_velocity_kmh: f32,
) -> LandingReport {
    let ball = BattedBall::new(direction_deg, launch_angle_deg, exit_velocity_kmh);
    let traj = BallTrajectory::from_batted_ball(&ball);
    LandingReport {
        ball_type: traj.ball_type,
        landing_pos: traj.landing_pos,
        landing_distance: traj.landing_distance,
        flight_time: traj.flight_time,
        max_height: traj.max_height,
        is_ground_ball: traj.is_ground_ball,
        rest_pos: traj.rest_pos(),
    }
}

/// One row of the fielder decision table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FielderEvaluation {
    pub position: FieldPosition,
    /// Duty settled by the two-phase pass.
    pub role: String,
    pub pursuit_score: f32,
    /// Estimated seconds-from-contact to reach the ball, if reachable.
    pub reach_time: Option<f32>,
    pub can_reach: bool,
    /// Projected meeting point with a rolling ball, if one exists.
    pub intercept_point: Option<Vec2>,
}

/// Run the two-phase decision once, at contact, with perfect perception,
/// and report each fielder's role and reach math.
pub fn evaluate_fielders(
    ball: &BattedBall,
    defense: &[(Vec2, DefenseSkill); 9],
    bases: &BaseState,
    outs: u8,
) -> Vec<FielderEvaluation> {
    let traj = BallTrajectory::from_batted_ball(ball);
    let mut agents: [FielderAgent; 9] = std::array::from_fn(|i| {
        let pos = FieldPosition::ALL[i];
        let mut agent = FielderAgent::new(pos, pos.abbreviation(), defense[i].1, defense[i].0);
        agent.perceived.landing = traj.landing_pos;
        agent.perceived.confidence = 1.0;
        agent
    });

    let ctx = DecisionContext {
        traj: &traj,
        now: 0.0,
        outs,
        runner_on_first: bases.first.is_some(),
        runner_on_second: bases.second.is_some(),
        runner_on_third: bases.third.is_some(),
    };
    let plans = decide_all(&mut agents, &ctx);

    plans
        .iter()
        .zip(agents.iter())
        .map(|(plan, agent)| {
            let cap = ctx.pursuit_cap();
            let duty =
                crate::engine::decision::best_duty_for(agent.pos.scorecard() as usize - 1, &agents, &plans, &ctx, cap);
            FielderEvaluation {
                position: agent.pos,
                role: role_name(&duty.duty),
                pursuit_score: plan.score,
                reach_time: plan.is_feasible().then_some(plan.arrival),
                can_reach: plan.is_feasible(),
                intercept_point: plan
                    .intercept
                    .map(|i| i.point)
                    .or_else(|| matches!(plan.mode, Some(PursuitMode::StopPoint)).then_some(plan.target)),
            }
        })
        .collect()
}

fn role_name(duty: &Duty) -> String {
    match duty {
        Duty::Pursue => "pursue".to_string(),
        Duty::Cover(base) => format!("cover_{:?}", base).to_lowercase(),
        Duty::Relay => "relay".to_string(),
        Duty::Backup => "backup".to_string(),
        Duty::Hold => "hold".to_string(),
    }
}

/// Standard-depth defense with neutral gloves, for quick diagnostics.
pub fn neutral_defense() -> [(Vec2, DefenseSkill); 9] {
    std::array::from_fn(|i| (standard_position(FieldPosition::ALL[i]), DefenseSkill::default()))
}

/// Resolve the hit type an uncaught ball landing at `landing` turns into,
/// with nobody on and an average defense.
pub fn resolve_hit_type_from_landing(
    landing: Vec2,
    batter_speed: u8,
    fence_distance: f32,
) -> AtBatResult {
    let distance = landing.length().min(fence_distance - 0.5);
    // Synthesize the retrieval an average outfielder makes on this ball.
    let (of_pos, _) = nearest_standard_outfielder(landing);
    let approach = of_pos.distance_to(landing);
    let arrival = 1.5 + approach / 8.0;

    // A flat liner profile at that depth stands in for the real trajectory.
    let ball = BattedBall::new(
        direction_of(landing),
        16.0,
        (distance * 1.9).clamp(60.0, 185.0),
    );
    let mut traj = BallTrajectory::from_batted_ball(&ball);
    // Pin the synthetic trajectory's landing to the requested point.
    if (traj.landing_distance - distance).abs() > 1.0 {
        traj = nudge_to_distance(&ball, distance);
    }

    let retrieval = Retrieval {
        fielder: FieldPosition::Center,
        skill: DefenseSkill::default(),
        at: landing,
        time: arrival.max(traj.flight_time),
    };
    baserunning::resolve_hit_advancement(
        &retrieval,
        &traj,
        &Runner::new("batter", batter_speed),
        &BaseState::empty(),
        HitCap::Triple,
    )
    .result
}

fn nearest_standard_outfielder(target: Vec2) -> (Vec2, FieldPosition) {
    [FieldPosition::Left, FieldPosition::Center, FieldPosition::Right]
        .into_iter()
        .map(|p| (standard_position(p), p))
        .min_by(|a, b| {
            a.0.distance_to(target)
                .partial_cmp(&b.0.distance_to(target))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or((standard_position(FieldPosition::Center), FieldPosition::Center))
}

fn direction_of(landing: Vec2) -> f32 {
    if landing.length() < 1e-3 {
        return 45.0;
    }
    let rad = landing.x.atan2(landing.y);
    (rad.to_degrees() + 45.0).clamp(0.0, 90.0)
}

/// Rebuild the synthetic trajectory at a different exit velocity until the
/// landing distance roughly matches.
fn nudge_to_distance(ball: &BattedBall, target: f32) -> BallTrajectory {
    let mut lo = 60.0_f32;
    let mut hi = 185.0_f32;
    let mut best = BallTrajectory::from_batted_ball(ball);
    for _ in 0..20 {
        let mid = 0.5 * (lo + hi);
        let candidate = BallTrajectory::from_batted_ball(&BattedBall::new(
            ball.direction_deg,
            ball.launch_angle_deg,
            mid,
        ));
        if (candidate.landing_distance - target).abs()
            < (best.landing_distance - target).abs()
        {
            best = candidate.clone();
        }
        if candidate.landing_distance < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    best
}
