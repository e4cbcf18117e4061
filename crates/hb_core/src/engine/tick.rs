//! Fixed-step fielding simulation.
//!
//! Advances logical time in small increments: ball first, then reactions,
//! then the two-phase decision, then agent motion, then trigger checks.
//! Agents are processed in scorecard order inside every stage, but no stage
//! result depends on that order (see the decision module).

use rand::Rng;

use crate::engine::agent::{FielderAgent, FielderState};
use crate::engine::catching::{self, CatchKind};
use crate::engine::decision::{decide_all, DecisionContext};
use crate::engine::physics_constants::{fielder as fp, timing};
use crate::engine::trajectory::BallTrajectory;
use crate::engine::field::Vec2;
use crate::models::BaseState;

/// Agent speed below which an arriving glove counts as set under the ball.
const SETTLED_SPEED_MPS: f32 = 1.5;

/// Refine the time step when the ball is this close to a glove (m).
const TRIGGER_REFINE_RANGE_M: f32 = 3.0;

/// How the fielding phase ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldingEvent {
    /// Ball caught in the air; the batter is out pending tag-ups.
    AirCatch { fielder: usize, at: Vec2, time: f32, kind: CatchKind },
    /// Catch attempted and missed; error only on a settled-reach miss.
    AirDrop { fielder: usize, at: Vec2, time: f32, error: bool },
    /// Rolling ball gloved on its path.
    GroundIntercept { fielder: usize, at: Vec2, time: f32, ball_speed: f32 },
    /// Pickup failed; soft balls charge the glove, hot ones score a hit.
    GroundBobble { fielder: usize, at: Vec2, time: f32, error: bool },
    /// Dead ball run down and secured.
    ChaseDown { fielder: usize, at: Vec2, time: f32 },
    /// Nobody reached the ball inside the time cap.
    BallFree { rest: Vec2, time: f32 },
}

impl FieldingEvent {
    /// Index (0..9, scorecard order) of the fielder on the ball, if any.
    pub fn fielder(&self) -> Option<usize> {
        match self {
            FieldingEvent::AirCatch { fielder, .. }
            | FieldingEvent::AirDrop { fielder, .. }
            | FieldingEvent::GroundIntercept { fielder, .. }
            | FieldingEvent::GroundBobble { fielder, .. }
            | FieldingEvent::ChaseDown { fielder, .. } => Some(*fielder),
            FieldingEvent::BallFree { .. } => None,
        }
    }

    pub fn time(&self) -> f32 {
        match self {
            FieldingEvent::AirCatch { time, .. }
            | FieldingEvent::AirDrop { time, .. }
            | FieldingEvent::GroundIntercept { time, .. }
            | FieldingEvent::GroundBobble { time, .. }
            | FieldingEvent::ChaseDown { time, .. }
            | FieldingEvent::BallFree { time, .. } => *time,
        }
    }
}

/// Result of the fielding phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOutcome {
    pub event: FieldingEvent,
    /// Set when the loop hit its hard time cap.
    pub forced: bool,
}

/// Run the fielding phase for one batted ball.
///
/// Agents must be freshly built for this at-bat; they observe contact here
/// (in scorecard order, which fixes the random-stream layout) and are left
/// at their final positions for the resolution step.
pub fn run_fielding<R: Rng>(
    agents: &mut [FielderAgent; 9],
    traj: &BallTrajectory,
    bases: &BaseState,
    outs: u8,
    rng: &mut R,
) -> SimOutcome {
    for agent in agents.iter_mut() {
        agent.observe_contact(traj, rng);
    }

    let cap = if traj.is_ground_ball { timing::GROUNDER_CAP_S } else { timing::FLY_CAP_S };
    // Dead-ball instant: a grounder dies at stop time, an uncaught air ball
    // after its short post-landing roll.
    let rest_time = if traj.is_ground_ball {
        traj.flight_time
    } else {
        traj.flight_time + crate::engine::physics_constants::flight::LANDING_ROLL_TIME_S
    };

    let mut t = 0.0_f32;
    let mut landing_checked = false;

    loop {
        let dt = if near_trigger(agents, traj, t) { timing::THROW_DT_S } else { timing::PURSUIT_DT_S };
        t += dt;
        if t > cap {
            return SimOutcome {
                event: FieldingEvent::BallFree { rest: traj.rest_pos(), time: cap },
                forced: true,
            };
        }

        // Reactions burn down before anyone re-decides.
        for agent in agents.iter_mut() {
            agent.tick_reaction(dt);
        }

        // Decisions re-run while nobody has committed to the glove work.
        let anyone_engaged = agents
            .iter()
            .any(|a| matches!(a.state, FielderState::Fielding | FielderState::Throwing));
        if !anyone_engaged {
            let ctx = DecisionContext {
                traj,
                now: t,
                outs,
                runner_on_first: bases.first.is_some(),
                runner_on_second: bases.second.is_some(),
                runner_on_third: bases.third.is_some(),
            };
            decide_all(agents, &ctx);
        }

        for agent in agents.iter_mut() {
            agent.advance(dt);
        }

        // ---- triggers ----

        if traj.is_ground_ball {
            if let Some(outcome) = check_rolling_ball(agents, traj, t, rest_time, rng) {
                return outcome;
            }
        } else if t < traj.flight_time {
            if let Some(outcome) = check_air_ball(agents, traj, t, rng) {
                return outcome;
            }
        } else {
            // The landing instant gets one running/diving resolution even if
            // the tick grid stepped past it; after that it is a loose ball.
            if !landing_checked {
                landing_checked = true;
                if let Some(outcome) = check_landing_instant(agents, traj, rng) {
                    return outcome;
                }
            }
            if let Some(outcome) = check_rolling_ball(agents, traj, t, rest_time, rng) {
                return outcome;
            }
        }
    }
}

/// Fine-step heuristic: the ball is about to meet somebody's glove.
fn near_trigger(agents: &[FielderAgent; 9], traj: &BallTrajectory, t: f32) -> bool {
    let ball = traj.position_at(t);
    agents.iter().any(|a| {
        a.state.is_on_ball() && a.current_pos.distance_to(ball) < TRIGGER_REFINE_RANGE_M
    })
}

/// A ball in flight: catchable once it is inside standing reach on a glove.
fn check_air_ball<R: Rng>(
    agents: &mut [FielderAgent; 9],
    traj: &BallTrajectory,
    t: f32,
    rng: &mut R,
) -> Option<SimOutcome> {
    let height = traj.height_at(t);
    if height > fp::STANDING_REACH_M {
        return None;
    }
    let ball = traj.position_at(t);

    for idx in 0..9 {
        let agent = &agents[idx];
        if agent.reaction_remaining > 0.0 {
            continue;
        }
        if agent.current_pos.distance_to(ball) > agent.catch_reach() {
            continue;
        }
        let kind = if agent.current_speed < SETTLED_SPEED_MPS {
            CatchKind::Standard
        } else {
            CatchKind::Running
        };
        let margin = if kind == CatchKind::Standard { catching::SETTLE_TIME_S } else { 0.0 };
        let p = catching::air_catch_probability(kind, &agent.skill, margin);
        return Some(if catching::roll(p, rng) {
            agents[idx].start_fielding();
            SimOutcome {
                event: FieldingEvent::AirCatch { fielder: idx, at: ball, time: t, kind },
                forced: false,
            }
        } else {
            SimOutcome {
                event: FieldingEvent::AirDrop {
                    fielder: idx,
                    at: ball,
                    time: t,
                    error: catching::miss_is_error(kind),
                },
                forced: false,
            }
        });
    }
    None
}

/// The landing instant: last call for a running or diving grab.
fn check_landing_instant<R: Rng>(
    agents: &mut [FielderAgent; 9],
    traj: &BallTrajectory,
    rng: &mut R,
) -> Option<SimOutcome> {
    // Best-placed agent gets the attempt; scorecard order breaks ties.
    let mut best: Option<(usize, f32)> = None;
    for (idx, agent) in agents.iter().enumerate() {
        if agent.reaction_remaining > 0.0 {
            continue;
        }
        let d = agent.current_pos.distance_to(traj.landing_pos);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((idx, d));
        }
    }
    let (idx, dist) = best?;
    let agent = &agents[idx];
    let settled = if agent.current_speed < SETTLED_SPEED_MPS { catching::SETTLE_TIME_S } else { 0.0 };
    let kind = catching::classify_air_attempt(dist, agent.catch_reach(), settled)?;

    let p = catching::air_catch_probability(kind, &agent.skill, settled);
    Some(if catching::roll(p, rng) {
        agents[idx].start_fielding();
        SimOutcome {
            event: FieldingEvent::AirCatch {
                fielder: idx,
                at: traj.landing_pos,
                time: traj.flight_time,
                kind,
            },
            forced: false,
        }
    } else {
        SimOutcome {
            event: FieldingEvent::AirDrop {
                fielder: idx,
                at: traj.landing_pos,
                time: traj.flight_time,
                error: catching::miss_is_error(kind),
            },
            forced: false,
        }
    })
}

/// A ball on the grass: live intercepts while it rolls, a plain pickup once
/// it is dead.
fn check_rolling_ball<R: Rng>(
    agents: &mut [FielderAgent; 9],
    traj: &BallTrajectory,
    t: f32,
    rest_time: f32,
    rng: &mut R,
) -> Option<SimOutcome> {
    let ball = traj.position_at(t);
    let speed = traj.speed_at(t);
    let rolling = t < rest_time && speed > 0.5;

    for idx in 0..9 {
        let agent = &agents[idx];
        if agent.reaction_remaining > 0.0 {
            continue;
        }
        let reach = agent.catch_reach();
        let dist = agent.current_pos.distance_to(ball);
        if dist > reach {
            continue;
        }

        if rolling && traj.is_ground_ball {
            let p = catching::ground_intercept_probability(&agent.skill, speed, dist / reach);
            return Some(if catching::roll(p, rng) {
                agents[idx].start_fielding();
                SimOutcome {
                    event: FieldingEvent::GroundIntercept {
                        fielder: idx,
                        at: ball,
                        time: t,
                        ball_speed: speed,
                    },
                    forced: false,
                }
            } else {
                SimOutcome {
                    event: FieldingEvent::GroundBobble {
                        fielder: idx,
                        at: ball,
                        time: t,
                        error: catching::ground_miss_is_error(speed),
                    },
                    forced: false,
                }
            });
        }

        // Dead or dying ball: the pickup itself never fails.
        agents[idx].start_fielding();
        return Some(SimOutcome {
            event: FieldingEvent::ChaseDown { fielder: idx, at: ball, time: t },
            forced: false,
        });
    }
    None
}
