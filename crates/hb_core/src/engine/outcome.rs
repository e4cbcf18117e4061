//! At-bat outcome types returned to the caller.

use serde::{Deserialize, Serialize};

use crate::engine::field::Vec2;
use crate::engine::stats::FieldingCredits;
use crate::engine::trajectory::BattedBallType;
use crate::models::{Base, BaseState, FieldPosition, PitchKind};

/// Terminal result of one at-bat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AtBatResult {
    Single,
    InfieldHit,
    Double,
    Triple,
    Homerun,
    Walk,
    HitByPitch,
    Strikeout,
    Groundout,
    Flyout,
    Lineout,
    Popout,
    DoublePlay,
    SacrificeFly,
    FieldersChoice,
    Error,
}

impl AtBatResult {
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            AtBatResult::Single
                | AtBatResult::InfieldHit
                | AtBatResult::Double
                | AtBatResult::Triple
                | AtBatResult::Homerun
        )
    }

    /// Counts as an at-bat for batting average purposes.
    pub fn is_at_bat(&self) -> bool {
        !matches!(
            self,
            AtBatResult::Walk | AtBatResult::HitByPitch | AtBatResult::SacrificeFly
        )
    }

    /// Outs charged to the offense by the play itself.
    pub fn outs_added(&self) -> u8 {
        match self {
            AtBatResult::Strikeout
            | AtBatResult::Groundout
            | AtBatResult::Flyout
            | AtBatResult::Lineout
            | AtBatResult::Popout
            | AtBatResult::SacrificeFly
            | AtBatResult::FieldersChoice => 1,
            AtBatResult::DoublePlay => 2,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AtBatResult::Single => "single",
            AtBatResult::InfieldHit => "infield hit",
            AtBatResult::Double => "double",
            AtBatResult::Triple => "triple",
            AtBatResult::Homerun => "home run",
            AtBatResult::Walk => "walk",
            AtBatResult::HitByPitch => "hit by pitch",
            AtBatResult::Strikeout => "strikeout",
            AtBatResult::Groundout => "groundout",
            AtBatResult::Flyout => "flyout",
            AtBatResult::Lineout => "lineout",
            AtBatResult::Popout => "popout",
            AtBatResult::DoublePlay => "double play",
            AtBatResult::SacrificeFly => "sacrifice fly",
            AtBatResult::FieldersChoice => "fielder's choice",
            AtBatResult::Error => "reached on error",
        }
    }
}

/// A stolen-base attempt resolved before the at-bat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StealEvent {
    pub runner_id: String,
    pub from: Base,
    pub to: Base,
    pub success: bool,
}

/// Everything the caller learns from one at-bat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtBatOutcome {
    pub result: AtBatResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batted_ball_type: Option<BattedBallType>,
    /// Fielder who made the play (putout, pickup or error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fielder_position: Option<FieldPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_deg: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_angle_deg: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_velocity_kmh: Option<f32>,

    pub bases_before: BaseState,
    pub outs_before: u8,

    pub fielding_credits: FieldingCredits,
    pub runs_scored: u32,
    pub rbi: u32,
    pub new_base_state: BaseState,
    /// Outs after the play, including any pre-at-bat caught stealing.
    pub outs_after: u8,

    pub pitch_type: PitchKind,
    pub pitch_location: Vec2,

    /// Stolen base or caught stealing resolved before this at-bat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_play: Option<StealEvent>,

    /// The tick loop hit its cap and the play was settled by rule.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub forced_resolution: bool,
    /// A missing or malformed defender was replaced by the neutral dummy.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub used_substitute: bool,
}
