//! Pre-contact plate appearance: pitch selection and the walk / strikeout /
//! hit-by-pitch roll that happens before a ball is ever put in play.
//!
//! The at-bat is the simulation unit, so the whole confrontation collapses
//! into one cumulative-threshold roll in a fixed order: HBP, walk, strikeout.

use rand::Rng;

use crate::engine::field::Vec2;
use crate::models::{BattingAttributes, GameContext, Pitch, PitchKind, PitchingAttributes};

/// Outcome decided before the ball is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreContactOutcome {
    HitByPitch,
    Walk,
    Strikeout,
}

/// The decisive pitch of the at-bat, reported on every outcome.
#[derive(Debug, Clone, Copy)]
pub struct PitchSelection {
    pub pitch: Pitch,
    /// Plate location in meters relative to the zone center; x is the
    /// batter's glove side, y is height above the zone midline.
    pub location: Vec2,
    /// Control after fatigue, 0.0..=1.0.
    pub effective_control: f32,
    /// Velocity after fatigue (km/h).
    pub effective_velocity_kmh: f32,
}

/// Half-width of the strike zone (m); locations are sampled around it.
const ZONE_HALF_WIDTH_M: f32 = 0.22;
const ZONE_HALF_HEIGHT_M: f32 = 0.30;

/// Location scatter at control=0 and how much control shrinks it.
const SCATTER_BASE_M: f32 = 0.34;
const SCATTER_CONTROL_RANGE_M: f32 = 0.20;

/// Season-fatigue knee: below this many remaining days a tired arm fades.
const FATIGUE_SEASON_KNEE_DAYS: u16 = 30;
/// Maximum control/velocity fade from fatigue.
const FATIGUE_MAX_FADE: f32 = 0.12;

/// Pre-contact rate shape. Cumulative roll order is fixed: HBP, walk, K.
const HBP_BASE: f32 = 0.012;
const HBP_CONTROL_RELIEF: f32 = 0.008;

const WALK_SCALE: f32 = 0.14;
const WALK_CONTROL_SUPPRESSION: f32 = 0.6;
const WALK_EYE_BASE: f32 = 0.7;
const WALK_EYE_RANGE: f32 = 0.6;

const K_BASE: f32 = 0.085;
const K_VELOCITY_RANGE: f32 = 0.16;
const K_CONTROL_RANGE: f32 = 0.07;
const K_CONTACT_RELIEF: f32 = 0.12;
const K_EYE_RELIEF: f32 = 0.05;
const K_FINISHER_BONUS_PER_LEVEL: f32 = 0.012;

/// Velocity band mapped onto the strikeout factor (km/h).
const VELOCITY_FLOOR_KMH: f32 = 125.0;
const VELOCITY_SPAN_KMH: f32 = 40.0;

/// Select the decisive pitch: level-weighted among the repertoire, with the
/// fastball as the fallback for an empty book.
pub fn select_pitch<R: Rng>(
    pitching: &PitchingAttributes,
    ctx: &GameContext,
    rng: &mut R,
) -> PitchSelection {
    let fade = fatigue_fade(pitching, ctx);
    let effective_control = (pitching.control as f32 / 100.0 * (1.0 - fade)).clamp(0.0, 1.0);
    let effective_velocity_kmh = pitching.velocity_kmh * (1.0 - 0.5 * fade);

    let pitch = if pitching.pitches.is_empty() {
        Pitch { kind: PitchKind::Fastball, level: 0 }
    } else {
        // Weight by level + 1 so a level-0 offering still gets thrown.
        let total: u32 = pitching.pitches.iter().map(|p| p.level as u32 + 1).sum();
        let mut pick = rng.gen_range(0..total);
        let mut chosen = pitching.pitches[0];
        for p in &pitching.pitches {
            let w = p.level as u32 + 1;
            if pick < w {
                chosen = *p;
                break;
            }
            pick -= w;
        }
        chosen
    };

    let scatter = SCATTER_BASE_M - SCATTER_CONTROL_RANGE_M * effective_control;
    let location = Vec2::new(
        (rng.gen::<f32>() * 2.0 - 1.0) * (ZONE_HALF_WIDTH_M + scatter),
        (rng.gen::<f32>() * 2.0 - 1.0) * (ZONE_HALF_HEIGHT_M + scatter),
    );

    PitchSelection { pitch, location, effective_control, effective_velocity_kmh }
}

/// Roll the pre-contact outcome. `None` means the ball is put in play.
pub fn roll_pre_contact<R: Rng>(
    batter: &BattingAttributes,
    pitching: &PitchingAttributes,
    selection: &PitchSelection,
    rng: &mut R,
) -> Option<PreContactOutcome> {
    let control = selection.effective_control;
    let eye = batter.eye as f32 / 100.0;
    let contact = batter.contact as f32 / 100.0;

    let hbp = (HBP_BASE - HBP_CONTROL_RELIEF * control).max(0.001);
    let walk = WALK_SCALE
        * (1.0 - WALK_CONTROL_SUPPRESSION * control)
        * (WALK_EYE_BASE + WALK_EYE_RANGE * eye);

    let velocity01 =
        ((selection.effective_velocity_kmh - VELOCITY_FLOOR_KMH) / VELOCITY_SPAN_KMH).clamp(0.0, 1.0);
    let finisher_bonus = pitching
        .pitches
        .iter()
        .filter(|p| p.level >= 5)
        .map(|p| K_FINISHER_BONUS_PER_LEVEL * (p.level - 4) as f32)
        .fold(0.0_f32, f32::max);
    let strikeout = (K_BASE + K_VELOCITY_RANGE * velocity01 + K_CONTROL_RANGE * control
        - K_CONTACT_RELIEF * (contact - 0.5)
        - K_EYE_RELIEF * (eye - 0.5)
        + finisher_bonus)
        .clamp(0.02, 0.55);

    // Fixed order matters for stream reproducibility.
    let roll: f32 = rng.gen();
    if roll < hbp {
        Some(PreContactOutcome::HitByPitch)
    } else if roll < hbp + walk {
        Some(PreContactOutcome::Walk)
    } else if roll < hbp + walk + strikeout {
        Some(PreContactOutcome::Strikeout)
    } else {
        None
    }
}

/// Control/velocity fade from stamina and the grind of the season.
///
/// Mental toughness damps the fade late in games.
fn fatigue_fade(pitching: &PitchingAttributes, ctx: &GameContext) -> f32 {
    let stamina01 = pitching.stamina as f32 / 100.0;
    let season = if ctx.season_days_left < FATIGUE_SEASON_KNEE_DAYS {
        1.0 - ctx.season_days_left as f32 / FATIGUE_SEASON_KNEE_DAYS as f32
    } else {
        0.0
    };
    let mut fade = FATIGUE_MAX_FADE * season * (1.0 - 0.6 * stamina01);
    if ctx.is_late_inning() {
        let grit = pitching.mental_toughness as f32 / 100.0;
        fade += 0.02 * (1.0 - grit);
    }
    fade.clamp(0.0, FATIGUE_MAX_FADE)
}
