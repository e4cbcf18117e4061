//! Player data for the at-bat engine.
//!
//! Attribute bundles use the 0..=100 scale everywhere except raw pitch
//! velocity, which is km/h. The engine never mutates a `Player`.

use serde::{Deserialize, Serialize};

use super::position::{FieldPosition, Handedness};

/// Batting attribute bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattingAttributes {
    pub contact: u8,
    pub power: u8,
    /// Swing plane class 1..=4; higher lofts the ball and carries it farther.
    pub trajectory: u8,
    pub speed: u8,
    pub arm: u8,
    pub fielding: u8,
    pub catching: u8,
    /// Plate discipline.
    pub eye: u8,
}

impl Default for BattingAttributes {
    fn default() -> Self {
        Self {
            contact: 50,
            power: 50,
            trajectory: 2,
            speed: 50,
            arm: 50,
            fielding: 50,
            catching: 50,
            eye: 50,
        }
    }
}

impl BattingAttributes {
    /// Trajectory class clamped to the valid 1..=4 range.
    pub fn trajectory_class(&self) -> usize {
        (self.trajectory.clamp(1, 4) - 1) as usize
    }
}

/// One pitch in a repertoire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub kind: PitchKind,
    /// Break quality 0..=7. Level 5+ marks an out pitch.
    pub level: u8,
}

/// Pitch repertoire entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchKind {
    Fastball,
    Slider,
    Curve,
    Fork,
    Sinker,
    Changeup,
    Shuuto,
    Cutter,
}

impl PitchKind {
    /// Pitches that drag the launch angle down when they beat the swing.
    pub fn is_sinking(&self) -> bool {
        matches!(self, PitchKind::Sinker | PitchKind::Fork)
    }

    /// Pitches whose break bleeds exit velocity.
    pub fn is_breaking(&self) -> bool {
        !matches!(self, PitchKind::Fastball)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PitchKind::Fastball => "fastball",
            PitchKind::Slider => "slider",
            PitchKind::Curve => "curve",
            PitchKind::Fork => "fork",
            PitchKind::Sinker => "sinker",
            PitchKind::Changeup => "changeup",
            PitchKind::Shuuto => "shuuto",
            PitchKind::Cutter => "cutter",
        }
    }
}

/// Pitching attribute bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchingAttributes {
    pub velocity_kmh: f32,
    pub control: u8,
    pub pitches: Vec<Pitch>,
    pub stamina: u8,
    pub mental_toughness: u8,
    pub arm: u8,
    pub fielding: u8,
    pub catching: u8,
}

impl Default for PitchingAttributes {
    fn default() -> Self {
        Self {
            velocity_kmh: 145.0,
            control: 50,
            pitches: vec![
                Pitch { kind: PitchKind::Fastball, level: 3 },
                Pitch { kind: PitchKind::Slider, level: 3 },
            ],
            stamina: 50,
            mental_toughness: 50,
            arm: 50,
            fielding: 50,
            catching: 50,
        }
    }
}

impl PitchingAttributes {
    /// Best secondary-pitch level; 0 for a fastball-only arm.
    pub fn best_breaking_level(&self) -> u8 {
        self.pitches
            .iter()
            .filter(|p| p.kind.is_breaking())
            .map(|p| p.level)
            .max()
            .unwrap_or(0)
    }

    /// Whether the repertoire carries an out pitch (level 5+).
    pub fn has_finisher(&self) -> bool {
        self.pitches.iter().any(|p| p.level >= 5)
    }

    /// Strongest sinking-pitch level (sinker or fork).
    pub fn sinker_level(&self) -> u8 {
        self.pitches
            .iter()
            .filter(|p| p.kind.is_sinking())
            .map(|p| p.level)
            .max()
            .unwrap_or(0)
    }
}

/// An individual player as the engine sees one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub position: FieldPosition,
    pub bats: Handedness,
    pub throws: Handedness,
    pub batting: BattingAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitching: Option<PitchingAttributes>,
}

impl Player {
    /// League-average player, used as the neutral dummy substitute and in
    /// test fixtures.
    pub fn neutral(id: &str, position: FieldPosition) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            age: 27,
            position,
            bats: Handedness::Right,
            throws: Handedness::Right,
            batting: BattingAttributes::default(),
            pitching: if position == FieldPosition::Pitcher {
                Some(PitchingAttributes::default())
            } else {
                None
            },
        }
    }

    /// Defensive skill bundle for the given position assignment.
    ///
    /// Pitchers field with their pitching-side ratings when present.
    pub fn defense_skill(&self) -> DefenseSkill {
        if let Some(p) = &self.pitching {
            if self.position == FieldPosition::Pitcher {
                return DefenseSkill {
                    fielding: p.fielding,
                    catching: p.catching,
                    arm: p.arm,
                    speed: self.batting.speed,
                };
            }
        }
        DefenseSkill {
            fielding: self.batting.fielding,
            catching: self.batting.catching,
            arm: self.batting.arm,
            speed: self.batting.speed,
        }
    }
}

/// The four ratings the fielding simulation reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenseSkill {
    pub fielding: u8,
    pub catching: u8,
    pub arm: u8,
    pub speed: u8,
}

impl Default for DefenseSkill {
    fn default() -> Self {
        Self { fielding: 50, catching: 50, arm: 50, speed: 50 }
    }
}

impl DefenseSkill {
    /// Replace any out-of-band rating with the neutral 50.
    ///
    /// Attributes arrive from external data; a corrupt value must not poison
    /// the physics.
    pub fn sanitized(self) -> Self {
        fn ok(v: u8) -> u8 {
            if v <= 100 {
                v
            } else {
                50
            }
        }
        Self {
            fielding: ok(self.fielding),
            catching: ok(self.catching),
            arm: ok(self.arm),
            speed: ok(self.speed),
        }
    }
}
