//! Defensive positions, bases and handedness.

use serde::{Deserialize, Serialize};

/// The nine defensive positions, scorecard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPosition {
    Pitcher,
    Catcher,
    First,
    Second,
    Third,
    Short,
    Left,
    Center,
    Right,
}

impl FieldPosition {
    /// All nine positions in scorecard order (1..=9).
    pub const ALL: [FieldPosition; 9] = [
        FieldPosition::Pitcher,
        FieldPosition::Catcher,
        FieldPosition::First,
        FieldPosition::Second,
        FieldPosition::Third,
        FieldPosition::Short,
        FieldPosition::Left,
        FieldPosition::Center,
        FieldPosition::Right,
    ];

    /// Decode the scorecard number (1=P .. 9=RF).
    pub fn from_scorecard(code: u8) -> Option<Self> {
        match code {
            1 => Some(FieldPosition::Pitcher),
            2 => Some(FieldPosition::Catcher),
            3 => Some(FieldPosition::First),
            4 => Some(FieldPosition::Second),
            5 => Some(FieldPosition::Third),
            6 => Some(FieldPosition::Short),
            7 => Some(FieldPosition::Left),
            8 => Some(FieldPosition::Center),
            9 => Some(FieldPosition::Right),
            _ => None,
        }
    }

    pub fn scorecard(&self) -> u8 {
        match self {
            FieldPosition::Pitcher => 1,
            FieldPosition::Catcher => 2,
            FieldPosition::First => 3,
            FieldPosition::Second => 4,
            FieldPosition::Third => 5,
            FieldPosition::Short => 6,
            FieldPosition::Left => 7,
            FieldPosition::Center => 8,
            FieldPosition::Right => 9,
        }
    }

    pub fn is_infield(&self) -> bool {
        matches!(
            self,
            FieldPosition::First | FieldPosition::Second | FieldPosition::Third | FieldPosition::Short
        )
    }

    pub fn is_outfield(&self) -> bool {
        matches!(self, FieldPosition::Left | FieldPosition::Center | FieldPosition::Right)
    }

    /// Infield ring members for ground-ball outs: the four infielders plus
    /// the battery.
    pub fn can_turn_ground_out(&self) -> bool {
        self.is_infield() || matches!(self, FieldPosition::Catcher)
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            FieldPosition::Pitcher => "P",
            FieldPosition::Catcher => "C",
            FieldPosition::First => "1B",
            FieldPosition::Second => "2B",
            FieldPosition::Third => "3B",
            FieldPosition::Short => "SS",
            FieldPosition::Left => "LF",
            FieldPosition::Center => "CF",
            FieldPosition::Right => "RF",
        }
    }
}

/// Bases, doubling as throw targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    First,
    Second,
    Third,
    Home,
}

impl Base {
    /// Next station on the basepaths; `None` once home is reached.
    pub fn next(&self) -> Option<Base> {
        match self {
            Base::First => Some(Base::Second),
            Base::Second => Some(Base::Third),
            Base::Third => Some(Base::Home),
            Base::Home => None,
        }
    }

    /// Bases a runner standing here still has to cross to score.
    pub fn bases_to_home(&self) -> u8 {
        match self {
            Base::First => 3,
            Base::Second => 2,
            Base::Third => 1,
            Base::Home => 0,
        }
    }
}

/// Batting or throwing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}
