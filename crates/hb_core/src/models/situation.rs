//! Game situation: baserunners, outs and context.

use serde::{Deserialize, Serialize};

use super::position::Base;

/// A runner currently on base.
///
/// Only identity and footspeed matter to the engine; everything else stays
/// with the caller's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub player_id: String,
    pub speed: u8,
}

impl Runner {
    pub fn new(player_id: impl Into<String>, speed: u8) -> Self {
        Self { player_id: player_id.into(), speed }
    }
}

/// Occupancy of the three bases.
///
/// Replaced atomically by runner resolution; the engine never mutates a
/// caller's copy in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseState {
    pub first: Option<Runner>,
    pub second: Option<Runner>,
    pub third: Option<Runner>,
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn runner_on(&self, base: Base) -> Option<&Runner> {
        match base {
            Base::First => self.first.as_ref(),
            Base::Second => self.second.as_ref(),
            Base::Third => self.third.as_ref(),
            Base::Home => None,
        }
    }

    pub fn set(&mut self, base: Base, runner: Option<Runner>) {
        match base {
            Base::First => self.first = runner,
            Base::Second => self.second = runner,
            Base::Third => self.third = runner,
            Base::Home => {}
        }
    }

    pub fn take(&mut self, base: Base) -> Option<Runner> {
        match base {
            Base::First => self.first.take(),
            Base::Second => self.second.take(),
            Base::Third => self.third.take(),
            Base::Home => None,
        }
    }

    pub fn count(&self) -> usize {
        [self.first.is_some(), self.second.is_some(), self.third.is_some()]
            .into_iter()
            .filter(|b| *b)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.count() == 3
    }

    /// Whether a ground ball forces the runner on `base`.
    pub fn is_forced(&self, base: Base) -> bool {
        match base {
            Base::First => true,
            Base::Second => self.first.is_some(),
            Base::Third => self.first.is_some() && self.second.is_some(),
            Base::Home => self.is_loaded(),
        }
    }

    /// Occupied bases, lead runner first.
    pub fn occupied(&self) -> Vec<Base> {
        let mut out = Vec::new();
        if self.third.is_some() {
            out.push(Base::Third);
        }
        if self.second.is_some() {
            out.push(Base::Second);
        }
        if self.first.is_some() {
            out.push(Base::First);
        }
        out
    }
}

/// Context the engine reads but never owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub outs: u8,
    pub inning: u8,
    /// Batting team score minus fielding team score.
    pub score_diff: i16,
    /// Days left in the season; only modulates pitcher fatigue.
    pub season_days_left: u16,
}

impl Default for GameContext {
    fn default() -> Self {
        Self { outs: 0, inning: 1, score_diff: 0, season_days_left: 120 }
    }
}

impl GameContext {
    pub fn is_late_inning(&self) -> bool {
        self.inning >= 7
    }
}
