//! Defensive stat attribution: putouts, assists and errors per play.

use serde::{Deserialize, Serialize};

use crate::models::FieldPosition;

/// Defensive credits for one resolved play.
///
/// Positions may repeat: the pivot man on a twin killing takes both a putout
/// and an assist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldingCredits {
    pub putouts: Vec<FieldPosition>,
    pub assists: Vec<FieldPosition>,
    pub errors: Vec<FieldPosition>,
}

impl FieldingCredits {
    pub fn none() -> Self {
        Self::default()
    }

    /// Strikeout: the catcher owns the putout, nobody assists.
    pub fn strikeout() -> Self {
        Self { putouts: vec![FieldPosition::Catcher], ..Default::default() }
    }

    /// Unassisted out: fielder steps on the bag or tags the runner himself.
    pub fn unassisted(fielder: FieldPosition) -> Self {
        Self { putouts: vec![fielder], ..Default::default() }
    }

    /// Routine groundout: fielder throws, the bag man records the out.
    pub fn ground_out(fielder: FieldPosition, bag_man: FieldPosition) -> Self {
        if fielder == bag_man {
            return Self::unassisted(fielder);
        }
        Self {
            putouts: vec![bag_man],
            assists: vec![fielder],
            errors: Vec::new(),
        }
    }

    /// Double play through the pivot: e.g. 6-4-3 records an assist for the
    /// shortstop, putout + assist for the second baseman, putout at first.
    pub fn double_play(
        fielder: FieldPosition,
        pivot: FieldPosition,
        bag_man: FieldPosition,
    ) -> Self {
        Self {
            putouts: vec![pivot, bag_man],
            assists: vec![fielder, pivot],
            errors: Vec::new(),
        }
    }

    /// Fly, liner or popup hauled in.
    pub fn air_out(fielder: FieldPosition) -> Self {
        Self::unassisted(fielder)
    }

    /// Runner cut down on the bases after a clean hit: every relay hand gets
    /// an assist, the tagger the putout.
    pub fn runner_cut_down(relays: &[FieldPosition], tagger: FieldPosition) -> Self {
        Self {
            putouts: vec![tagger],
            assists: relays.to_vec(),
            errors: Vec::new(),
        }
    }

    /// Caught stealing: battery assist, tag at the bag.
    pub fn caught_stealing(receiver: FieldPosition) -> Self {
        Self {
            putouts: vec![receiver],
            assists: vec![FieldPosition::Catcher],
            errors: Vec::new(),
        }
    }

    /// A catchable ball put on the grass. The misser wears it; retrievers
    /// never do.
    pub fn error_on(fielder: FieldPosition) -> Self {
        Self { errors: vec![fielder], ..Default::default() }
    }

    /// Fold another play segment into this one.
    pub fn merge(&mut self, other: FieldingCredits) {
        self.putouts.extend(other.putouts);
        self.assists.extend(other.assists);
        self.errors.extend(other.errors);
    }

    pub fn outs_recorded(&self) -> usize {
        self.putouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.putouts.is_empty() && self.assists.is_empty() && self.errors.is_empty()
    }
}
