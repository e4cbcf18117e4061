//! Team roster and lineup plan.

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::position::FieldPosition;

/// Batting order and rotation bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineupPlan {
    /// Player ids in batting order (nine entries).
    pub batting_order: Vec<String>,
    /// Player ids of the starting rotation.
    pub rotation: Vec<String>,
    /// Index into `rotation` for today's starter.
    pub rotation_index: usize,
}

impl LineupPlan {
    pub fn todays_starter(&self) -> Option<&str> {
        if self.rotation.is_empty() {
            return None;
        }
        self.rotation.get(self.rotation_index % self.rotation.len()).map(|s| s.as_str())
    }
}

/// A team as the engine sees one: a roster plus a lineup plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub roster: Vec<Player>,
    /// Ids of players on the active roster.
    pub active: Vec<String>,
    pub lineup: LineupPlan,
}

impl Team {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id == id)
    }

    /// Active player currently assigned to `position`, if any.
    pub fn starter_at(&self, position: FieldPosition) -> Option<&Player> {
        self.roster
            .iter()
            .find(|p| p.position == position && self.active.iter().any(|id| id == &p.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let lineup = LineupPlan {
            batting_order: vec![],
            rotation: vec!["a".into(), "b".into(), "c".into()],
            rotation_index: 4,
        };
        assert_eq!(lineup.todays_starter(), Some("b"));
    }

    #[test]
    fn test_starter_at_requires_active() {
        let mut team = Team::default();
        team.roster.push(Player::neutral("ss1", FieldPosition::Short));
        assert!(team.starter_at(FieldPosition::Short).is_none());
        team.active.push("ss1".into());
        assert_eq!(team.starter_at(FieldPosition::Short).unwrap().id, "ss1");
    }
}
