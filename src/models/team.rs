//! Team and the player-within-team record.

use crate::models::player::{Player, Ranking};
use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// A player placed on a team. Carries the derived `points` for display and
/// point-sum recomputation, plus the per-session `paid` flag.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ranking: Ranking,
    #[serde(default)]
    pub image: Option<String>,
    /// Missing on the wire means 0.
    #[serde(default)]
    pub points: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub paid: bool,
}

impl From<&Player> for TeamPlayer {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            ranking: p.ranking,
            image: p.image.clone(),
            points: p.points(),
            paid: false,
        }
    }
}

/// One team of a session. `total_points` must equal the sum of member points.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub players: Vec<TeamPlayer>,
    #[serde(default)]
    pub total_points: u32,
}

impl Team {
    /// Empty team with the given id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            players: Vec::new(),
            total_points: 0,
        }
    }

    /// Sum of member points as currently listed.
    pub fn point_sum(&self) -> u32 {
        self.players.iter().map(|p| p.points).sum()
    }

    /// Reset `total_points` from the member list.
    pub fn recompute_total(&mut self) {
        self.total_points = self.point_sum();
    }

    pub fn position_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn get_player_mut(&mut self, player_id: &str) -> Option<&mut TeamPlayer> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }
}
