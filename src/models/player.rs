//! Player and Ranking data structures.

use serde::{Deserialize, Serialize};

/// Skill tier of a player: S (highest) > A > B > C > Unranked.
///
/// Deserialization is lenient: anything that is not `S`, `A`, `B` or `C`
/// (case-insensitive, surrounding whitespace ignored) becomes `Unranked`,
/// including `null`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Ranking {
    S,
    A,
    B,
    C,
    #[default]
    Unranked,
}

impl Ranking {
    /// Balancing weight of this tier.
    pub fn points(self) -> u32 {
        match self {
            Ranking::S => 4,
            Ranking::A => 3,
            Ranking::B => 2,
            Ranking::C => 1,
            Ranking::Unranked => 0,
        }
    }

    /// Parse a raw cell or wire value into a ranking.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "S" => Ranking::S,
            "A" => Ranking::A,
            "B" => Ranking::B,
            "C" => Ranking::C,
            _ => Ranking::Unranked,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ranking::S => "S",
            Ranking::A => "A",
            Ranking::B => "B",
            Ranking::C => "C",
            Ranking::Unranked => "Unranked",
        }
    }
}

impl From<Option<String>> for Ranking {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Ranking::parse).unwrap_or_default()
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player as loaded from the roster source. Immutable once loaded.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique within one player list.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ranking: Ranking,
    #[serde(default)]
    pub image: Option<String>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ranking: Ranking) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ranking,
            image: None,
        }
    }

    /// Derived balancing weight; never stored on the player itself.
    pub fn points(&self) -> u32 {
        self.ranking.points()
    }
}
