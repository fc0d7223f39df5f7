//! Team balancing: stable sort by points, then snake draft.

use crate::models::{Player, Team, TeamPlayer, TeamsError};
use std::collections::HashSet;

/// Id of the team at zero-based index `index` (`team-1`, `team-2`, ...).
pub fn team_id(index: usize) -> String {
    format!("team-{}", index + 1)
}

/// Display name of the team at zero-based index `index` (`Team 1`, ...).
pub fn team_name(index: usize) -> String {
    format!("Team {}", index + 1)
}

/// Split `players` into `num_teams` teams with similar point totals.
///
/// 1. Compute points from each ranking.
/// 2. Stable sort by points descending; equal points keep input order.
/// 3. Snake draft: team index runs 0..n-1, then n-1..0, bouncing at both ends.
///
/// Deterministic: the same input order always yields the same partition.
pub fn balance(players: &[Player], num_teams: usize) -> Result<Vec<Team>, TeamsError> {
    if num_teams < 1 {
        return Err(TeamsError::invalid("numTeams must be at least 1"));
    }
    let mut seen = HashSet::with_capacity(players.len());
    for p in players {
        if !seen.insert(p.id.as_str()) {
            return Err(TeamsError::invalid(format!("duplicate player id '{}'", p.id)));
        }
    }

    let mut ranked: Vec<TeamPlayer> = players.iter().map(TeamPlayer::from).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.points.cmp(&a.points));

    let mut teams: Vec<Team> = (0..num_teams)
        .map(|i| Team::new(team_id(i), team_name(i)))
        .collect();

    for (index, player) in SnakeOrder::new(num_teams).zip(ranked) {
        let team = &mut teams[index];
        team.total_points += player.points;
        team.players.push(player);
    }

    Ok(teams)
}

/// Endless team-index sequence 0,1,..,n-1,n-1,..,0,0,1,..
struct SnakeOrder {
    len: usize,
    next: usize,
    forward: bool,
}

impl SnakeOrder {
    fn new(len: usize) -> Self {
        Self {
            len,
            next: 0,
            forward: true,
        }
    }
}

impl Iterator for SnakeOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next;
        if self.forward {
            if current + 1 >= self.len {
                self.forward = false;
            } else {
                self.next = current + 1;
            }
        } else if current == 0 {
            self.forward = true;
        } else {
            self.next = current - 1;
        }
        Some(current)
    }
}
