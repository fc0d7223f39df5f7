//! Roster mutations after generation: swap two players or move one to another team.
//!
//! Both operations are copy-on-write: they read a partition and return a new one,
//! leaving the input untouched. Totals of the affected teams are recomputed.

use crate::models::{Team, TeamsError};

/// (team index, player index) of a player in the partition.
fn locate(teams: &[Team], player_id: &str) -> Result<(usize, usize), TeamsError> {
    teams
        .iter()
        .enumerate()
        .find_map(|(ti, t)| t.position_of(player_id).map(|pi| (ti, pi)))
        .ok_or_else(|| TeamsError::invalid(format!("unknown player '{}'", player_id)))
}

/// Drop player `dragged_id` onto player `target_id`.
///
/// Same team: `dragged` is removed and re-inserted at the target's index, so it
/// takes the target's slot and the players in between shift by one.
/// Different teams: the two players exchange slots; team sizes are unchanged.
pub fn swap_players(
    teams: &[Team],
    dragged_id: &str,
    target_id: &str,
) -> Result<Vec<Team>, TeamsError> {
    let (from_team, from_pos) = locate(teams, dragged_id)?;
    let (to_team, to_pos) = locate(teams, target_id)?;
    let mut next = teams.to_vec();

    if from_team == to_team {
        if from_pos != to_pos {
            let players = &mut next[from_team].players;
            let dragged = players.remove(from_pos);
            players.insert(to_pos, dragged);
        }
        return Ok(next);
    }

    let dragged = teams[from_team].players[from_pos].clone();
    let target = teams[to_team].players[to_pos].clone();
    next[from_team].players[from_pos] = target;
    next[to_team].players[to_pos] = dragged;
    next[from_team].recompute_total();
    next[to_team].recompute_total();
    Ok(next)
}

/// Drop player `player_id` onto team `team_id` (not onto a player).
///
/// The player is removed from its team and appended to the destination, so the
/// source shrinks by one and the destination grows by one. Moving a player onto
/// its own team changes nothing.
pub fn move_to_team(
    teams: &[Team],
    player_id: &str,
    team_id: &str,
) -> Result<Vec<Team>, TeamsError> {
    let (from_team, from_pos) = locate(teams, player_id)?;
    let to_team = teams
        .iter()
        .position(|t| t.id == team_id)
        .ok_or_else(|| TeamsError::invalid(format!("unknown team '{}'", team_id)))?;
    let mut next = teams.to_vec();
    if from_team == to_team {
        return Ok(next);
    }

    let player = next[from_team].players.remove(from_pos);
    next[to_team].players.push(player);
    next[from_team].recompute_total();
    next[to_team].recompute_total();
    Ok(next)
}
