//! Runtime configuration from environment variables.
//!
//! HOST, PORT, ADMIN_PASSWORD, DATA_FILE, MAX_TEAMS, DEFAULT_TEAMS,
//! HISTORY_LIMIT, SESSION_KEY. Unset or unparsable values use the defaults.

use std::path::PathBuf;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret for admin mode; admin mode is unavailable when unset.
    pub admin_password: Option<String>,
    /// JSON snapshot file; sessions are kept in memory only when unset.
    pub data_file: Option<PathBuf>,
    pub max_teams: usize,
    pub default_teams: usize,
    /// How many past sessions the history endpoint returns.
    pub history_limit: usize,
    /// Cookie signing key material (at least 64 bytes); random per process when unset.
    pub session_key: Option<Vec<u8>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_password: None,
            data_file: None,
            max_teams: 20,
            default_teams: 2,
            history_limit: 20,
            session_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (used by `from_env`, and by tests with a map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| non_empty(key).and_then(|v| v.trim().parse::<usize>().ok());

        let max_teams = parsed("MAX_TEAMS").filter(|n| *n >= 1).unwrap_or(defaults.max_teams);
        let default_teams = parsed("DEFAULT_TEAMS")
            .unwrap_or(defaults.default_teams)
            .clamp(1, max_teams);

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            admin_password: non_empty("ADMIN_PASSWORD"),
            data_file: non_empty("DATA_FILE").map(PathBuf::from),
            max_teams,
            default_teams,
            history_limit: parsed("HISTORY_LIMIT").unwrap_or(defaults.history_limit),
            session_key: non_empty("SESSION_KEY")
                .map(String::into_bytes)
                .filter(|k| k.len() >= 64),
        }
    }

    /// Team count for a request: `requested` clamped to `1..=max_teams`,
    /// or the default when absent or zero.
    pub fn clamp_team_count(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.default_teams,
            Some(n) if n < 1 => 1,
            Some(n) => (n as u64).min(self.max_teams as u64) as usize,
        }
    }

    /// True if admin mode is configured and `candidate` matches it.
    pub fn check_admin_password(&self, candidate: &str) -> bool {
        matches!(&self.admin_password, Some(p) if p == candidate)
    }
}

/// Leading integer of a requested team count: numbers are truncated, strings
/// keep their leading (optionally signed) digits, so `"3.7"` and `"3abc"` give 3.
/// Anything without leading digits is `None`.
pub fn parse_team_count(raw: &serde_json::Value) -> Option<i64> {
    match raw {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim_start();
            let (sign, rest) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}
