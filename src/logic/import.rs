//! Player import: normalize tabular rows (CSV) into player records.

use crate::models::{Player, Ranking, TeamsError};
use std::io::Read;

const NAME_HEADERS: &[&str] = &["name", "player", "playername"];
const RANKING_HEADERS: &[&str] = &["ranking", "rank", "tier"];
const IMAGE_HEADERS: &[&str] = &["image", "picture", "photo", "avatar", "img"];

/// Cell values that are column labels rather than player names.
const HEADER_LABELS: &[&str] = &[
    "name", "rank", "ranking", "tier", "image", "picture", "photo", "avatar", "player",
    "playername",
];

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn is_header_label(s: &str) -> bool {
    HEADER_LABELS.contains(&normalize_label(s).as_str())
}

fn find_column(header: &csv::StringRecord, variants: &[&str]) -> Option<usize> {
    variants
        .iter()
        .find_map(|v| header.iter().position(|cell| normalize_label(cell) == *v))
}

/// Column positions for name, ranking and (optional) image.
#[derive(Debug, Eq, PartialEq)]
struct Columns {
    name: usize,
    ranking: usize,
    image: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Self {
        let name = find_column(header, NAME_HEADERS).unwrap_or(0);
        let ranking = find_column(header, RANKING_HEADERS)
            .unwrap_or(if header.len() > 1 { 1 } else { 0 });
        Self {
            name,
            ranking,
            image: find_column(header, IMAGE_HEADERS),
        }
    }

    fn positional() -> Self {
        Self {
            name: 0,
            ranking: 1,
            image: Some(2),
        }
    }
}

/// Read players from CSV text.
///
/// If the first row contains any known column label it is treated as the
/// header; otherwise columns are positional (name, ranking, image) and the
/// first row is a player. Rows with an empty name, or a name that is itself a
/// column label, are skipped. Ids are `p-1`, `p-2`, ... over accepted rows.
pub fn import_players_csv<R: Read>(reader: R) -> Result<Vec<Player>, TeamsError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = rdr.records();
    let first = match records.next() {
        Some(r) => r.map_err(|e| TeamsError::invalid(format!("malformed CSV: {}", e)))?,
        None => return Ok(Vec::new()),
    };

    let has_header = first.iter().any(is_header_label);
    let (columns, pending_first) = if has_header {
        (Columns::from_header(&first), None)
    } else {
        (Columns::positional(), Some(first))
    };

    let mut players = Vec::new();
    let rows = pending_first.into_iter().map(Ok).chain(records);
    for row in rows {
        let row = row.map_err(|e| TeamsError::invalid(format!("malformed CSV: {}", e)))?;
        let name = row.get(columns.name).unwrap_or("").trim();
        if name.is_empty() || is_header_label(name) {
            continue;
        }
        let ranking = Ranking::parse(row.get(columns.ranking).unwrap_or(""));
        let image = columns
            .image
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        players.push(Player {
            id: format!("p-{}", players.len() + 1),
            name: name.to_string(),
            ranking,
            image,
        });
    }

    log::debug!("Imported {} player(s) from CSV", players.len());
    Ok(players)
}
