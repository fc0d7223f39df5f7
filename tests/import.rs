//! Integration tests for CSV player import.

use team_balancer_web::{import_players_csv, Ranking};

#[test]
fn imports_rows_with_header() {
    let csv = "Name,Rank,Image\nAnn,S,http://img/ann.png\nBob,a,\nCat,,\nDan,unranked,  \n";
    let players = import_players_csv(csv.as_bytes()).unwrap();

    let summary: Vec<(&str, &str, Ranking)> = players
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str(), p.ranking))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("p-1", "Ann", Ranking::S),
            ("p-2", "Bob", Ranking::A),
            ("p-3", "Cat", Ranking::Unranked),
            ("p-4", "Dan", Ranking::Unranked),
        ]
    );
    assert_eq!(players[0].image.as_deref(), Some("http://img/ann.png"));
    assert!(players[1..].iter().all(|p| p.image.is_none()));
}

#[test]
fn finds_columns_by_alias_in_any_order() {
    let csv = "Photo,Tier,Player Name\nhttp://x/1.png,B,Eve\n,C,Fay\n";
    let players = import_players_csv(csv.as_bytes()).unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Eve");
    assert_eq!(players[0].ranking, Ranking::B);
    assert_eq!(players[0].image.as_deref(), Some("http://x/1.png"));
    assert_eq!(players[1].image, None);
}

#[test]
fn headerless_rows_are_positional_and_first_row_is_kept() {
    let csv = "Ann,S\nBob,B,http://img/bob.png\n";
    let players = import_players_csv(csv.as_bytes()).unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Ann");
    assert_eq!(players[0].ranking, Ranking::S);
    assert_eq!(players[1].image.as_deref(), Some("http://img/bob.png"));
}

#[test]
fn skips_blank_names_and_repeated_headers() {
    let csv = "Name,Ranking\n,S\nName,Ranking\nGus,C\n";
    let players = import_players_csv(csv.as_bytes()).unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "p-1");
    assert_eq!(players[0].name, "Gus");
}

#[test]
fn empty_input_gives_no_players() {
    assert!(import_players_csv("".as_bytes()).unwrap().is_empty());
    assert!(import_players_csv("Name,Rank\n".as_bytes()).unwrap().is_empty());
}
