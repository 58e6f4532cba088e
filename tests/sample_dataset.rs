//! Integration tests against the bundled sample dataset in `data/`.
//!
//! These go through the same loader the binaries use.

use character_ranking::{
    generation_breakdown, latest_changes, load_repository, validate_and_report, vote_summary,
    CharacterId, Config, Generation, HistoryPoint, RankChangeDirection, RankingRepository,
};
use std::path::PathBuf;

fn sample_config() -> Config {
    let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    Config {
        characters_path: data_dir.join("characters.json"),
        rankings_path: data_dir.join("ranking_data.json"),
        ..Config::default()
    }
}

/// Helper: load data/characters.json + data/ranking_data.json
fn sample_repo() -> RankingRepository {
    load_repository(&sample_config()).expect("sample dataset should load")
}

const KIRIMI_CHAN: CharacterId = CharacterId(12);
const WISH_ME_MELL: CharacterId = CharacterId(13);

#[test]
fn test_sample_dataset_is_clean() {
    let config = sample_config();
    let repo = load_repository(&config).unwrap();

    let report = validate_and_report(&config, repo.catalog(), repo.dataset());
    assert!(report.is_clean(), "{:?}", report.issues);
    assert_eq!(report.years_checked, 5);
    assert_eq!(report.entries_checked, 50);
}

#[test]
fn test_years_and_catalog() {
    let repo = sample_repo();

    assert_eq!(repo.available_years(), vec![2021, 2022, 2023, 2024, 2025]);
    assert_eq!(repo.characters().len(), 13);
    assert_eq!(repo.characters()[0].name, "Hello Kitty");
    assert_eq!(repo.character_name(CharacterId(5)), "Cinnamoroll");
    assert_eq!(repo.character_name(CharacterId(500)), "Unknown");
}

#[test]
fn test_rankings_are_strictly_ascending() {
    let repo = sample_repo();

    for year in repo.available_years() {
        let ranks: Vec<u32> = repo.ranking_by_year(year).iter().map(|e| e.rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]), "year {}", year);
    }
}

#[test]
fn test_top_characters_prefix_of_ranking() {
    let repo = sample_repo();

    let top = repo.top_characters(2025, 5);
    let ranking = repo.ranking_by_year(2025);
    assert_eq!(top.len(), 5);
    for (item, entry) in top.iter().zip(ranking) {
        assert_eq!(&item.entry, entry);
        assert_eq!(item.character.as_ref().unwrap().id, entry.character_id);
    }

    assert_eq!(repo.top_characters(2025, 100).len(), 10);
    assert!(repo.top_characters(2030, 10).is_empty());
}

#[test]
fn test_history_of_new_character_is_sparse() {
    let repo = sample_repo();

    assert_eq!(
        repo.character_ranking_history(WISH_ME_MELL),
        vec![HistoryPoint {
            year: 2025,
            rank: 7,
            votes: 1_900_000
        }]
    );
}

#[test]
fn test_history_matches_rankings() {
    let repo = sample_repo();

    for character in repo.characters() {
        for point in repo.character_ranking_history(character.id) {
            let entry = repo
                .ranking_by_year(point.year)
                .iter()
                .find(|e| e.character_id == character.id)
                .unwrap();
            assert_eq!((entry.rank, entry.votes), (point.rank, point.votes));
        }
    }
}

#[test]
fn test_latest_rank_changes() {
    let repo = sample_repo();

    let changes = repo.ranking_changes(2025, 2024);
    assert_eq!(changes.len(), 10);

    let kuromi = changes
        .iter()
        .find(|c| c.entry.character_id == CharacterId(6))
        .unwrap();
    assert_eq!(kuromi.previous_rank, Some(5));
    assert_eq!(kuromi.change, Some(1));
    assert_eq!(kuromi.direction(), RankChangeDirection::Up);

    let newcomer = changes
        .iter()
        .find(|c| c.entry.character_id == WISH_ME_MELL)
        .unwrap();
    assert_eq!(newcomer.previous_rank, None);
    assert_eq!(newcomer.change, None);

    assert_eq!(latest_changes(&repo, 30), changes);
}

/// Known limitation: a character that charted in the previous year but not
/// in the current one is not reported as a drop-out.
#[test]
fn test_dropped_out_characters_are_not_reported() {
    let repo = sample_repo();

    assert!(repo
        .ranking_by_year(2024)
        .iter()
        .any(|e| e.character_id == KIRIMI_CHAN));

    let changes = repo.ranking_changes(2025, 2024);
    assert!(changes.iter().all(|c| c.entry.character_id != KIRIMI_CHAN));
}

#[test]
fn test_vote_summary() {
    let repo = sample_repo();

    let summary = vote_summary(&repo);
    assert_eq!(summary.max_votes, Some(27_850_000));
    assert_eq!(summary.min_votes, Some(13_930_000));

    let expected = (27_850_000.0 - 13_930_000.0) / 13_930_000.0 * 100.0;
    assert!((summary.total_growth.unwrap() - expected).abs() < 1e-9);
    assert!(summary.max_growth_rate.unwrap() >= summary.min_growth_rate.unwrap());
}

#[test]
fn test_generation_breakdown_2025() {
    let repo = sample_repo();

    let counts: Vec<(Generation, usize)> = generation_breakdown(&repo, 2025, 30)
        .iter()
        .map(|g| (g.generation, g.members.len()))
        .collect();

    assert_eq!(
        counts,
        vec![
            (Generation::New, 1),
            (Generation::MidCareer, 2),
            (Generation::Veteran, 4),
            (Generation::Legend, 3),
        ]
    );
}

#[test]
fn test_queries_are_idempotent() {
    let repo = sample_repo();

    assert_eq!(repo.available_years(), repo.available_years());
    assert_eq!(repo.top_characters(2023, 5), repo.top_characters(2023, 5));
    assert_eq!(
        repo.character_ranking_history(CharacterId(4)),
        repo.character_ranking_history(CharacterId(4))
    );
    assert_eq!(repo.ranking_changes(2023, 2022), repo.ranking_changes(2023, 2022));
}
