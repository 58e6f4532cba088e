//! Property-based tests for the ranking queries
//!
//! Random well-formed datasets: each year ranks a random subset of
//! characters with contiguous ranks and non-increasing votes.

use character_ranking::{
    trend_series, Character, CharacterCatalog, CharacterId, RankingDataset, RankingEntry,
    RankingRepository,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

/// Ids 1..=15 are in the catalog; 16..=20 are not
fn catalog() -> CharacterCatalog {
    CharacterCatalog::new(
        (1..=15)
            .map(|id| Character::new(id, format!("Character {}", id), 1970 + id as i32))
            .collect(),
    )
}

fn year_ranking() -> impl Strategy<Value = Vec<RankingEntry>> {
    (
        Just((1u32..=20).collect::<Vec<u32>>()).prop_shuffle(),
        0usize..=20,
        prop::collection::vec(0u64..1_000, 20),
    )
        .prop_map(|(ids, len, mut votes)| {
            votes.sort_unstable_by(|a, b| b.cmp(a));
            ids.into_iter()
                .take(len)
                .enumerate()
                .map(|(i, id)| RankingEntry::new(id, i as u32 + 1, votes[i]))
                .collect()
        })
}

fn repository() -> impl Strategy<Value = RankingRepository> {
    prop::collection::btree_map(2000i32..2030, year_ranking(), 0..6).prop_map(|rankings| {
        let totals: BTreeMap<i32, u64> = rankings
            .iter()
            .map(|(&year, entries)| (year, entries.iter().map(|e| e.votes).sum()))
            .collect();
        RankingRepository::new(catalog(), RankingDataset::new(rankings, totals))
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn years_are_strictly_ascending(repo in repository()) {
        let years = repo.available_years();
        prop_assert!(years.windows(2).all(|w| w[0] < w[1]));

        let keys: Vec<i32> = repo.dataset().yearly_rankings().keys().copied().collect();
        prop_assert_eq!(years, keys);
    }

    #[test]
    fn history_matches_rankings(repo in repository(), id in 1u32..=20) {
        let id = CharacterId(id);
        let history = repo.character_ranking_history(id);

        prop_assert!(history.windows(2).all(|w| w[0].year < w[1].year));
        for point in &history {
            let entry = repo
                .ranking_by_year(point.year)
                .iter()
                .find(|e| e.character_id == id);
            prop_assert!(entry.is_some());
            let entry = entry.unwrap();
            prop_assert_eq!((entry.rank, entry.votes), (point.rank, point.votes));
        }

        let charted = repo
            .available_years()
            .into_iter()
            .filter(|&y| repo.ranking_by_year(y).iter().any(|e| e.character_id == id))
            .count();
        prop_assert_eq!(history.len(), charted);
    }

    #[test]
    fn top_characters_is_prefix(repo in repository(), year in 2000i32..2030, n in 0usize..25) {
        let ranking = repo.ranking_by_year(year);
        let top = repo.top_characters(year, n);

        prop_assert_eq!(top.len(), n.min(ranking.len()));
        for (item, entry) in top.iter().zip(ranking) {
            prop_assert_eq!(&item.entry, entry);
            prop_assert_eq!(
                item.character.is_some(),
                repo.character_info(entry.character_id).is_some()
            );
        }
    }

    #[test]
    fn changes_follow_current_year(
        repo in repository(),
        current in 2000i32..2030,
        previous in 2000i32..2030,
    ) {
        let changes = repo.ranking_changes(current, previous);
        let current_ranking = repo.ranking_by_year(current);
        let both_known = repo.dataset().ranking(current).is_some()
            && repo.dataset().ranking(previous).is_some();

        if !both_known {
            prop_assert!(changes.is_empty());
        } else {
            prop_assert_eq!(changes.len(), current_ranking.len());
            for (change, entry) in changes.iter().zip(current_ranking) {
                prop_assert_eq!(&change.entry, entry);
                match change.previous_rank {
                    Some(previous_rank) => prop_assert_eq!(
                        change.change,
                        Some(i64::from(previous_rank) - i64::from(entry.rank))
                    ),
                    None => prop_assert_eq!(change.change, None),
                }
            }
        }
    }

    #[test]
    fn trend_series_aligned_with_years(repo in repository(), id in 1u32..=20) {
        let years = repo.available_years();
        let series = trend_series(&repo, &[CharacterId(id)]);

        prop_assert_eq!(series[0].ranks.len(), years.len());
        prop_assert_eq!(series[0].votes.len(), years.len());
        let charted = series[0].ranks.iter().filter(|r| r.is_some()).count();
        prop_assert_eq!(charted, repo.character_ranking_history(CharacterId(id)).len());
    }
}
