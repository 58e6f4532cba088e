// Ranking Repository - read-only query layer over the static dataset
//
// Every query is total: unknown years, unknown characters and characters
// missing from a year produce empty or absent results, never errors.
// Nothing is cached; results are recomputed from the immutable base.

use crate::dataset::{RankingDataset, RankingEntry};
use crate::entities::{Character, CharacterCatalog, CharacterId, UNKNOWN_CHARACTER_NAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// QUERY RESULTS
// ============================================================================

/// Ranking entry joined with its catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCharacter {
    #[serde(flatten)]
    pub entry: RankingEntry,

    /// `None` when the entry references an id missing from the catalog
    pub character: Option<Character>,
}

/// One year of a character's sparse history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub year: i32,
    pub rank: u32,
    pub votes: u64,
}

/// Current-year entry compared against a previous year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingChange {
    #[serde(flatten)]
    pub entry: RankingEntry,

    pub character: Option<Character>,

    /// `None` when the character did not chart in the previous year
    #[serde(rename = "previousRank")]
    pub previous_rank: Option<u32>,

    /// previous rank - current rank; positive means the character rose.
    /// `None` for newly charted characters, which is not the same as zero.
    pub change: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankChangeDirection {
    New,
    Up,
    Down,
    Same,
}

impl RankChangeDirection {
    pub fn from_change(change: Option<i64>) -> Self {
        match change {
            None => RankChangeDirection::New,
            Some(c) if c > 0 => RankChangeDirection::Up,
            Some(c) if c < 0 => RankChangeDirection::Down,
            Some(_) => RankChangeDirection::Same,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankChangeDirection::New => "new",
            RankChangeDirection::Up => "up",
            RankChangeDirection::Down => "down",
            RankChangeDirection::Same => "same",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RankChangeDirection::New => "NEW",
            RankChangeDirection::Up => "↑",
            RankChangeDirection::Down => "↓",
            RankChangeDirection::Same => "→",
        }
    }
}

impl RankingChange {
    pub fn direction(&self) -> RankChangeDirection {
        RankChangeDirection::from_change(self.change)
    }
}

// ============================================================================
// RANKING REPOSITORY
// ============================================================================

/// Immutable query layer over a character catalog and a ranking dataset
///
/// Both tables are passed in at construction, so tests can build small
/// synthetic fixtures. Safe to share between threads without locking.
#[derive(Debug, Clone, Default)]
pub struct RankingRepository {
    catalog: CharacterCatalog,
    dataset: RankingDataset,
}

impl RankingRepository {
    pub fn new(catalog: CharacterCatalog, dataset: RankingDataset) -> Self {
        RankingRepository { catalog, dataset }
    }

    pub fn catalog(&self) -> &CharacterCatalog {
        &self.catalog
    }

    pub fn dataset(&self) -> &RankingDataset {
        &self.dataset
    }

    /// Years with a ranking list, ascending
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.dataset.yearly_rankings().keys().copied().collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// All characters in catalog-load order
    pub fn characters(&self) -> &[Character] {
        self.catalog.all()
    }

    pub fn character_info(&self, id: CharacterId) -> Option<&Character> {
        self.catalog.get(id)
    }

    /// Display name, or `"Unknown"` for ids missing from the catalog
    pub fn character_name(&self, id: CharacterId) -> &str {
        self.character_info(id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CHARACTER_NAME)
    }

    /// Ranking list of `year` as stored; empty for unknown years
    pub fn ranking_by_year(&self, year: i32) -> &[RankingEntry] {
        self.dataset.ranking(year).unwrap_or(&[])
    }

    /// First `top_n` entries of `year`, each joined with its character
    pub fn top_characters(&self, year: i32, top_n: usize) -> Vec<TopCharacter> {
        self.ranking_by_year(year)
            .iter()
            .take(top_n)
            .map(|entry| TopCharacter {
                entry: *entry,
                character: self.character_info(entry.character_id).cloned(),
            })
            .collect()
    }

    /// Sparse history of one character, ascending by year
    ///
    /// Years in which the character did not chart are omitted.
    pub fn character_ranking_history(&self, id: CharacterId) -> Vec<HistoryPoint> {
        let mut history: Vec<HistoryPoint> = self
            .dataset
            .yearly_rankings()
            .iter()
            .filter_map(|(&year, ranking)| {
                ranking
                    .iter()
                    .find(|entry| entry.character_id == id)
                    .map(|entry| HistoryPoint {
                        year,
                        rank: entry.rank,
                        votes: entry.votes,
                    })
            })
            .collect();

        history.sort_by_key(|point| point.year);
        history
    }

    /// Stored yearly totals (not recomputed from the entries)
    pub fn total_votes_by_year(&self) -> &BTreeMap<i32, u64> {
        self.dataset.total_votes_by_year()
    }

    /// Compare every entry of `current_year` with `previous_year`
    ///
    /// Keeps the current year's order and length. Characters that only
    /// charted in `previous_year` do not appear in the result. Empty when
    /// either year is unknown.
    pub fn ranking_changes(&self, current_year: i32, previous_year: i32) -> Vec<RankingChange> {
        let (current, previous) = match (
            self.dataset.ranking(current_year),
            self.dataset.ranking(previous_year),
        ) {
            (Some(current), Some(previous)) => (current, previous),
            _ => return Vec::new(),
        };

        current
            .iter()
            .map(|entry| {
                let previous_rank = previous
                    .iter()
                    .find(|p| p.character_id == entry.character_id)
                    .map(|p| p.rank);

                RankingChange {
                    entry: *entry,
                    character: self.character_info(entry.character_id).cloned(),
                    previous_rank,
                    change: previous_rank.map(|p| i64::from(p) - i64::from(entry.rank)),
                }
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
