// Derived statistics for the dashboard views
//
// Vote growth, generation breakdown and dense trend series. All functions
// read from a RankingRepository and never fail; values that cannot be
// computed (no data, division by a zero total) come back as `None`.

use crate::entities::CharacterId;
use crate::repository::{RankingChange, RankingRepository, TopCharacter};
use serde::{Deserialize, Serialize};

/// Number of characters pre-selected in the trend views
pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Number of rows shown in the latest rank-change table
pub const LATEST_CHANGES_LIMIT: usize = 30;

// ============================================================================
// SELECTION HELPERS
// ============================================================================

/// Most recent year with a ranking list
pub fn latest_year(repo: &RankingRepository) -> Option<i32> {
    repo.available_years().last().copied()
}

/// Ids of the first `n` characters of the latest year's ranking
pub fn default_selection(repo: &RankingRepository, n: usize) -> Vec<CharacterId> {
    latest_year(repo)
        .map(|year| {
            repo.ranking_by_year(year)
                .iter()
                .take(n)
                .map(|entry| entry.character_id)
                .collect()
        })
        .unwrap_or_default()
}

/// Rank changes between the two most recent years, truncated to `limit`
pub fn latest_changes(repo: &RankingRepository, limit: usize) -> Vec<RankingChange> {
    let years = repo.available_years();
    match years.as_slice() {
        [.., previous, current] => {
            let mut changes = repo.ranking_changes(*current, *previous);
            changes.truncate(limit);
            changes
        }
        _ => Vec::new(),
    }
}

// ============================================================================
// VOTE GROWTH
// ============================================================================

/// Year-over-year growth in percent
///
/// `None` when `previous` is zero: the ratio is undefined.
pub fn growth_rate(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyVotes {
    pub year: i32,

    /// `None` when the totals table has no figure for this year
    pub total_votes: Option<u64>,

    /// Growth against the previous available year
    pub growth_rate: Option<f64>,
}

/// Totals and growth for every available year, ascending
pub fn vote_growth(repo: &RankingRepository) -> Vec<YearlyVotes> {
    let totals = repo.total_votes_by_year();
    let mut previous_total: Option<u64> = None;

    repo.available_years()
        .into_iter()
        .enumerate()
        .map(|(index, year)| {
            let total_votes = totals.get(&year).copied();
            let growth = if index == 0 {
                None
            } else {
                match (previous_total, total_votes) {
                    (Some(previous), Some(current)) => growth_rate(previous, current),
                    _ => None,
                }
            };
            previous_total = total_votes;

            YearlyVotes {
                year,
                total_votes,
                growth_rate: growth,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteSummary {
    /// Growth from the first to the last available year
    pub total_growth: Option<f64>,
    /// Mean of the defined year-over-year rates
    pub average_growth: Option<f64>,
    pub max_votes: Option<u64>,
    pub min_votes: Option<u64>,
    pub max_growth_rate: Option<f64>,
    pub min_growth_rate: Option<f64>,
}

pub fn vote_summary(repo: &RankingRepository) -> VoteSummary {
    let rows = vote_growth(repo);

    let totals: Vec<u64> = rows.iter().filter_map(|r| r.total_votes).collect();
    let rates: Vec<f64> = rows.iter().filter_map(|r| r.growth_rate).collect();

    let total_growth = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if rows.len() > 1 => match (first.total_votes, last.total_votes) {
            (Some(first), Some(last)) => growth_rate(first, last),
            _ => None,
        },
        _ => None,
    };

    let average_growth = if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    };

    VoteSummary {
        total_growth,
        average_growth,
        max_votes: totals.iter().copied().max(),
        min_votes: totals.iter().copied().min(),
        max_growth_rate: rates.iter().copied().reduce(f64::max),
        min_growth_rate: rates.iter().copied().reduce(f64::min),
    }
}

// ============================================================================
// GENERATIONS
// ============================================================================

/// Age bucket of a character relative to a contest year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generation {
    /// 0-10 years since debut
    New,
    /// 11-25 years
    MidCareer,
    /// 26-40 years
    Veteran,
    /// More than 40 years
    Legend,
}

impl Generation {
    pub const ALL: [Generation; 4] = [
        Generation::New,
        Generation::MidCareer,
        Generation::Veteran,
        Generation::Legend,
    ];

    pub fn from_age(age: i32) -> Self {
        match age {
            a if a <= 10 => Generation::New,
            a if a <= 25 => Generation::MidCareer,
            a if a <= 40 => Generation::Veteran,
            _ => Generation::Legend,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Generation::New => "New (0-10 years)",
            Generation::MidCareer => "Mid-career (11-25 years)",
            Generation::Veteran => "Veteran (26-40 years)",
            Generation::Legend => "Legend (41+ years)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: Generation,
    pub members: Vec<TopCharacter>,
    pub average_rank: Option<f64>,
    /// Summed in 128 bits: many members can exceed `u64` together
    pub total_votes: u128,
}

/// Split the top `top_n` of `year` into generations
///
/// Entries whose character is not in the catalog have no debut year and
/// are left out.
pub fn generation_breakdown(
    repo: &RankingRepository,
    year: i32,
    top_n: usize,
) -> Vec<GenerationStats> {
    let top = repo.top_characters(year, top_n);

    Generation::ALL
        .iter()
        .map(|&generation| {
            let members: Vec<TopCharacter> = top
                .iter()
                .filter(|item| {
                    item.character
                        .as_ref()
                        .map(|c| Generation::from_age(c.age_in(year)) == generation)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            let average_rank = if members.is_empty() {
                None
            } else {
                let rank_sum: u64 = members.iter().map(|m| u64::from(m.entry.rank)).sum();
                Some(rank_sum as f64 / members.len() as f64)
            };
            let total_votes = members.iter().map(|m| u128::from(m.entry.votes)).sum();

            GenerationStats {
                generation,
                members,
                average_rank,
                total_votes,
            }
        })
        .collect()
}

// ============================================================================
// TREND SERIES
// ============================================================================

/// Dense per-year series for one character, aligned with `years`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub character_id: CharacterId,
    pub name: String,
    pub years: Vec<i32>,
    pub ranks: Vec<Option<u32>>,
    pub votes: Vec<Option<u64>>,
}

pub fn trend_series(repo: &RankingRepository, ids: &[CharacterId]) -> Vec<TrendSeries> {
    let years = repo.available_years();

    ids.iter()
        .map(|&id| {
            let history = repo.character_ranking_history(id);
            let point_for = |year: i32| history.iter().find(|h| h.year == year);

            TrendSeries {
                character_id: id,
                name: repo.character_name(id).to_string(),
                ranks: years.iter().map(|&y| point_for(y).map(|h| h.rank)).collect(),
                votes: years.iter().map(|&y| point_for(y).map(|h| h.votes)).collect(),
                years: years.clone(),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
