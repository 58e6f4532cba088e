// Ranking Dataset - year-indexed ranking lists + yearly vote totals
//
// The ranking document keys years as strings ("2025"). They are parsed to
// integers here, once, so every query works with `i32` years.

use crate::entities::CharacterId;
use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// RANKING ENTRY
// ============================================================================

/// One character's result in one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub character_id: CharacterId,

    /// 1-based position, lower is better
    pub rank: u32,

    pub votes: u64,
}

impl RankingEntry {
    pub fn new(character_id: impl Into<CharacterId>, rank: u32, votes: u64) -> Self {
        RankingEntry {
            character_id: character_id.into(),
            rank,
            votes,
        }
    }
}

// ============================================================================
// RANKING DOCUMENT
// ============================================================================

/// Shape of the ranking document, year keys still textual
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingDocument {
    pub yearly_rankings: BTreeMap<String, Vec<RankingEntry>>,
    pub total_votes_by_year: BTreeMap<String, u64>,
}

// ============================================================================
// RANKING DATASET
// ============================================================================

/// In-memory ranking store
///
/// Entries of a year are kept in the order the document lists them
/// (ascending rank for well-formed data).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingDataset {
    yearly_rankings: BTreeMap<i32, Vec<RankingEntry>>,
    total_votes_by_year: BTreeMap<i32, u64>,
}

impl RankingDataset {
    pub fn new(
        yearly_rankings: BTreeMap<i32, Vec<RankingEntry>>,
        total_votes_by_year: BTreeMap<i32, u64>,
    ) -> Self {
        RankingDataset {
            yearly_rankings,
            total_votes_by_year,
        }
    }

    /// Convert the textual year keys of the document
    pub fn from_document(document: RankingDocument) -> DatasetResult<Self> {
        let yearly_rankings = parse_year_keys(document.yearly_rankings, "yearly_rankings")?;
        let total_votes_by_year =
            parse_year_keys(document.total_votes_by_year, "total_votes_by_year")?;

        Ok(RankingDataset::new(yearly_rankings, total_votes_by_year))
    }

    /// Parse the ranking document from JSON text
    pub fn from_json_str(json: &str) -> DatasetResult<Self> {
        let document: RankingDocument =
            serde_json::from_str(json).map_err(|e| DatasetError::json("ranking", e))?;
        Self::from_document(document)
    }

    pub fn yearly_rankings(&self) -> &BTreeMap<i32, Vec<RankingEntry>> {
        &self.yearly_rankings
    }

    pub fn total_votes_by_year(&self) -> &BTreeMap<i32, u64> {
        &self.total_votes_by_year
    }

    pub fn ranking(&self, year: i32) -> Option<&[RankingEntry]> {
        self.yearly_rankings.get(&year).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.yearly_rankings.is_empty()
    }
}

/// Parse a year key
///
/// Surrounding whitespace and leading zeros are accepted, so `" 2025"` and
/// `"02025"` both mean 2025. Two such keys in one table are rejected when
/// the document is loaded.
pub fn parse_year(key: &str) -> Option<i32> {
    key.trim().parse().ok()
}

fn parse_year_keys<V>(
    table: BTreeMap<String, V>,
    name: &'static str,
) -> DatasetResult<BTreeMap<i32, V>> {
    let mut parsed = BTreeMap::new();
    for (key, value) in table {
        let year = parse_year(&key).ok_or_else(|| DatasetError::invalid_year(key, name))?;
        if parsed.insert(year, value).is_some() {
            return Err(DatasetError::DuplicateYear { year, table: name });
        }
    }
    Ok(parsed)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RANKING_JSON: &str = r#"{
        "yearly_rankings": {
            "2025": [
                { "character_id": 1, "rank": 1, "votes": 900 },
                { "character_id": 2, "rank": 2, "votes": 800 }
            ],
            "2024": [
                { "character_id": 2, "rank": 1, "votes": 700 }
            ]
        },
        "total_votes_by_year": { "2024": 700, "2025": 1700 }
    }"#;

    #[test]
    fn test_year_keys_become_integers() {
        let dataset = RankingDataset::from_json_str(RANKING_JSON).unwrap();

        let years: Vec<i32> = dataset.yearly_rankings().keys().copied().collect();
        assert_eq!(years, vec![2024, 2025]);
        assert_eq!(dataset.total_votes_by_year().get(&2025), Some(&1700));
    }

    #[test]
    fn test_entries_keep_document_order() {
        let dataset = RankingDataset::from_json_str(RANKING_JSON).unwrap();

        let ranking = dataset.ranking(2025).unwrap();
        assert_eq!(ranking[0], RankingEntry::new(1, 1, 900));
        assert_eq!(ranking[1], RankingEntry::new(2, 2, 800));
        assert!(dataset.ranking(1999).is_none());
    }

    #[test]
    fn test_invalid_year_key_is_rejected() {
        let json = r#"{
            "yearly_rankings": { "last year": [] },
            "total_votes_by_year": {}
        }"#;

        let err = RankingDataset::from_json_str(json).unwrap_err();
        match err {
            DatasetError::InvalidYear { key, table } => {
                assert_eq!(key, "last year");
                assert_eq!(table, "yearly_rankings");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_total_key_is_rejected() {
        let json = r#"{
            "yearly_rankings": {},
            "total_votes_by_year": { "20x5": 10 }
        }"#;

        let err = RankingDataset::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("total_votes_by_year"));
    }

    #[test]
    fn test_negative_votes_are_malformed() {
        let json = r#"{
            "yearly_rankings": { "2025": [ { "character_id": 1, "rank": 1, "votes": -5 } ] },
            "total_votes_by_year": {}
        }"#;

        assert!(matches!(
            RankingDataset::from_json_str(json),
            Err(DatasetError::Json { .. })
        ));
    }

    #[test]
    fn test_colliding_year_keys_are_rejected() {
        let json = r#"{
            "yearly_rankings": {
                "2025": [ { "character_id": 1, "rank": 1, "votes": 10 } ],
                " 2025": [ { "character_id": 2, "rank": 1, "votes": 20 } ]
            },
            "total_votes_by_year": {}
        }"#;

        match RankingDataset::from_json_str(json).unwrap_err() {
            DatasetError::DuplicateYear { year, table } => {
                assert_eq!(year, 2025);
                assert_eq!(table, "yearly_rankings");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_colliding_total_keys_are_rejected() {
        let json = r#"{
            "yearly_rankings": {},
            "total_votes_by_year": { "2025": 10, "02025": 20 }
        }"#;

        let err = RankingDataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateYear { year: 2025, .. }));
        assert!(err.to_string().contains("total_votes_by_year"));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2025"), Some(2025));
        assert_eq!(parse_year(" 2021 "), Some(2021));
        assert_eq!(parse_year("02021"), Some(2021));
        assert_eq!(parse_year("twenty"), None);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = RankingDataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.ranking(2025).is_none());
    }
}
