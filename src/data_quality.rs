// Data Quality Engine - load-time validation of the ranking dataset
//
// The dataset is static and trusted, so queries never check it. This pass
// runs once after loading and collects every structural defect into a
// single report. Findings are diagnostics: loading continues regardless.

use crate::config::Config;
use crate::dataset::{RankingDataset, RankingEntry};
use crate::entities::{CharacterCatalog, CharacterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// QUALITY ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Queries will return misleading results
    Warning,  // Figures disagree with each other
    Info,     // Unusual but harmless
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityRule {
    DuplicateCatalogId,
    DuplicateCharacterInYear,
    InvalidRank,
    RankOrder,
    VoteOrder,
    UnknownCharacter,
    YearMismatch,
    TotalMismatch,
}

impl QualityRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityRule::DuplicateCatalogId => "duplicate_catalog_id",
            QualityRule::DuplicateCharacterInYear => "duplicate_character_in_year",
            QualityRule::InvalidRank => "invalid_rank",
            QualityRule::RankOrder => "rank_order",
            QualityRule::VoteOrder => "vote_order",
            QualityRule::UnknownCharacter => "unknown_character",
            QualityRule::YearMismatch => "year_mismatch",
            QualityRule::TotalMismatch => "total_mismatch",
        }
    }

    fn severity(&self) -> Severity {
        match self {
            QualityRule::DuplicateCatalogId
            | QualityRule::DuplicateCharacterInYear
            | QualityRule::InvalidRank
            | QualityRule::RankOrder => Severity::Critical,
            QualityRule::VoteOrder
            | QualityRule::UnknownCharacter
            | QualityRule::TotalMismatch => Severity::Warning,
            QualityRule::YearMismatch => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub rule: QualityRule,
    /// Year the issue was found in; `None` for catalog-level issues
    pub year: Option<i32>,
    pub message: String,
}

impl QualityIssue {
    fn new(rule: QualityRule, year: Option<i32>, message: String) -> Self {
        QualityIssue {
            severity: rule.severity(),
            rule,
            year,
            message,
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub characters_checked: usize,
    pub years_checked: usize,
    pub entries_checked: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Checked {} characters, {} years, {} entries. Issues: {} ({} critical, {} warnings)",
            self.characters_checked,
            self.years_checked,
            self.entries_checked,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning),
        )
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn by_rule(&self, rule: QualityRule) -> Vec<&QualityIssue> {
        self.issues.iter().filter(|i| i.rule == rule).collect()
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DatasetQualityEngine {
    /// Compare stored yearly totals with the sum of that year's entries
    check_totals: bool,
}

impl DatasetQualityEngine {
    pub fn new() -> Self {
        DatasetQualityEngine { check_totals: true }
    }

    /// Engine with the checks enabled in `config`
    pub fn from_config(config: &Config) -> Self {
        let engine = Self::new();
        if config.check_totals {
            engine
        } else {
            engine.without_total_check()
        }
    }

    /// Skip the total-vs-entries comparison
    ///
    /// Useful for datasets that only publish a top-N list while the total
    /// counts every ballot.
    pub fn without_total_check(mut self) -> Self {
        self.check_totals = false;
        self
    }

    /// Validate the catalog and the dataset together
    pub fn validate(&self, catalog: &CharacterCatalog, dataset: &RankingDataset) -> QualityReport {
        let mut issues = Vec::new();

        // Rule 1: Catalog ids are unique
        self.validate_catalog(catalog, &mut issues);

        // Rules 2-6: each year's ranking list
        let mut entries_checked = 0;
        for (&year, ranking) in dataset.yearly_rankings() {
            entries_checked += ranking.len();
            self.validate_year(year, ranking, catalog, &mut issues);
        }

        // Rule 7: both tables cover the same years
        self.validate_year_coverage(dataset, &mut issues);

        // Rule 8: stored totals match the entries
        if self.check_totals {
            self.validate_totals(dataset, &mut issues);
        }

        QualityReport {
            generated_at: Utc::now(),
            characters_checked: catalog.len(),
            years_checked: dataset.yearly_rankings().len(),
            entries_checked,
            issues,
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_catalog(&self, catalog: &CharacterCatalog, issues: &mut Vec<QualityIssue>) {
        let mut seen = HashSet::new();
        for character in catalog.all() {
            if !seen.insert(character.id) {
                issues.push(QualityIssue::new(
                    QualityRule::DuplicateCatalogId,
                    None,
                    format!(
                        "Character id {} appears more than once (\"{}\")",
                        character.id, character.name
                    ),
                ));
            }
        }
    }

    fn validate_year(
        &self,
        year: i32,
        ranking: &[RankingEntry],
        catalog: &CharacterCatalog,
        issues: &mut Vec<QualityIssue>,
    ) {
        let mut seen: HashSet<CharacterId> = HashSet::new();

        for (position, entry) in ranking.iter().enumerate() {
            if !seen.insert(entry.character_id) {
                issues.push(QualityIssue::new(
                    QualityRule::DuplicateCharacterInYear,
                    Some(year),
                    format!("Character {} is listed more than once", entry.character_id),
                ));
            }

            if entry.rank == 0 {
                issues.push(QualityIssue::new(
                    QualityRule::InvalidRank,
                    Some(year),
                    format!("Character {} has rank 0", entry.character_id),
                ));
            }

            if !catalog.contains(entry.character_id) {
                issues.push(QualityIssue::new(
                    QualityRule::UnknownCharacter,
                    Some(year),
                    format!("Character {} is not in the catalog", entry.character_id),
                ));
            }

            if position == 0 {
                continue;
            }
            let previous = &ranking[position - 1];

            if entry.rank <= previous.rank {
                issues.push(QualityIssue::new(
                    QualityRule::RankOrder,
                    Some(year),
                    format!(
                        "Rank {} (character {}) follows rank {}",
                        entry.rank, entry.character_id, previous.rank
                    ),
                ));
            }

            if entry.votes > previous.votes {
                issues.push(QualityIssue::new(
                    QualityRule::VoteOrder,
                    Some(year),
                    format!(
                        "Rank {} has {} votes, more than rank {} with {}",
                        entry.rank, entry.votes, previous.rank, previous.votes
                    ),
                ));
            }
        }
    }

    fn validate_year_coverage(&self, dataset: &RankingDataset, issues: &mut Vec<QualityIssue>) {
        let ranked: BTreeSet<i32> = dataset.yearly_rankings().keys().copied().collect();
        let totalled: BTreeSet<i32> = dataset.total_votes_by_year().keys().copied().collect();

        for year in ranked.difference(&totalled) {
            issues.push(QualityIssue::new(
                QualityRule::YearMismatch,
                Some(*year),
                "Year has a ranking but no total vote count".to_string(),
            ));
        }

        for year in totalled.difference(&ranked) {
            issues.push(QualityIssue::new(
                QualityRule::YearMismatch,
                Some(*year),
                "Year has a total vote count but no ranking".to_string(),
            ));
        }
    }

    fn validate_totals(&self, dataset: &RankingDataset, issues: &mut Vec<QualityIssue>) {
        for (&year, &stored) in dataset.total_votes_by_year() {
            let Some(ranking) = dataset.ranking(year) else {
                continue;
            };

            // Widened so that huge vote counts cannot overflow the sum
            let summed: u128 = ranking.iter().map(|e| u128::from(e.votes)).sum();
            if summed != u128::from(stored) {
                issues.push(QualityIssue::new(
                    QualityRule::TotalMismatch,
                    Some(year),
                    format!("Stored total {} differs from entry sum {}", stored, summed),
                ));
            }
        }
    }
}

impl Default for DatasetQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
