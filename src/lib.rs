// Character Ranking - Core Library
// Read-only queries and statistics over yearly popularity-contest results.
// Used by the CLI, the API server, and tests.

pub mod config;
pub mod data_quality;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod loader;
pub mod repository;
pub mod statistics;

// Re-export commonly used types
pub use config::Config;
pub use data_quality::{
    DatasetQualityEngine, QualityIssue, QualityReport, QualityRule, Severity,
};
pub use dataset::{parse_year, RankingDataset, RankingDocument, RankingEntry};
pub use entities::{
    CatalogDocument, Character, CharacterCatalog, CharacterId, UNKNOWN_CHARACTER_NAME,
};
pub use error::{DatasetError, DatasetResult};
pub use loader::{load_catalog, load_dataset, load_repository, validate_and_report};
pub use repository::{
    HistoryPoint, RankChangeDirection, RankingChange, RankingRepository, TopCharacter,
};
pub use statistics::{
    default_selection, generation_breakdown, growth_rate, latest_changes, latest_year,
    trend_series, vote_growth, vote_summary, Generation, GenerationStats, TrendSeries,
    VoteSummary, YearlyVotes,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
