// Dataset loading - read both documents once and build the repository
//
// This is the only place that touches the filesystem. The optional quality
// pass runs here so its findings surface exactly once, at startup.

use crate::config::Config;
use crate::data_quality::{DatasetQualityEngine, QualityReport};
use crate::dataset::RankingDataset;
use crate::entities::CharacterCatalog;
use crate::repository::RankingRepository;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read and parse the character catalog document
pub fn load_catalog(path: &Path) -> Result<CharacterCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read character catalog {}", path.display()))?;
    let catalog = CharacterCatalog::from_json_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Loaded {} characters from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Read and parse the ranking document
pub fn load_dataset(path: &Path) -> Result<RankingDataset> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ranking data {}", path.display()))?;
    let dataset = RankingDataset::from_json_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(
        "Loaded {} ranking years from {}",
        dataset.yearly_rankings().len(),
        path.display()
    );
    Ok(dataset)
}

/// Run the quality pass enabled by `config` and log its findings as one
/// diagnostic
///
/// Never fails: a defective dataset is still served.
pub fn validate_and_report(
    config: &Config,
    catalog: &CharacterCatalog,
    dataset: &RankingDataset,
) -> QualityReport {
    let report = DatasetQualityEngine::from_config(config).validate(catalog, dataset);

    if report.is_clean() {
        tracing::info!("Dataset quality check passed: {}", report.summary());
    } else {
        let details: Vec<String> = report
            .issues
            .iter()
            .map(|issue| match issue.year {
                Some(year) => format!("[{}] {}: {}", issue.rule.as_str(), year, issue.message),
                None => format!("[{}] {}", issue.rule.as_str(), issue.message),
            })
            .collect();
        tracing::warn!(
            "Dataset quality check found problems: {}\n  {}",
            report.summary(),
            details.join("\n  ")
        );
    }

    report
}

/// Load both documents named by `config` into a repository
pub fn load_repository(config: &Config) -> Result<RankingRepository> {
    let catalog = load_catalog(&config.characters_path)?;
    let dataset = load_dataset(&config.rankings_path)?;

    if config.validate_on_load {
        validate_and_report(config, &catalog, &dataset);
    }

    tracing::info!(
        "Ranking repository ready: {} characters, {} years",
        catalog.len(),
        dataset.yearly_rankings().len()
    );

    Ok(RankingRepository::new(catalog, dataset))
}
