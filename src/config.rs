use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Character catalog document
    pub characters_path: PathBuf,
    /// Ranking document (yearly rankings + total votes)
    pub rankings_path: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Run the data quality pass once after loading
    pub validate_on_load: bool,
    /// Compare stored yearly totals with the sum of the listed votes.
    /// Turn off for datasets that publish only a top-N list.
    pub check_totals: bool,
    /// Default list length for top-N queries
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            characters_path: PathBuf::from("data/characters.json"),
            rankings_path: PathBuf::from("data/ranking_data.json"),
            bind_addr: "127.0.0.1:3000".to_string(),
            validate_on_load: true,
            check_totals: true,
            top_n: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("RANKING_CHARACTERS_PATH") {
            config.characters_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("RANKING_DATA_PATH") {
            config.rankings_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var("RANKING_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("RANKING_VALIDATE") {
            config.validate_on_load = parse_flag(&val).unwrap_or(config.validate_on_load);
        }
        if let Ok(val) = std::env::var("RANKING_CHECK_TOTALS") {
            config.check_totals = parse_flag(&val).unwrap_or(config.check_totals);
        }
        if let Ok(val) = std::env::var("RANKING_TOP_N") {
            if let Ok(v) = val.parse() {
                config.top_n = v;
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
