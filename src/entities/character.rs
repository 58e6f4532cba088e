// Character Entity - stable identity + display values
//
// "Character id is IDENTITY (never changes), name and debut year are VALUES"
//
// Characters are created once when the catalog document is loaded and are
// never mutated afterwards. Ranking entries reference them by id only.

use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name returned for ids that are not in the catalog
pub const UNKNOWN_CHARACTER_NAME: &str = "Unknown";

// ============================================================================
// CHARACTER ID
// ============================================================================

/// Stable identifier of a character (foreign key of every ranking entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for CharacterId {
    fn from(id: u32) -> Self {
        CharacterId(id)
    }
}

// ============================================================================
// CHARACTER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable identity - NEVER changes
    pub id: CharacterId,

    /// Display name
    pub name: String,

    /// Year the character was first introduced
    pub debut_year: i32,
}

impl Character {
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>, debut_year: i32) -> Self {
        Character {
            id: id.into(),
            name: name.into(),
            debut_year,
        }
    }

    /// Years since debut, as seen from `year`
    ///
    /// Negative when the character debuted after `year`.
    pub fn age_in(&self, year: i32) -> i32 {
        year.saturating_sub(self.debut_year)
    }
}

// ============================================================================
// CATALOG DOCUMENT
// ============================================================================

/// Shape of the character catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub characters: Vec<Character>,
}

// ============================================================================
// CHARACTER CATALOG
// ============================================================================

/// Read-only registry of all known characters
///
/// Keeps the load order for listing and a hashed index for lookups.
/// If the document repeats an id, the first occurrence wins (the data
/// quality pass reports the duplicate).
#[derive(Debug, Clone, Default)]
pub struct CharacterCatalog {
    characters: Vec<Character>,
    index: HashMap<CharacterId, usize>,
}

impl CharacterCatalog {
    pub fn new(characters: Vec<Character>) -> Self {
        let mut index = HashMap::with_capacity(characters.len());
        for (position, character) in characters.iter().enumerate() {
            index.entry(character.id).or_insert(position);
        }

        CharacterCatalog { characters, index }
    }

    pub fn from_document(document: CatalogDocument) -> Self {
        Self::new(document.characters)
    }

    /// Parse the catalog document from JSON text
    pub fn from_json_str(json: &str) -> DatasetResult<Self> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| DatasetError::json("character catalog", e))?;
        Ok(Self::from_document(document))
    }

    /// All characters in load order
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.index.get(&id).map(|&position| &self.characters[position])
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
