// Entity Models
//
// Each entity has:
// - Stable identity (id) that NEVER changes
// - Immutable values loaded once from the dataset documents
// - A registry for lookups

pub mod character;

pub use character::{
    CatalogDocument, Character, CharacterCatalog, CharacterId, UNKNOWN_CHARACTER_NAME,
};
