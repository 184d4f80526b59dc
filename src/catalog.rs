//! Genre Catalog - Schemas Are Contracts
//!
//! Single source of truth for supported genres, target platforms, and the
//! detail fields each genre requires.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameGenre {
    Fighting,
    Racing,
    Platformer,
    Rpg,
    Puzzle,
    Shooter,
}

impl GameGenre {
    pub const ALL: [GameGenre; 6] = [
        GameGenre::Fighting,
        GameGenre::Racing,
        GameGenre::Platformer,
        GameGenre::Rpg,
        GameGenre::Puzzle,
        GameGenre::Shooter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameGenre::Fighting => "fighting",
            GameGenre::Racing => "racing",
            GameGenre::Platformer => "platformer",
            GameGenre::Rpg => "rpg",
            GameGenre::Puzzle => "puzzle",
            GameGenre::Shooter => "shooter",
        }
    }
}

impl fmt::Display for GameGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameGenre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameGenre::ALL
            .iter()
            .find(|genre| genre.as_str() == s)
            .copied()
            .ok_or_else(|| CatalogError::UnknownGenre(s.to_string()))
    }
}

/// Advisory metadata only: selects the scaffold's input convention,
/// never cross-validated against genre.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    #[default]
    Desktop,
    Android,
    Ios,
    Web,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputScheme {
    KeyboardMouse,
    Touch,
    Keyboard,
}

impl TargetPlatform {
    pub fn input_scheme(&self) -> InputScheme {
        match self {
            TargetPlatform::Desktop => InputScheme::KeyboardMouse,
            TargetPlatform::Android | TargetPlatform::Ios => InputScheme::Touch,
            TargetPlatform::Web => InputScheme::Keyboard,
        }
    }
}

/// Value shape a required detail field must satisfy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Non-empty array of non-empty strings.
    IdentifierList,
    /// Non-empty string.
    Identifier,
    /// Integer greater than zero.
    Count,
}

impl FieldShape {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldShape::IdentifierList => "non-empty list of identifiers",
            FieldShape::Identifier => "non-empty identifier",
            FieldShape::Count => "integer greater than zero",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub shape: FieldShape,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreSchema {
    pub genre: GameGenre,
    pub fields: Vec<FieldSpec>,
}

impl GenreSchema {
    pub fn new(genre: GameGenre, fields: &[(&str, FieldShape)]) -> Self {
        Self {
            genre,
            fields: fields
                .iter()
                .map(|(name, shape)| FieldSpec {
                    name: (*name).to_string(),
                    shape: *shape,
                })
                .collect(),
        }
    }
}

/// Genre catalog - maps each supported genre to its required-field schema
pub struct GenreCatalog {
    schemas: HashMap<GameGenre, GenreSchema>,
}

impl GenreCatalog {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Catalog covering the full closed genre set. Every genre follows the
    /// same pattern the fighting schema fixes: an entity list, a stage
    /// identifier, a tuning count, and a hook list.
    pub fn builtin() -> Self {
        use FieldShape::{Count, Identifier, IdentifierList};

        let mut catalog = Self::new();
        catalog.register(GenreSchema::new(
            GameGenre::Fighting,
            &[
                ("characters", IdentifierList),
                ("environment", Identifier),
                ("moves_per_character", Count),
                ("special_effects", IdentifierList),
            ],
        ));
        catalog.register(GenreSchema::new(
            GameGenre::Racing,
            &[
                ("vehicles", IdentifierList),
                ("tracks", IdentifierList),
                ("laps", Count),
                ("hazards", IdentifierList),
            ],
        ));
        catalog.register(GenreSchema::new(
            GameGenre::Platformer,
            &[
                ("enemies", IdentifierList),
                ("world_theme", Identifier),
                ("level_count", Count),
                ("powerups", IdentifierList),
            ],
        ));
        catalog.register(GenreSchema::new(
            GameGenre::Rpg,
            &[
                ("party_classes", IdentifierList),
                ("setting", Identifier),
                ("quest_count", Count),
                ("magic_schools", IdentifierList),
            ],
        ));
        catalog.register(GenreSchema::new(
            GameGenre::Puzzle,
            &[
                ("piece_types", IdentifierList),
                ("board_layout", Identifier),
                ("difficulty_levels", Count),
                ("mechanics", IdentifierList),
            ],
        ));
        catalog.register(GenreSchema::new(
            GameGenre::Shooter,
            &[
                ("enemy_types", IdentifierList),
                ("battlefield", Identifier),
                ("weapon_slots", Count),
                ("pickups", IdentifierList),
            ],
        ));
        catalog
    }

    pub fn register(&mut self, schema: GenreSchema) {
        self.schemas.insert(schema.genre, schema);
    }

    pub fn schema_for(&self, genre: GameGenre) -> Result<&GenreSchema, CatalogError> {
        self.schemas
            .get(&genre)
            .ok_or_else(|| CatalogError::UnknownGenre(genre.to_string()))
    }

    /// Schemas sorted by genre name, for stable listing output.
    pub fn genres(&self) -> Vec<&GenreSchema> {
        let mut schemas: Vec<_> = self.schemas.values().collect();
        schemas.sort_by_key(|schema| schema.genre.as_str());
        schemas
    }
}

impl Default for GenreCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_genre() {
        let catalog = GenreCatalog::builtin();
        for genre in GameGenre::ALL {
            let schema = catalog.schema_for(genre).unwrap();
            assert_eq!(schema.genre, genre);
            assert!(!schema.fields.is_empty());
        }
    }

    #[test]
    fn genre_name_roundtrip() {
        for genre in GameGenre::ALL {
            assert_eq!(genre.as_str().parse::<GameGenre>().unwrap(), genre);
        }
    }

    #[test]
    fn unknown_genre_name_rejected() {
        let err = "roguelike".parse::<GameGenre>().unwrap_err();
        assert_eq!(err, CatalogError::UnknownGenre("roguelike".to_string()));
    }

    #[test]
    fn empty_catalog_reports_unknown_genre() {
        let catalog = GenreCatalog::new();
        assert!(catalog.schema_for(GameGenre::Puzzle).is_err());
    }
}
