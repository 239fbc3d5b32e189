//! Static reference lists embedded at build time.
//!
//! The assets under `assets/` are snapshots of the API's list endpoints
//! (regenerate them with the `refresh-assets` binary). They are parsed once
//! at startup and never change afterwards; selections hold `Rc` handles into
//! these lists instead of copies.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::info;

use crate::ApiData;

const TYPES_JSON: &str = include_str!("../assets/types.json");
const ABILITIES_JSON: &str = include_str!("../assets/abilities.json");
const MOVES_JSON: &str = include_str!("../assets/moves.json");
const GENERATIONS_JSON: &str = include_str!("../assets/generations.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Type,
    Ability,
    Move,
    Generation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Type,
        Category::Ability,
        Category::Move,
        Category::Generation,
    ];

    /// Path segment of the API resource, e.g. `ability` in `/api/v2/ability/`.
    pub fn resource(self) -> &'static str {
        match self {
            Category::Type => "type",
            Category::Ability => "ability",
            Category::Move => "move",
            Category::Generation => "generation",
        }
    }

    /// File name of the embedded asset.
    pub fn asset(self) -> &'static str {
        match self {
            Category::Type => "types.json",
            Category::Ability => "abilities.json",
            Category::Move => "moves.json",
            Category::Generation => "generations.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Type => "Type",
            Category::Ability => "Ability",
            Category::Move => "Move",
            Category::Generation => "Generation",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.resource().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// An embedded asset could not be parsed.
#[derive(Debug)]
pub struct ReferenceError {
    pub asset: &'static str,
    pub message: String,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse {}: {}", self.asset, self.message)
    }
}

impl std::error::Error for ReferenceError {}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    types: Vec<Rc<ApiData>>,
    abilities: Vec<Rc<ApiData>>,
    moves: Vec<Rc<ApiData>>,
    generations: Vec<Rc<ApiData>>,
}

impl ReferenceData {
    /// Parse the assets compiled into the binary.
    pub fn load() -> Result<Self, ReferenceError> {
        Self::from_json(TYPES_JSON, ABILITIES_JSON, MOVES_JSON, GENERATIONS_JSON)
    }

    pub fn from_json(
        types: &str,
        abilities: &str,
        moves: &str,
        generations: &str,
    ) -> Result<Self, ReferenceError> {
        let data = Self {
            types: parse_list(Category::Type, types)?,
            abilities: parse_list(Category::Ability, abilities)?,
            moves: parse_list(Category::Move, moves)?,
            generations: parse_list(Category::Generation, generations)?,
        };
        info!(
            "Loaded reference data: {} types, {} abilities, {} moves, {} generations",
            data.types.len(),
            data.abilities.len(),
            data.moves.len(),
            data.generations.len()
        );
        Ok(data)
    }

    pub fn list(&self, category: Category) -> &[Rc<ApiData>] {
        match category {
            Category::Type => &self.types,
            Category::Ability => &self.abilities,
            Category::Move => &self.moves,
            Category::Generation => &self.generations,
        }
    }

    pub fn types(&self) -> &[Rc<ApiData>] {
        &self.types
    }

    pub fn abilities(&self) -> &[Rc<ApiData>] {
        &self.abilities
    }

    pub fn moves(&self) -> &[Rc<ApiData>] {
        &self.moves
    }

    pub fn generations(&self) -> &[Rc<ApiData>] {
        &self.generations
    }

    /// Shared handle to the entry with this exact name.
    pub fn find(&self, category: Category, name: &str) -> Option<Rc<ApiData>> {
        self.list(category).iter().find(|d| d.name == name).cloned()
    }
}

fn parse_list(category: Category, json: &str) -> Result<Vec<Rc<ApiData>>, ReferenceError> {
    let items: Vec<ApiData> = serde_json::from_str(json).map_err(|e| ReferenceError {
        asset: category.asset(),
        message: e.to_string(),
    })?;
    Ok(items.into_iter().map(Rc::new).collect())
}
