//! Capture metadata: one stitched world image per entry.
//!
//! The catalog order is significant. Entry `i` is loaded as tiled image
//! layer `i`, and the captures list shows entries in the same order.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Catalog shipped with the crate.
pub const BUILTIN_CAPTURES: &str = include_str!("../data/captures.json");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Steam,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "noitabeta")]
    NoitaBeta,
}

impl Branch {
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Main => "main",
            Branch::NoitaBeta => "noitabeta",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Executable {
    #[serde(rename = "noita.exe")]
    Noita,
    #[serde(rename = "noita_dev.exe")]
    NoitaDev,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "New Game", alias = "Normal")]
    NewGame,
    Nightmare,
    #[serde(rename = "Daily Run")]
    DailyRun,
    Purgatory,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::NewGame => "New Game",
            GameMode::Nightmare => "Nightmare",
            GameMode::DailyRun => "Daily Run",
            GameMode::Purgatory => "Purgatory",
        }
    }

    /// Icon path and display width (2x pixel scale) for the captures list.
    pub fn icon(self) -> (&'static str, u32) {
        match self {
            GameMode::NewGame => ("img/gamemodes/normal.png", 31 * 2),
            GameMode::DailyRun => ("img/gamemodes/dailyrun.png", 26 * 2),
            GameMode::Nightmare => ("img/gamemodes/nightmare.png", 36 * 2),
            GameMode::Purgatory => ("img/gamemodes/purgatory.png", 46 * 2),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    #[serde(rename = "uniqueID")]
    pub unique_id: String,
    pub name: String,
    /// Build string as stored in the game executable.
    #[serde(default)]
    pub build_string: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub built_at: Option<OffsetDateTime>,
    pub platform: Platform,
    pub branch: Branch,
    pub executable: Executable,
    pub game_mode: GameMode,
    pub seed: u64,
    /// Number of world restarts; a new game starts at 1.
    pub ng_plus_level: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by: String,
    /// Path of the deep-zoom descriptor (DZI) for this capture.
    pub tile_source: String,
}

impl Capture {
    /// Calendar date of the build, `-` when unknown.
    pub fn build_date(&self) -> String {
        let format = time::macros::format_description!("[year]-[month]-[day]");
        self.built_at
            .and_then(|t| t.format(&format).ok())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate unique id {0:?}")]
    DuplicateId(String),
}

/// Ordered capture table with a unique-id index.
#[derive(Clone, Debug, Default)]
pub struct CaptureCatalog {
    captures: Vec<Capture>,
    index: HashMap<String, usize>,
}

impl CaptureCatalog {
    pub fn new(captures: Vec<Capture>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(captures.len());
        for (i, c) in captures.iter().enumerate() {
            if index.insert(c.unique_id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(c.unique_id.clone()));
            }
        }
        Ok(Self { captures, index })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CAPTURES)
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    pub fn as_slice(&self) -> &[Capture] {
        &self.captures
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Capture> {
        self.captures.iter()
    }

    /// Layer index of the capture with `unique_id`.
    pub fn position(&self, unique_id: &str) -> Option<usize> {
        self.index.get(unique_id).copied()
    }

    pub fn get(&self, unique_id: &str) -> Option<&Capture> {
        self.position(unique_id).map(|i| &self.captures[i])
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.index.contains_key(unique_id)
    }
}
