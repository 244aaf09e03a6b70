//! Season-specific static data: team lookup and display-name shortening.
//!
//! Team ids, names and external codes change with promotion and relegation, so
//! the table is loaded from a JSON file. The 2020/21 table is embedded as the
//! default.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{FplError, Result};

const DEFAULT_SEASON_JSON: &str = include_str!("../seasons/2020-21.json");

static DEFAULT_SEASON: Lazy<SeasonTable> = Lazy::new(|| {
    SeasonTable::from_json(DEFAULT_SEASON_JSON).unwrap_or_else(|err| {
        panic!("embedded season table is invalid: {err}");
    })
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Team number used by the bootstrap endpoint (1..=20).
    pub id: i64,
    pub name: String,
    /// External team code used for badges and photos.
    pub code: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonTable {
    pub season: String,
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub short_names: HashMap<String, String>,
    #[serde(skip)]
    by_id: HashMap<i64, usize>,
}

impl SeasonTable {
    pub fn embedded() -> &'static SeasonTable {
        &DEFAULT_SEASON
    }

    pub fn load(path: &Path) -> Result<SeasonTable> {
        let raw = fs::read_to_string(path).map_err(|err| {
            FplError::Config(format!("read season file {}: {err}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<SeasonTable> {
        let table: SeasonTable = serde_json::from_str(raw)
            .map_err(|err| FplError::Config(format!("invalid season json: {err}")))?;
        table.validated()
    }

    pub fn new(
        season: impl Into<String>,
        teams: Vec<TeamEntry>,
        short_names: HashMap<String, String>,
    ) -> Result<SeasonTable> {
        SeasonTable {
            season: season.into(),
            teams,
            short_names,
            by_id: HashMap::new(),
        }
        .validated()
    }

    fn validated(mut self) -> Result<SeasonTable> {
        if self.teams.is_empty() {
            return Err(FplError::Config(format!(
                "season {} has no teams",
                self.season
            )));
        }
        let mut names = HashSet::new();
        let mut by_id = HashMap::with_capacity(self.teams.len());
        for (idx, team) in self.teams.iter().enumerate() {
            if by_id.insert(team.id, idx).is_some() {
                return Err(FplError::Config(format!(
                    "season {} lists team id {} twice",
                    self.season, team.id
                )));
            }
            if !names.insert(team.name.as_str()) {
                return Err(FplError::Config(format!(
                    "season {} lists team {} twice",
                    self.season, team.name
                )));
            }
        }
        self.by_id = by_id;
        Ok(self)
    }

    pub fn team(&self, id: i64) -> Option<&TeamEntry> {
        self.by_id.get(&id).map(|&idx| &self.teams[idx])
    }

    /// Shortened display name, or the name unchanged when no alias exists.
    pub fn display_name<'a>(&'a self, web_name: &'a str) -> &'a str {
        self.short_names
            .get(web_name)
            .map(String::as_str)
            .unwrap_or(web_name)
    }
}
