//! Team files: rosters written by pet name instead of full unit records.
//!
//! ```json
//! { "name": "ants", "pets": [{ "pet": "ant", "experience": 2 }, null, { "pet": "sheep", "status": "honey" }] }
//! ```
//!
//! Missing trailing slots are filled with empty ones.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sap_battle::catalogue;
use sap_battle::{Roster, Status, Unit};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetEntry {
    pub pet: String,
    #[serde(default)]
    pub experience: u8,
    #[serde(default)]
    pub status: Option<Status>,
    /// Overrides the catalogue attack after experience is applied.
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default)]
    pub health: Option<i32>,
}

impl PetEntry {
    pub fn to_unit(&self) -> Result<Unit> {
        let mut unit = catalogue::pet(&self.pet).with_context(|| format!("unknown pet `{}`", self.pet))?;
        unit.gain_experience(self.experience);
        if let Some(attack) = self.attack {
            unit.attack = attack.max(0);
        }
        if let Some(health) = self.health {
            unit.health = health;
        }
        unit.status = self.status;
        Ok(unit)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFile {
    #[serde(default)]
    pub name: Option<String>,
    pub pets: Vec<Option<PetEntry>>,
}

impl TeamFile {
    pub fn to_roster(&self, capacity: usize) -> Result<Roster> {
        if self.pets.len() > capacity {
            bail!("{} pets listed but a roster holds {}", self.pets.len(), capacity);
        }
        let mut slots = self
            .pets
            .iter()
            .map(|entry| entry.as_ref().map(PetEntry::to_unit).transpose())
            .collect::<Result<Vec<_>>>()?;
        slots.resize(capacity, None);
        Ok(Roster::from_slots(slots, capacity)?)
    }

    /// Display name, falling back to `fallback` when the file has none.
    pub fn display_name(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_string())
    }
}

pub fn load_team(path: &Path) -> Result<TeamFile> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing team file {}", path.display()))
}

/// A league file is a JSON array of team files.
pub fn load_league(path: &Path) -> Result<Vec<TeamFile>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing league file {}", path.display()))
}
