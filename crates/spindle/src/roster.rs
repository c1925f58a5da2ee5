use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Display label for one wheel slice. Labels are upper-cased on entry so
/// the wheel face reads uniformly regardless of how titles were typed.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

impl ItemLabel {
    /// Trimmed, upper-cased label; `None` when nothing printable remains.
    pub fn normalized(raw: &str) -> Option<Self> {
        let name = raw.trim().to_uppercase();
        (!name.is_empty()).then_some(Self(name))
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Malformed roster file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Insertion-ordered list of wheel items.
///
/// Order is significant: it defines the slice layout and the
/// index-to-winner mapping, so items are only ever appended, removed by
/// position, or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    items: Vec<ItemLabel>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock movie-night list used until the user saves their own.
    pub fn seed() -> Self {
        const SEED_TITLES: [&str; 8] = [
            "The Worst Witch",
            "Winnie the Pooh Blood and Honey 2",
            "Shaun of the Dead",
            "Zombie Land",
            "Scary Movie 1",
            "Vampires suck",
            "Zombeavers",
            "Slotherhouse",
        ];
        Self {
            items: SEED_TITLES
                .iter()
                .filter_map(|title| ItemLabel::normalized(title))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ItemLabel> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemLabel> {
        self.items.iter()
    }

    pub fn add(&mut self, label: ItemLabel) {
        self.items.push(label);
    }

    /// Removes and returns the item at `index`; out-of-range positions
    /// leave the roster untouched.
    pub fn remove(&mut self, index: usize) -> Option<ItemLabel> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Where the roster lives on disk (`$XDG_DATA_HOME/rondel/roster.json`).
    pub fn storage_path() -> std::io::Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("rondel").place_data_file("roster.json")
    }

    pub fn load_from(path: &Path) -> Result<Self, RosterError> {
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), RosterError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(fs::write(path, serde_json::to_vec_pretty(self)?)?)
    }

    pub fn save(&self) -> Result<(), RosterError> {
        self.save_to(&Self::storage_path()?)
    }

    /// Loads the saved roster, seeding (and persisting) the stock list on a
    /// first run. A malformed file is left in place and the stock list is
    /// used for the session.
    pub fn load_or_seed() -> Self {
        let path = match Self::storage_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("No data directory for the roster: {}", e);
                return Self::seed();
            }
        };

        if !path.exists() {
            let roster = Self::seed();
            if let Err(e) = roster.save_to(&path) {
                log::warn!("Failed to save the seeded roster: {}", e);
            }
            return roster;
        }

        match Self::load_from(&path) {
            Ok(roster) => roster,
            Err(e) => {
                log::warn!("Ignoring malformed roster at {}: {}", path.display(), e);
                Self::seed()
            }
        }
    }
}
