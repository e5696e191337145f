use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One persisted CSV row: column name to cell value.
pub type HistoryRow = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
#[error("Invalid building id '{0}'. Expected a positive integer")]
pub struct BuildingIdParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(u64);

impl BuildingId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for BuildingId {
    type Err = BuildingIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(BuildingId::new)
            .ok_or_else(|| BuildingIdParseError(s.to_string()))
    }
}

impl Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Waitlist rank per building for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placements(BTreeMap<BuildingId, u64>);

impl Placements {
    pub fn new() -> Self {
        Self::default()
    }

    /// A building listed twice keeps the rank of its last lookup.
    pub fn insert(&mut self, building: BuildingId, rank: u64) {
        self.0.insert(building, rank);
    }

    pub fn get(&self, building: BuildingId) -> Option<u64> {
        self.0.get(&building).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingId, u64)> + '_ {
        self.0.iter().map(|(id, rank)| (*id, *rank))
    }

    pub fn to_row(&self) -> HistoryRow {
        self.iter()
            .map(|(id, rank)| (id.to_string(), rank.to_string()))
            .collect()
    }
}

impl Display for Placements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No waitlist placements recorded.");
        }
        writeln!(f, "{:>10}  {:>8}", "Building", "Rank")?;
        for (id, rank) in self.iter() {
            writeln!(f, "{:>10}  {:>8}", id, rank)?;
        }
        writeln!(f, "\n  Total buildings: {}", self.len())
    }
}
