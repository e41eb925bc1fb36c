use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::{Display, EnumIter, EnumString};

/// The fixed progression taxonomy used to classify how advanced a
/// learnable move is. `Other` is the overflow bucket for edges that do
/// not fit the five-level progression.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Other,
}

impl Rank {
    /// Translate a legacy learned-label into a rank. Labels outside the
    /// table deliberately fall back to `Bronze` rather than erroring;
    /// hand-authored legacy documents contain plenty of stray labels.
    pub fn from_legacy_label(label: &str) -> Rank {
        match label {
            "Starter" | "Beginner" => Rank::Bronze,
            "Amateur" => Rank::Silver,
            "Ace" => Rank::Gold,
            "Pro" => Rank::Platinum,
            "Master" | "Champion" => Rank::Diamond,
            _ => Rank::Bronze,
        }
    }
}

/// Rank-bucketed move names. Buckets preserve document order and hold no
/// duplicates within a bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedMoves {
    buckets: BTreeMap<Rank, Vec<String>>,
}

impl RankedMoves {
    pub fn new() -> RankedMoves {
        RankedMoves::default()
    }

    /// Add a move to a bucket. A name already present in that bucket is
    /// ignored.
    pub fn insert(&mut self, rank: Rank, name: impl Into<String>) {
        let name = name.into();
        let bucket = self.buckets.entry(rank).or_default();
        if !bucket.iter().any(|m| *m == name) {
            bucket.push(name);
        }
    }

    pub fn moves_at(&self, rank: Rank) -> &[String] {
        self.buckets.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Every bucketed move name flattened into one lookup set.
    pub fn all_moves(&self) -> BTreeSet<&str> {
        self.buckets
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Buckets in rank order, skipping empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &[String])> {
        self.buckets
            .iter()
            .filter(|(_, moves)| !moves.is_empty())
            .map(|(rank, moves)| (*rank, moves.as_slice()))
    }
}
