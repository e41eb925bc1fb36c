use crate::{MethodId, MoveId, SpeciesId, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable move reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    /// Display name, e.g. "Thunder Punch".
    pub name: String,
    pub type_id: TypeId,
    pub power: Option<u8>,
    pub accuracy: Option<u8>,
    pub pp: u8,
}

/// Learn-method vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnMethod {
    pub id: MethodId,
    /// Display label, e.g. "Machine" or "Level Up".
    pub label: String,
}

impl LearnMethod {
    pub fn kind(&self) -> MethodKind {
        MethodKind::from_label(&self.label)
    }
}

/// Classification of a learn-method label, tolerant of casing and
/// punctuation variance ("Level Up", "level-up", "LEVELUP").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    LevelUp,
    Machine,
    Egg,
    Tutor,
    /// Overflow for any label outside the recognized vocabulary.
    Other,
}

impl MethodKind {
    pub fn from_label(label: &str) -> MethodKind {
        let canon: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match canon.as_str() {
            "levelup" => MethodKind::LevelUp,
            "machine" => MethodKind::Machine,
            "egg" => MethodKind::Egg,
            "tutor" => MethodKind::Tutor,
            _ => MethodKind::Other,
        }
    }
}

/// One learnable-move edge. Multiple edges may exist for the same
/// (species, move) pair when a move is learnable by several methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnEdge {
    pub species_id: SpeciesId,
    pub move_id: MoveId,
    pub method_id: MethodId,
    pub level: Option<u8>,
}

/// Aggregated move categories spanning a species' whole resolved
/// ancestry. `BTreeSet` keeps repeated calls byte-identical for a fixed
/// data snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalMoves {
    pub machine: BTreeSet<String>,
    pub egg: BTreeSet<String>,
    pub tutor: BTreeSet<String>,
    /// Level-taught moves missing from the rank-bucketed view.
    pub unlisted_level: BTreeSet<String>,
}
