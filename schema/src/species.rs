use crate::{FamilyId, RankedMoves, SpeciesId};
use serde::{Deserialize, Serialize};

pub const FEET_PER_METER: f32 = 3.28084;
pub const POUNDS_PER_KILOGRAM: f32 = 2.20462;

/// Immutable species reference record, one row of the species table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    /// Hyphenated lookup identifier, e.g. "hisuian-qwilfish".
    pub identifier: String,
    /// Canonical display name, e.g. "Hisuian Qwilfish".
    pub name: String,
    /// Groups alternate forms of one species together.
    pub group_id: SpeciesId,
    /// Height in tenths of a meter.
    pub height_dm: u32,
    /// Weight in tenths of a kilogram.
    pub weight_hg: u32,
    /// Ancestor species, `None` for the root of a family.
    pub evolves_from: Option<SpeciesId>,
}

impl Species {
    pub fn height_m(&self) -> f32 {
        self.height_dm as f32 / 10.0
    }

    pub fn height_ft(&self) -> f32 {
        self.height_m() * FEET_PER_METER
    }

    pub fn weight_kg(&self) -> f32 {
        self.weight_hg as f32 / 10.0
    }

    pub fn weight_lb(&self) -> f32 {
        self.weight_kg() * POUNDS_PER_KILOGRAM
    }
}

/// One row of the evolutionary-lineage table. Family member order is the
/// table's row order; ancestry is derived from it, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRow {
    pub species_id: SpeciesId,
    pub ancestor_id: Option<SpeciesId>,
    pub family_id: FamilyId,
}

/// A parsed stat pair: `base` dots filled out of `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub base: u8,
    pub max: u8,
}

impl StatRange {
    pub fn new(base: u8, max: u8) -> StatRange {
        StatRange { base, max }
    }

    /// Parse an `"n/d"` ratio string. Malformed input yields `None`
    /// ("stat unknown"), never an error.
    pub fn parse(text: &str) -> Option<StatRange> {
        let (base, max) = text.split_once('/')?;
        Some(StatRange {
            base: base.trim().parse().ok()?,
            max: max.trim().parse().ok()?,
        })
    }
}

/// Ordinary and hidden ability names for one species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    pub normal: Vec<String>,
    pub hidden: Vec<String>,
}

impl AbilitySet {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.hidden.is_empty()
    }
}

/// The merged, query-ready representation of one species.
///
/// Stats are `None` when no source supplied a parseable value; the five
/// core stats and base HP only ever come from override documents, while
/// dimensions fall back to the reference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSpeciesProfile {
    pub number: SpeciesId,
    pub name: String,
    pub base_hp: Option<u8>,
    pub strength: Option<StatRange>,
    pub dexterity: Option<StatRange>,
    pub vitality: Option<StatRange>,
    pub special: Option<StatRange>,
    pub insight: Option<StatRange>,
    /// One or two elemental type names.
    pub types: Vec<String>,
    pub abilities: AbilitySet,
    pub height_m: f32,
    pub height_ft: f32,
    pub weight_kg: f32,
    pub weight_lb: f32,
    pub moves: RankedMoves,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ratio_round_trip() {
        assert_eq!(StatRange::parse("3/6"), Some(StatRange::new(3, 6)));
        assert_eq!(StatRange::parse(" 2 / 5 "), Some(StatRange::new(2, 5)));
    }

    #[test]
    fn malformed_ratio_is_unknown_not_a_panic() {
        assert_eq!(StatRange::parse("not-a-ratio"), None);
        assert_eq!(StatRange::parse("3"), None);
        assert_eq!(StatRange::parse("3/x"), None);
        assert_eq!(StatRange::parse(""), None);
    }

    #[test]
    fn dimensions_convert_to_both_unit_systems() {
        let species = Species {
            id: 25,
            identifier: "pikachu".to_string(),
            name: "Pikachu".to_string(),
            group_id: 25,
            height_dm: 4,
            weight_hg: 60,
            evolves_from: Some(172),
        };
        assert_eq!(species.height_m(), 0.4);
        assert_eq!(species.weight_kg(), 6.0);
        assert!((species.height_ft() - 1.312336).abs() < 1e-4);
        assert!((species.weight_lb() - 13.22772).abs() < 1e-4);
    }
}
