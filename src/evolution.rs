use crate::errors::{LoadError, LoadResult};
use schema::{FamilyId, FamilyRow, SpeciesId};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const OVERRIDES_FILE: &str = "lineage_overrides.ron";

/// One hand-authored lineage exception: the full ordered ancestor list
/// for a species whose stored lineage is wrong or ambiguous (split
/// evolutions, regional forms).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineageOverride {
    pub species: SpeciesId,
    pub ancestors: Vec<SpeciesId>,
}

/// Evolutionary ancestry derived from the reference lineage table, plus
/// the override entries that supersede it.
#[derive(Debug, Clone, Default)]
pub struct Lineage {
    members: HashMap<FamilyId, Vec<SpeciesId>>,
    family_of: HashMap<SpeciesId, FamilyId>,
    overrides: HashMap<SpeciesId, Vec<SpeciesId>>,
}

impl Lineage {
    /// Index the lineage rows and install the override entries. Two
    /// override entries for the same species are a data-authoring
    /// defect and fail the load instead of silently dropping one.
    pub fn new(rows: &[FamilyRow], overrides: Vec<LineageOverride>) -> LoadResult<Lineage> {
        let mut members: HashMap<FamilyId, Vec<SpeciesId>> = HashMap::new();
        let mut family_of = HashMap::new();
        for row in rows {
            let family = members.entry(row.family_id).or_default();
            if !family.contains(&row.species_id) {
                family.push(row.species_id);
            }
            family_of.entry(row.species_id).or_insert(row.family_id);
        }

        let mut override_map = HashMap::new();
        for entry in overrides {
            if override_map
                .insert(entry.species, entry.ancestors)
                .is_some()
            {
                return Err(LoadError::DuplicateLineageOverride(entry.species));
            }
        }
        debug!(
            families = members.len(),
            overrides = override_map.len(),
            "lineage indexed"
        );

        Ok(Lineage {
            members,
            family_of,
            overrides: override_map,
        })
    }

    /// Load the override table from its RON file. A missing file is an
    /// empty table.
    pub fn load_overrides(path: &Path) -> LoadResult<Vec<LineageOverride>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
        ron::from_str(&content).map_err(|e| LoadError::BadLineageTable(e.to_string()))
    }

    pub fn has_override(&self, species: SpeciesId) -> bool {
        self.overrides.contains_key(&species)
    }

    /// Ordered ancestry of `species`, ending in `species` itself.
    ///
    /// An override entry is authoritative: its ancestor list is returned
    /// verbatim with no validation against the reference lineage.
    /// Otherwise the chain is the prefix of the species' family member
    /// list (table row order) up to and including the species. A species
    /// in no family is its own chain.
    pub fn chain_for(&self, species: SpeciesId) -> Vec<SpeciesId> {
        if let Some(ancestors) = self.overrides.get(&species) {
            let mut chain = ancestors.clone();
            chain.push(species);
            return chain;
        }

        if let Some(family_id) = self.family_of.get(&species) {
            if let Some(members) = self.members.get(family_id) {
                let mut chain = Vec::new();
                for &member in members {
                    chain.push(member);
                    if member == species {
                        return chain;
                    }
                }
            }
        }

        vec![species]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn family_rows() -> Vec<FamilyRow> {
        vec![
            FamilyRow {
                species_id: 172,
                ancestor_id: None,
                family_id: 10,
            },
            FamilyRow {
                species_id: 25,
                ancestor_id: Some(172),
                family_id: 10,
            },
            FamilyRow {
                species_id: 26,
                ancestor_id: Some(25),
                family_id: 10,
            },
            // Qwilfish family: the stored lineage lists Overqwil as
            // evolving from the base form, which is wrong for the
            // regional variant.
            FamilyRow {
                species_id: 211,
                ancestor_id: None,
                family_id: 90,
            },
            FamilyRow {
                species_id: 904,
                ancestor_id: Some(211),
                family_id: 90,
            },
        ]
    }

    #[test]
    fn computed_chain_is_the_family_prefix() {
        let lineage = Lineage::new(&family_rows(), vec![]).unwrap();
        assert_eq!(lineage.chain_for(26), vec![172, 25, 26]);
        assert_eq!(lineage.chain_for(25), vec![172, 25]);
        assert_eq!(lineage.chain_for(172), vec![172]);
    }

    #[test]
    fn species_outside_any_family_is_a_singleton_chain() {
        let lineage = Lineage::new(&family_rows(), vec![]).unwrap();
        assert_eq!(lineage.chain_for(132), vec![132]);
    }

    #[test]
    fn override_entry_supersedes_the_computed_chain() {
        let overrides = vec![LineageOverride {
            species: 904,
            ancestors: vec![10229],
        }];
        let lineage = Lineage::new(&family_rows(), overrides).unwrap();
        // Overqwil descends from Hisuian Qwilfish, not the base form,
        // even though the reference table says otherwise.
        assert_eq!(lineage.chain_for(904), vec![10229, 904]);
        // Other members of the family still use the computed chain.
        assert_eq!(lineage.chain_for(211), vec![211]);
    }

    #[test]
    fn duplicate_override_keys_fail_the_load() {
        let overrides = vec![
            LineageOverride {
                species: 904,
                ancestors: vec![10229],
            },
            LineageOverride {
                species: 904,
                ancestors: vec![211],
            },
        ];
        let err = Lineage::new(&family_rows(), overrides).unwrap_err();
        assert_eq!(err, LoadError::DuplicateLineageOverride(904));
    }

    #[test]
    fn override_table_parses_from_ron() {
        let table = r#"[
            (species: 904, ancestors: [10229]),
            (species: 10230, ancestors: [10231, 10232]),
        ]"#;
        let entries: Vec<LineageOverride> = ron::from_str(table).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ancestors, vec![10229]);
    }
}
