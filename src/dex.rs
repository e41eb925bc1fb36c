use crate::abilities::{AbilityDoc, AbilityStore};
use crate::errors::{LoadResult, QueryError, QueryResult};
use crate::evolution::{Lineage, OVERRIDES_FILE};
use crate::learnsets;
use crate::move_docs::{MoveDoc, MoveDocStore};
use crate::overrides::DocumentStore;
use crate::profile;
use crate::reference::ReferenceData;
use schema::{AdditionalMoves, CanonicalSpeciesProfile, Species, SpeciesId};
use std::path::Path;
use tracing::debug;

pub const REFERENCE_DIR: &str = "reference";
pub const ABILITIES_DIR: &str = "abilities";
pub const MOVE_DOCS_DIR: &str = "moves";

/// The immutable process-wide data snapshot. Built once by
/// [`Dex::load`], then shared read-only across request handlers.
/// Picking up edited data means building a fresh snapshot and swapping
/// the reference to it (e.g. behind an `Arc`); the snapshot itself
/// never mutates, so every query method is safe to call concurrently.
#[derive(Debug)]
pub struct Dex {
    reference: ReferenceData,
    lineage: Lineage,
    documents: DocumentStore,
    abilities: AbilityStore,
    move_docs: MoveDocStore,
}

impl Dex {
    /// Build a snapshot from the conventional data layout:
    ///
    /// ```text
    /// data_dir/
    ///   reference/            pokemon.csv, moves.csv, learn_methods.csv,
    ///                         pokemon_moves.csv, families.csv
    ///   lineage_overrides.ron (optional)
    ///   pokemon_new/          current-schema override documents (optional)
    ///   pokemon_old/          legacy-schema override documents (optional)
    ///   abilities/            ability documents (optional)
    ///   moves/                move documents (optional)
    /// ```
    pub fn load(data_dir: &Path) -> LoadResult<Dex> {
        let reference = ReferenceData::load_dir(&data_dir.join(REFERENCE_DIR))?;
        let overrides = Lineage::load_overrides(&data_dir.join(OVERRIDES_FILE))?;
        let lineage = Lineage::new(&reference.families, overrides)?;
        let documents = DocumentStore::new(data_dir);
        let abilities = AbilityStore::load(&data_dir.join(ABILITIES_DIR));
        let move_docs = MoveDocStore::load(&data_dir.join(MOVE_DOCS_DIR));

        debug!(species = reference.species.len(), "dex snapshot ready");

        Ok(Dex {
            reference,
            lineage,
            documents,
            abilities,
            move_docs,
        })
    }

    /// Resolve an arbitrary user-supplied name to a canonical species
    /// ID, tolerating punctuation and hyphenation variance.
    pub fn resolve(&self, name: &str) -> QueryResult<SpeciesId> {
        self.reference
            .names
            .resolve(name)
            .ok_or_else(|| QueryError::NameNotFound(name.to_string()))
    }

    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.reference.species.get(&id)
    }

    /// Display names of every known species, sorted ascending. Intended
    /// for autocomplete collaborators.
    pub fn species_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .reference
            .species
            .values()
            .map(|s| s.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// The merged, query-ready profile for a species. Override
    /// documents are re-read on every call; see the crate docs for the
    /// caching stance.
    pub fn profile(&self, id: SpeciesId) -> QueryResult<CanonicalSpeciesProfile> {
        let species = self
            .reference
            .species
            .get(&id)
            .ok_or(QueryError::SpeciesNotFound(id))?;
        let (current, legacy) = self.documents.load(&species.name);
        Ok(profile::merge_profile(species, current, legacy, || {
            profile::reference_buckets(&self.reference, id)
        }))
    }

    /// Ordered ancestry of a species, ending in the species itself.
    pub fn chain_for(&self, id: SpeciesId) -> Vec<SpeciesId> {
        self.lineage.chain_for(id)
    }

    /// Machine, egg, tutor and unlisted level-up moves aggregated
    /// across the species' whole resolved ancestry.
    pub fn additional_moves(&self, id: SpeciesId) -> QueryResult<AdditionalMoves> {
        let profile = self.profile(id)?;
        let chain = self.chain_for(id);
        Ok(learnsets::classify_chain(
            &self.reference,
            &chain,
            &profile.moves,
        ))
    }

    pub fn ability(&self, name: &str) -> Option<&AbilityDoc> {
        self.abilities.get(name)
    }

    pub fn move_doc(&self, name: &str) -> Option<&MoveDoc> {
        self.move_docs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoadError;
    use crate::overrides::{NEW_DOCUMENTS_DIR, OLD_DOCUMENTS_DIR};
    use pretty_assertions::assert_eq;
    use schema::{Rank, StatRange};
    use std::fs;
    use tempfile::TempDir;

    const POKEMON_CSV: &str = "\
id,identifier,name,group_id,height,weight,evolves_from_id
211,qwilfish,Qwilfish,211,5,39,
10229,qwilfish-hisui,Hisuian Qwilfish,211,5,39,
904,overqwil,Overqwil,904,25,605,10229
";

    const MOVES_CSV: &str = "\
id,name,type_id,power,accuracy,pp
33,Tackle,1,40,100,35
398,Poison Jab,4,80,100,20
3,Barb Barrage,4,60,100,10
56,Hydro Pump,11,110,80,5
";

    const METHODS_CSV: &str = "\
id,label
1,Level Up
2,Egg
3,Tutor
4,Machine
";

    const EDGES_CSV: &str = "\
species_id,move_id,method_id,level
10229,33,1,1
10229,398,4,
10229,56,3,
904,3,1,25
211,33,1,1
";

    const FAMILIES_CSV: &str = "\
species_id,ancestor_id,family_id
211,,90
904,211,90
10229,,90
";

    fn write_fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join(REFERENCE_DIR);
        fs::create_dir_all(&reference).unwrap();
        fs::write(reference.join("pokemon.csv"), POKEMON_CSV).unwrap();
        fs::write(reference.join("moves.csv"), MOVES_CSV).unwrap();
        fs::write(reference.join("learn_methods.csv"), METHODS_CSV).unwrap();
        fs::write(reference.join("pokemon_moves.csv"), EDGES_CSV).unwrap();
        fs::write(reference.join("families.csv"), FAMILIES_CSV).unwrap();

        // Overqwil evolves from the regional form, not the base form
        // the reference lineage claims.
        fs::write(
            dir.path().join(OVERRIDES_FILE),
            "[\n    (species: 904, ancestors: [10229]),\n]\n",
        )
        .unwrap();

        let new_dir = dir.path().join(NEW_DOCUMENTS_DIR);
        fs::create_dir_all(&new_dir).unwrap();
        fs::write(
            new_dir.join("Overqwil.json"),
            r#"{
                "number": 904,
                "name": "Overqwil",
                "base_hp": 5,
                "strength": "3/5",
                "types": ["Dark", "Poison"],
                "moves": {"bronze": ["Barb Barrage"], "gold": ["Dark Pulse"]}
            }"#,
        )
        .unwrap();

        let old_dir = dir.path().join(OLD_DOCUMENTS_DIR);
        fs::create_dir_all(&old_dir).unwrap();
        fs::write(
            old_dir.join("Overqwil.json"),
            r#"{
                "BaseHP": 2,
                "Insight": 2,
                "MaxInsight": 4,
                "Moves": [{"Name": "Tackle", "Learned": "Starter"}]
            }"#,
        )
        .unwrap();

        dir
    }

    #[test]
    fn names_resolve_across_both_registered_forms() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();

        assert_eq!(dex.resolve("Overqwil"), Ok(904));
        assert_eq!(dex.resolve("qwilfish-hisui"), Ok(10229));
        assert_eq!(dex.resolve("Hisuian Qwilfish"), Ok(10229));
        assert_eq!(dex.resolve("HisuianQwilfish"), Ok(10229));
        assert_eq!(
            dex.resolve("missingno"),
            Err(QueryError::NameNotFound("missingno".to_string()))
        );
    }

    #[test]
    fn profile_merges_documents_with_current_schema_precedence() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        let profile = dex.profile(904).unwrap();

        // Conflicting base_hp takes the current-schema value.
        assert_eq!(profile.base_hp, Some(5));
        assert_eq!(profile.strength, Some(StatRange::new(3, 5)));
        // Legacy-only fields still contribute.
        assert_eq!(profile.insight, Some(StatRange::new(2, 4)));
        // The move map comes wholesale from the current document.
        assert_eq!(profile.moves.moves_at(Rank::Bronze), ["Barb Barrage"]);
        assert_eq!(profile.moves.moves_at(Rank::Gold), ["Dark Pulse"]);
        // Dimensions fall through to the reference record.
        assert_eq!(profile.height_m, 2.5);
        assert_eq!(profile.weight_kg, 60.5);
        assert_eq!(profile.types, vec!["Dark".to_string(), "Poison".to_string()]);
    }

    #[test]
    fn reference_only_species_still_gets_a_profile() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        let profile = dex.profile(211).unwrap();

        assert_eq!(profile.name, "Qwilfish");
        assert_eq!(profile.base_hp, None);
        assert_eq!(profile.moves.moves_at(Rank::Bronze), ["Tackle"]);
        assert_eq!(profile.height_m, 0.5);
    }

    #[test]
    fn unknown_species_id_is_a_typed_failure() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        assert_eq!(dex.profile(9999), Err(QueryError::SpeciesNotFound(9999)));
    }

    #[test]
    fn lineage_override_supersedes_reference_ancestry() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();

        // The reference family would compute [211, 904]; the override
        // is authoritative.
        assert_eq!(dex.chain_for(904), vec![10229, 904]);
        assert_eq!(dex.chain_for(211), vec![211]);
    }

    #[test]
    fn additional_moves_span_the_resolved_ancestry() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        let additional = dex.additional_moves(904).unwrap();

        // Poison Jab is machine-taught to Hisuian Qwilfish only, yet it
        // is attributed to Overqwil through the override chain.
        assert!(additional.machine.contains("Poison Jab"));
        assert!(additional.tutor.contains("Hydro Pump"));
        // Tackle is level-taught to the ancestor and absent from the
        // rank buckets.
        assert!(additional.unlisted_level.contains("Tackle"));
        // Barb Barrage is level-taught but already rank-bucketed.
        assert!(!additional.unlisted_level.contains("Barb Barrage"));
    }

    #[test]
    fn rank_buckets_and_unlisted_level_never_overlap() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();

        for id in [211, 904, 10229] {
            let profile = dex.profile(id).unwrap();
            let additional = dex.additional_moves(id).unwrap();
            for name in profile.moves.all_moves() {
                assert!(
                    !additional.unlisted_level.contains(name),
                    "{} appears both rank-bucketed and unlisted for {}",
                    name,
                    id
                );
            }
        }
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        assert_eq!(
            dex.additional_moves(904).unwrap(),
            dex.additional_moves(904).unwrap()
        );
        assert_eq!(dex.profile(904).unwrap(), dex.profile(904).unwrap());
    }

    #[test]
    fn species_names_are_sorted_for_autocomplete() {
        let dir = write_fixture();
        let dex = Dex::load(dir.path()).unwrap();
        assert_eq!(
            dex.species_names(),
            vec!["Hisuian Qwilfish", "Overqwil", "Qwilfish"]
        );
    }

    #[test]
    fn duplicate_lineage_override_fails_the_load() {
        let dir = write_fixture();
        fs::write(
            dir.path().join(OVERRIDES_FILE),
            "[\n    (species: 904, ancestors: [10229]),\n    (species: 904, ancestors: [211]),\n]\n",
        )
        .unwrap();

        assert_eq!(
            Dex::load(dir.path()).unwrap_err(),
            LoadError::DuplicateLineageOverride(904)
        );
    }

    #[test]
    fn missing_reference_table_refuses_to_serve() {
        let dir = write_fixture();
        fs::remove_file(dir.path().join(REFERENCE_DIR).join("moves.csv")).unwrap();
        assert!(matches!(
            Dex::load(dir.path()).unwrap_err(),
            LoadError::Io(_)
        ));
    }
}
