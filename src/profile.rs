use crate::overrides::NormalizedDoc;
use crate::reference::ReferenceData;
use schema::{CanonicalSpeciesProfile, MethodKind, Rank, RankedMoves, Species, SpeciesId};

/// Merge override documents with the reference record into the
/// query-ready profile. Precedence per field is leftmost-present:
/// current schema, then legacy schema, then reference table. List-valued
/// fields (types, abilities, rank buckets) come wholesale from a single
/// source. `reference_moves` is only invoked when neither document
/// exists, so a species with zero hand authoring still yields usable
/// rank buckets.
pub fn merge_profile(
    species: &Species,
    current: Option<NormalizedDoc>,
    legacy: Option<NormalizedDoc>,
    reference_moves: impl FnOnce() -> RankedMoves,
) -> CanonicalSpeciesProfile {
    let had_documents = current.is_some() || legacy.is_some();
    let current = current.unwrap_or_default();
    let legacy = legacy.unwrap_or_default();

    let moves = if had_documents {
        current.moves.or(legacy.moves).unwrap_or_default()
    } else {
        reference_moves()
    };

    CanonicalSpeciesProfile {
        number: current.number.or(legacy.number).unwrap_or(species.id),
        name: current
            .name
            .or(legacy.name)
            .unwrap_or_else(|| species.name.clone()),
        base_hp: current.base_hp.or(legacy.base_hp),
        strength: current.strength.or(legacy.strength).value(),
        dexterity: current.dexterity.or(legacy.dexterity).value(),
        vitality: current.vitality.or(legacy.vitality).value(),
        special: current.special.or(legacy.special).value(),
        insight: current.insight.or(legacy.insight).value(),
        types: current.types.or(legacy.types).unwrap_or_default(),
        abilities: current.abilities.or(legacy.abilities).unwrap_or_default(),
        height_m: current
            .height_m
            .or(legacy.height_m)
            .unwrap_or_else(|| species.height_m()),
        height_ft: current
            .height_ft
            .or(legacy.height_ft)
            .unwrap_or_else(|| species.height_ft()),
        weight_kg: current
            .weight_kg
            .or(legacy.weight_kg)
            .unwrap_or_else(|| species.weight_kg()),
        weight_lb: current
            .weight_lb
            .or(legacy.weight_lb)
            .unwrap_or_else(|| species.weight_lb()),
        moves,
    }
}

/// Rank buckets computed straight from the reference move-edge table,
/// used when a species has no hand-authored documents. Level-up edges
/// translate through the legacy label table; every other method lands
/// in the overflow bucket.
pub fn reference_buckets(data: &ReferenceData, species_id: SpeciesId) -> RankedMoves {
    let mut moves = RankedMoves::new();
    let Some(edges) = data.edges.get(&species_id) else {
        return moves;
    };
    for edge in edges {
        let Some(move_data) = data.moves.get(&edge.move_id) else {
            continue;
        };
        let Some(method) = data.methods.get(&edge.method_id) else {
            continue;
        };
        let rank = match method.kind() {
            MethodKind::LevelUp => Rank::from_legacy_label(&method.label),
            _ => Rank::Other,
        };
        moves.insert(rank, move_data.name.clone());
    }
    moves
}
