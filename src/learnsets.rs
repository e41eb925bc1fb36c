use crate::reference::ReferenceData;
use schema::{AdditionalMoves, MethodKind, RankedMoves, SpeciesId};

/// Classify every move-edge along `chain` into the supplementary
/// categories. `ranked` is the query species' rank-bucketed view;
/// level-up moves already present there are excluded from
/// `unlisted_level`. Sets accumulate across the whole chain, so a move
/// taught to an earlier ancestor is attributed to the query species.
pub fn classify_chain(
    data: &ReferenceData,
    chain: &[SpeciesId],
    ranked: &RankedMoves,
) -> AdditionalMoves {
    let known = ranked.all_moves();
    let mut result = AdditionalMoves::default();

    for &ancestor in chain {
        let Some(edges) = data.edges.get(&ancestor) else {
            continue;
        };
        for edge in edges {
            let Some(move_data) = data.moves.get(&edge.move_id) else {
                continue;
            };
            let Some(method) = data.methods.get(&edge.method_id) else {
                continue;
            };
            let name = &move_data.name;
            match method.kind() {
                MethodKind::Machine => {
                    result.machine.insert(name.clone());
                }
                MethodKind::Egg => {
                    result.egg.insert(name.clone());
                }
                MethodKind::Tutor => {
                    result.tutor.insert(name.clone());
                }
                MethodKind::LevelUp => {
                    if !known.contains(name.as_str()) {
                        result.unlisted_level.insert(name.clone());
                    }
                }
                MethodKind::Other => {}
            }
        }
    }

    result
}
