// In: src/lib.rs

//! Pokerole Dex Core
//!
//! Canonical species profiles for the Pokerole tabletop adaptation.
//! Merges the static reference dataset (species, moves, learnable-move
//! edges, learn methods, evolutionary lineage) with hand-authored
//! override documents in two historical schemas, and computes full
//! learnable-move sets across each species' resolved ancestry.
//!
//! Everything loads once into an immutable [`Dex`] snapshot; every
//! query is a pure read over it. Reloading edited data means building a
//! new snapshot and swapping the reference, never mutating in place.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod abilities;
pub mod dex;
pub mod errors;
pub mod evolution;
pub mod learnsets;
pub mod move_docs;
pub mod names;
pub mod overrides;
pub mod profile;
pub mod reference;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pokerole-dex`
// crate, making it easy for embedding applications to import the most
// important types directly.

// --- From the `schema` crate ---
// Re-export all core data definitions.
pub use schema::{
    // Supporting Types & Enums
    AbilitySet,
    AdditionalMoves,
    CanonicalSpeciesProfile,
    FamilyRow,
    LearnEdge,
    LearnMethod,
    // Core Enums
    MethodKind,
    // Core Data Structs
    MoveData,
    Rank,
    RankedMoves,
    Species,
    SpeciesId,
    StatRange,
};

// --- From this crate's modules (`src/`) ---

// The snapshot object and its query surface.
pub use dex::Dex;

// Supplementary document types.
pub use abilities::AbilityDoc;
pub use move_docs::MoveDoc;

// Name handling for embedding applications.
pub use names::normalize;

// Crate-specific error and result types.
pub use errors::{LoadError, LoadResult, QueryError, QueryResult};
