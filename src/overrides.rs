use schema::{AbilitySet, Rank, RankedMoves, SpeciesId, StatRange};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const NEW_DOCUMENTS_DIR: &str = "pokemon_new";
pub const OLD_DOCUMENTS_DIR: &str = "pokemon_old";

/// Current-schema override document: lowercase keys, `"n/d"` stat
/// strings, moves pre-bucketed by rank name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentDoc {
    pub number: Option<SpeciesId>,
    pub name: Option<String>,
    pub base_hp: Option<u8>,
    pub strength: Option<String>,
    pub dexterity: Option<String>,
    pub vitality: Option<String>,
    pub special: Option<String>,
    pub insight: Option<String>,
    #[serde(alias = "type")]
    pub types: Option<Vec<String>>,
    pub abilities: Option<CurrentAbilities>,
    pub height_m: Option<f32>,
    pub height_ft: Option<f32>,
    pub weight_kg: Option<f32>,
    pub weight_lb: Option<f32>,
    pub moves: Option<BTreeMap<String, Vec<String>>>,
}

/// Abilities appear in two shapes across current-schema documents: the
/// updater writes `{normal, hidden}`, older hand entries used a flat
/// list of ordinary abilities.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CurrentAbilities {
    Split {
        #[serde(default)]
        normal: Vec<String>,
        #[serde(default)]
        hidden: Vec<String>,
    },
    Flat(Vec<String>),
}

impl CurrentAbilities {
    fn into_ability_set(self) -> AbilitySet {
        match self {
            CurrentAbilities::Split { normal, hidden } => AbilitySet { normal, hidden },
            CurrentAbilities::Flat(normal) => AbilitySet {
                normal,
                hidden: Vec::new(),
            },
        }
    }
}

/// Legacy-schema override document: capitalized keys, raw+max integer
/// stat pairs, flat move list with learned-labels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyDoc {
    #[serde(rename = "Number")]
    pub number: Option<SpeciesId>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "BaseHP")]
    pub base_hp: Option<u8>,
    #[serde(rename = "Strength")]
    pub strength: Option<u8>,
    #[serde(rename = "MaxStrength")]
    pub max_strength: Option<u8>,
    #[serde(rename = "Dexterity")]
    pub dexterity: Option<u8>,
    #[serde(rename = "MaxDexterity")]
    pub max_dexterity: Option<u8>,
    #[serde(rename = "Vitality")]
    pub vitality: Option<u8>,
    #[serde(rename = "MaxVitality")]
    pub max_vitality: Option<u8>,
    #[serde(rename = "Special")]
    pub special: Option<u8>,
    #[serde(rename = "MaxSpecial")]
    pub max_special: Option<u8>,
    #[serde(rename = "Insight")]
    pub insight: Option<u8>,
    #[serde(rename = "MaxInsight")]
    pub max_insight: Option<u8>,
    #[serde(rename = "Type1")]
    pub type1: Option<String>,
    #[serde(rename = "Type2")]
    pub type2: Option<String>,
    #[serde(rename = "Ability1")]
    pub ability1: Option<String>,
    #[serde(rename = "Ability2")]
    pub ability2: Option<String>,
    #[serde(rename = "HiddenAbility")]
    pub hidden_ability: Option<String>,
    #[serde(rename = "Height")]
    pub height: Option<LegacyHeight>,
    #[serde(rename = "Weight")]
    pub weight: Option<LegacyWeight>,
    #[serde(rename = "Moves")]
    pub moves: Option<Vec<LegacyMove>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyHeight {
    #[serde(rename = "Meters")]
    pub meters: Option<f32>,
    #[serde(rename = "Feet")]
    pub feet: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyWeight {
    #[serde(rename = "Kilograms")]
    pub kilograms: Option<f32>,
    #[serde(rename = "Pounds")]
    pub pounds: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMove {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Learned", default)]
    pub learned: String,
}

/// A stat field after normalization. `Unknown` is present-but-malformed
/// input: it participates in precedence but renders as no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatField {
    #[default]
    Absent,
    Unknown,
    Known(StatRange),
}

impl StatField {
    fn from_ratio(text: Option<&str>) -> StatField {
        match text {
            None => StatField::Absent,
            Some(t) => match StatRange::parse(t) {
                Some(range) => StatField::Known(range),
                None => StatField::Unknown,
            },
        }
    }

    fn from_pair(base: Option<u8>, max: Option<u8>) -> StatField {
        if base.is_none() && max.is_none() {
            StatField::Absent
        } else {
            StatField::Known(StatRange::new(base.unwrap_or(0), max.unwrap_or(0)))
        }
    }

    /// Precedence combinator: keep `self` unless it is absent.
    pub fn or(self, fallback: StatField) -> StatField {
        match self {
            StatField::Absent => fallback,
            present => present,
        }
    }

    pub fn value(self) -> Option<StatRange> {
        match self {
            StatField::Known(range) => Some(range),
            _ => None,
        }
    }
}

/// One override document reduced to the canonical shape, whichever
/// schema it arrived in. Absence stays explicit per field so the
/// precedence merge remains field-by-field.
#[derive(Debug, Clone, Default)]
pub struct NormalizedDoc {
    pub number: Option<SpeciesId>,
    pub name: Option<String>,
    pub base_hp: Option<u8>,
    pub strength: StatField,
    pub dexterity: StatField,
    pub vitality: StatField,
    pub special: StatField,
    pub insight: StatField,
    pub types: Option<Vec<String>>,
    pub abilities: Option<AbilitySet>,
    pub height_m: Option<f32>,
    pub height_ft: Option<f32>,
    pub weight_kg: Option<f32>,
    pub weight_lb: Option<f32>,
    pub moves: Option<RankedMoves>,
}

/// Reduce a current-schema document. Rank keys match the rank
/// enumeration case-insensitively; unrecognized keys are dropped from
/// the rank-bucketed view with a warning.
pub fn normalize_current(doc: CurrentDoc, species: &str) -> NormalizedDoc {
    let moves = doc.moves.map(|buckets| {
        let mut ranked = RankedMoves::new();
        for (key, names) in buckets {
            match Rank::from_str(&key) {
                Ok(rank) => {
                    for name in names {
                        ranked.insert(rank, name);
                    }
                }
                Err(_) => {
                    warn!(
                        species,
                        bucket = %key,
                        count = names.len(),
                        "unrecognized rank key in override document; moves dropped from rank view"
                    );
                }
            }
        }
        ranked
    });

    NormalizedDoc {
        number: doc.number,
        name: doc.name,
        base_hp: doc.base_hp,
        strength: StatField::from_ratio(doc.strength.as_deref()),
        dexterity: StatField::from_ratio(doc.dexterity.as_deref()),
        vitality: StatField::from_ratio(doc.vitality.as_deref()),
        special: StatField::from_ratio(doc.special.as_deref()),
        insight: StatField::from_ratio(doc.insight.as_deref()),
        types: doc.types.map(drop_empty_names),
        abilities: doc.abilities.map(CurrentAbilities::into_ability_set),
        height_m: doc.height_m,
        height_ft: doc.height_ft,
        weight_kg: doc.weight_kg,
        weight_lb: doc.weight_lb,
        moves,
    }
}

/// Reduce a legacy-schema document, translating learned-labels through
/// the fixed rank table.
pub fn normalize_legacy(doc: LegacyDoc) -> NormalizedDoc {
    let types = {
        let listed = drop_empty_names([doc.type1, doc.type2].into_iter().flatten().collect());
        (!listed.is_empty()).then_some(listed)
    };

    let abilities = {
        let normal = drop_empty_names([doc.ability1, doc.ability2].into_iter().flatten().collect());
        let hidden = drop_empty_names(doc.hidden_ability.into_iter().collect());
        let set = AbilitySet { normal, hidden };
        (!set.is_empty()).then_some(set)
    };

    let moves = doc.moves.map(|entries| {
        let mut ranked = RankedMoves::new();
        for entry in entries {
            ranked.insert(Rank::from_legacy_label(&entry.learned), entry.name);
        }
        ranked
    });

    let height = doc.height.unwrap_or_default();
    let weight = doc.weight.unwrap_or_default();

    NormalizedDoc {
        number: doc.number,
        name: doc.name,
        base_hp: doc.base_hp,
        strength: StatField::from_pair(doc.strength, doc.max_strength),
        dexterity: StatField::from_pair(doc.dexterity, doc.max_dexterity),
        vitality: StatField::from_pair(doc.vitality, doc.max_vitality),
        special: StatField::from_pair(doc.special, doc.max_special),
        insight: StatField::from_pair(doc.insight, doc.max_insight),
        types,
        abilities,
        height_m: height.meters,
        height_ft: height.feet,
        weight_kg: weight.kilograms,
        weight_lb: weight.pounds,
        moves,
    }
}

fn drop_empty_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .collect()
}

/// Per-species override document store: two sibling directories, one
/// per schema generation, filenames derived from the exact display
/// name. Documents are re-read on every profile request.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    new_dir: PathBuf,
    old_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(data_dir: &Path) -> DocumentStore {
        DocumentStore {
            new_dir: data_dir.join(NEW_DOCUMENTS_DIR),
            old_dir: data_dir.join(OLD_DOCUMENTS_DIR),
        }
    }

    /// Both documents for a species. A missing file is absent; an
    /// unreadable or unparseable file is logged and treated as absent,
    /// so one bad document never poisons other species.
    pub fn load(&self, display_name: &str) -> (Option<NormalizedDoc>, Option<NormalizedDoc>) {
        let file = format!("{}.json", display_name);
        let current = read_json::<CurrentDoc>(&self.new_dir.join(&file))
            .map(|doc| normalize_current(doc, display_name));
        let legacy = read_json::<LegacyDoc>(&self.old_dir.join(&file)).map(normalize_legacy);
        (current, legacy)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable override document");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed override document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_current(json: &str) -> NormalizedDoc {
        let doc: CurrentDoc = serde_json::from_str(json).unwrap();
        normalize_current(doc, "test-species")
    }

    fn parse_legacy(json: &str) -> NormalizedDoc {
        let doc: LegacyDoc = serde_json::from_str(json).unwrap();
        normalize_legacy(doc)
    }

    #[test]
    fn current_schema_reduces_to_canonical_shape() {
        let doc = parse_current(
            r#"{
                "number": 25,
                "name": "Pikachu",
                "base_hp": 3,
                "strength": "2/4",
                "dexterity": "3/5",
                "vitality": "2/4",
                "special": "2/4",
                "insight": "2/4",
                "types": ["Electric"],
                "abilities": {"normal": ["Static"], "hidden": ["Lightning Rod"]},
                "height_m": 0.4,
                "weight_kg": 6.0,
                "moves": {
                    "bronze": ["Thunder Shock", "Growl"],
                    "Silver": ["Thunder Wave"],
                    "tm": ["Agility"],
                    "egg": ["Wish"]
                }
            }"#,
        );

        assert_eq!(doc.number, Some(25));
        assert_eq!(doc.strength.value(), Some(StatRange::new(2, 4)));
        let moves = doc.moves.unwrap();
        assert_eq!(moves.moves_at(Rank::Bronze), ["Thunder Shock", "Growl"]);
        assert_eq!(moves.moves_at(Rank::Silver), ["Thunder Wave"]);
        // "tm" and "egg" are not rank keys; they drop from the rank view.
        assert_eq!(moves.all_moves().len(), 3);
        let abilities = doc.abilities.unwrap();
        assert_eq!(abilities.normal, ["Static"]);
        assert_eq!(abilities.hidden, ["Lightning Rod"]);
    }

    #[test]
    fn current_schema_accepts_type_alias_and_flat_abilities() {
        let doc = parse_current(
            r#"{"type": ["Water", "Dark"], "abilities": ["Torrent"]}"#,
        );
        assert_eq!(doc.types, Some(vec!["Water".to_string(), "Dark".to_string()]));
        let abilities = doc.abilities.unwrap();
        assert_eq!(abilities.normal, ["Torrent"]);
        assert!(abilities.hidden.is_empty());
    }

    #[test]
    fn malformed_ratio_degrades_to_unknown() {
        let doc = parse_current(r#"{"strength": "strong", "dexterity": "3/6"}"#);
        assert_eq!(doc.strength, StatField::Unknown);
        assert_eq!(doc.strength.value(), None);
        assert_eq!(doc.dexterity.value(), Some(StatRange::new(3, 6)));
        assert_eq!(doc.vitality, StatField::Absent);
    }

    #[test]
    fn legacy_schema_reduces_to_canonical_shape() {
        let doc = parse_legacy(
            r#"{
                "Number": 211,
                "Name": "Qwilfish",
                "BaseHP": 4,
                "Strength": 2, "MaxStrength": 4,
                "Dexterity": 3, "MaxDexterity": 5,
                "Type1": "Water", "Type2": "Poison",
                "Ability1": "Poison Point", "Ability2": "Swift Swim",
                "HiddenAbility": "Intimidate",
                "Height": {"Meters": 0.5, "Feet": 1.6},
                "Weight": {"Kilograms": 3.9, "Pounds": 8.6},
                "Moves": [
                    {"Name": "Tackle", "Learned": "Starter"},
                    {"Name": "Toxic Spikes", "Learned": "Amateur"},
                    {"Name": "Destiny Bond", "Learned": "Champion"},
                    {"Name": "Aqua Tail", "Learned": "Egg Move"}
                ]
            }"#,
        );

        assert_eq!(doc.number, Some(211));
        assert_eq!(doc.strength.value(), Some(StatRange::new(2, 4)));
        assert_eq!(doc.vitality, StatField::Absent);
        assert_eq!(
            doc.types,
            Some(vec!["Water".to_string(), "Poison".to_string()])
        );
        let abilities = doc.abilities.as_ref().unwrap();
        assert_eq!(abilities.normal, ["Poison Point", "Swift Swim"]);
        assert_eq!(abilities.hidden, ["Intimidate"]);
        assert_eq!(doc.height_m, Some(0.5));
        assert_eq!(doc.weight_lb, Some(8.6));

        let moves = doc.moves.unwrap();
        assert_eq!(moves.moves_at(Rank::Bronze), ["Tackle", "Aqua Tail"]);
        assert_eq!(moves.moves_at(Rank::Silver), ["Toxic Spikes"]);
        assert_eq!(moves.moves_at(Rank::Diamond), ["Destiny Bond"]);
    }

    #[test]
    fn legacy_partial_stat_pair_fills_with_zero() {
        let doc = parse_legacy(r#"{"Strength": 2}"#);
        assert_eq!(doc.strength.value(), Some(StatRange::new(2, 0)));
        let doc = parse_legacy(r#"{"MaxInsight": 3}"#);
        assert_eq!(doc.insight.value(), Some(StatRange::new(0, 3)));
    }

    #[test]
    fn stat_field_precedence_keeps_unknown() {
        let current = StatField::Unknown;
        let legacy = StatField::Known(StatRange::new(1, 2));
        // A present-but-malformed current value still wins precedence.
        assert_eq!(current.or(legacy), StatField::Unknown);
        assert_eq!(StatField::Absent.or(legacy), legacy);
    }

    #[test]
    fn document_store_survives_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let new_dir = dir.path().join(NEW_DOCUMENTS_DIR);
        std::fs::create_dir_all(&new_dir).unwrap();
        std::fs::write(new_dir.join("Broken.json"), "{not json").unwrap();

        let store = DocumentStore::new(dir.path());
        let (current, legacy) = store.load("Broken");
        assert!(current.is_none());
        assert!(legacy.is_none());

        let (current, _) = store.load("Missing");
        assert!(current.is_none());
    }
}
