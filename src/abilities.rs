use crate::names::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Hand-authored ability document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDoc {
    pub name: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub description: String,
}

/// All ability documents, keyed by the normalized file stem. Loaded
/// wholesale at startup; a missing directory is an empty store.
#[derive(Debug, Clone, Default)]
pub struct AbilityStore {
    docs: HashMap<String, AbilityDoc>,
}

impl AbilityStore {
    pub fn load(dir: &Path) -> AbilityStore {
        let mut docs = HashMap::new();
        let Ok(entries) = fs::read_dir(dir) else {
            return AbilityStore::default();
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable ability document");
                    continue;
                }
            };
            match serde_json::from_str::<AbilityDoc>(&content) {
                Ok(doc) => {
                    docs.insert(normalize(stem), doc);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed ability document");
                }
            }
        }
        debug!(count = docs.len(), "ability documents loaded");
        AbilityStore { docs }
    }

    pub fn get(&self, name: &str) -> Option<&AbilityDoc> {
        self.docs.get(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
