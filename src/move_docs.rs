use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Hand-authored move stat sheet. These predate the schema split and
/// kept the capitalized key style throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDoc {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub type_name: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Target", default)]
    pub target: String,
    #[serde(rename = "Damage1", default)]
    pub damage: String,
    #[serde(rename = "Power", default)]
    pub power: u8,
    #[serde(rename = "Accuracy1", default)]
    pub accuracy: String,
    #[serde(rename = "Accuracy2", default)]
    pub accuracy2: String,
    #[serde(rename = "Effect", default)]
    pub effect: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// All move documents, keyed by lowercased display name. Loaded
/// wholesale at startup; a missing directory is an empty store.
#[derive(Debug, Clone, Default)]
pub struct MoveDocStore {
    docs: HashMap<String, MoveDoc>,
}

impl MoveDocStore {
    pub fn load(dir: &Path) -> MoveDocStore {
        let mut docs = HashMap::new();
        let Ok(entries) = fs::read_dir(dir) else {
            return MoveDocStore::default();
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable move document");
                    continue;
                }
            };
            match serde_json::from_str::<MoveDoc>(&content) {
                Ok(doc) => {
                    docs.insert(doc.name.to_lowercase(), doc);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed move document");
                }
            }
        }
        debug!(count = docs.len(), "move documents loaded");
        MoveDocStore { docs }
    }

    /// Case-insensitive lookup by display name.
    pub fn get(&self, name: &str) -> Option<&MoveDoc> {
        self.docs.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
