use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::store::DocumentVector;

/// Full engine state in the portable snapshot layout.
///
/// The field names are the on-disk contract; a snapshot written here loads
/// anywhere else the format is understood. All four fields are required, so
/// a truncated or hand-edited file fails deserialization outright rather
/// than restoring partial state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "textDict")]
    pub text_dict: HashMap<String, u64>,
    #[serde(rename = "docDict")]
    pub doc_dict: HashMap<String, DocumentVector>,
    #[serde(rename = "idfDict")]
    pub idf_dict: HashMap<String, f64>,
    #[serde(rename = "isCollectionFromJson")]
    pub is_collection_from_json: bool,
}

/// Writes the engine's snapshot as JSON at `path`.
pub fn save_snapshot<P: AsRef<Path>>(path: P, engine: &Engine) -> Result<(), EngineError> {
    fs::write(path, engine.export_json()?)?;
    Ok(())
}

/// Loads a snapshot from `path`, fully replacing any in-memory state the
/// caller held.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Engine, EngineError> {
    let json = fs::read_to_string(path)?;
    Engine::import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted_engine() -> Engine {
        let mut engine = Engine::default();
        engine.ingest_document("a.txt", "cat cat dog", None).unwrap();
        engine.ingest_document("b.txt", "dog fish", None).unwrap();
        engine.compute_weights().unwrap();
        engine
    }

    #[test]
    fn snapshot_uses_the_contract_field_names() {
        let engine = weighted_engine();
        let value: serde_json::Value = serde_json::from_str(&engine.export_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        for field in ["textDict", "docDict", "idfDict", "isCollectionFromJson"] {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn missing_field_fails_without_partial_state() {
        let err = Engine::import_json(r#"{"textDict": {}, "docDict": {}}"#);
        assert!(matches!(err, Err(EngineError::Deserialization(_))));
    }

    #[test]
    fn import_infers_the_weighting_state() {
        let weighted = Engine::import_json(&weighted_engine().export_json().unwrap()).unwrap();
        assert!(weighted.is_weighted());

        let mut raw = Engine::default();
        raw.ingest_document("a.txt", "cat", None).unwrap();
        let restored = Engine::import_json(&raw.export_json().unwrap()).unwrap();
        assert!(!restored.is_weighted());
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let engine = weighted_engine();
        save_snapshot(&path, &engine).unwrap();

        let restored = load_snapshot(&path).unwrap();
        assert_eq!(restored.doc_count(), 2);
        assert_eq!(
            restored.process_query("cat").unwrap(),
            engine.process_query("cat").unwrap()
        );
    }
}
