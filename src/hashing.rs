//! Hashing System - Deterministic Output
//!
//! Canonical-JSON SHA-256 hashes stamped on every artifact, so identical
//! inputs provably yield identical outputs.

use sha2::{Digest, Sha256};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    serde_json::to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), sort_value(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Compute the content hash of an assembled scaffold
pub fn compute_scaffold_hash<T: Serialize>(scaffold: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(scaffold)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Compute the job hash for a generation request.
/// job_hash = sha256(genre + engine + canonical_payload + generator_version)
pub fn compute_job_hash(
    genre: &str,
    engine: &str,
    payload: &impl Serialize,
    generator_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined = format!("{genre}:{engine}:{canonical_payload}:{generator_version}");
    Ok(sha256_hex(combined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"scaffold data";
        assert_eq!(sha256_hex(data), sha256_hex(data));
    }

    #[test]
    fn test_job_hash_stable_across_key_order() {
        let payload1 = json!({"characters": ["a", "b"], "environment": "arena"});
        let payload2 = json!({"environment": "arena", "characters": ["a", "b"]});
        let h1 = compute_job_hash("fighting", "sim", &payload1, "1.0.0").unwrap();
        let h2 = compute_job_hash("fighting", "sim", &payload2, "1.0.0").unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_job_hash_varies_with_engine() {
        let payload = json!({"characters": ["a"]});
        let h1 = compute_job_hash("fighting", "sim", &payload, "1.0.0").unwrap();
        let h2 = compute_job_hash("fighting", "bevy", &payload, "1.0.0").unwrap();
        assert_ne!(h1, h2);
    }
}
