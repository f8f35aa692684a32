// Content fingerprint of ranking inputs, used as the computation cache key

use crate::models::{CostRecord, WeightConfig};
use sha2::{Digest, Sha256};

/// Hex SHA-256 over the JSON form of the records followed by the weights
pub fn fingerprint(records: &[CostRecord], weights: &WeightConfig) -> String {
    let mut hasher = Sha256::new();
    // Serializing plain structs of strings and floats cannot fail
    if let Ok(bytes) = serde_json::to_vec(records) {
        hasher.update(&bytes);
    }
    hasher.update(b"|");
    if let Ok(bytes) = serde_json::to_vec(weights) {
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}
