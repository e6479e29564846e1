//! # Blob Codec
//!
//! JSON (de)serialization over the key-value surface, packaging the
//! resilience contract: a read that fails for ANY reason (store error,
//! missing key, corrupt JSON) logs a warning and yields the type's
//! default. The register must keep selling with a torn blob; it must
//! never refuse to start over one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreResult;
use crate::KeyValueStore;

/// Reads and decodes the blob under `key`, degrading to
/// `T::default()` on any failure.
pub async fn read_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            warn!(key, error = %err, "Store read failed, using default");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "Stored blob is corrupt, using default");
            T::default()
        }
    }
}

/// Encodes `value` as JSON and writes it under `key`. Write failures
/// are surfaced: losing a completed sale silently is not acceptable.
pub async fn write_json<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

// =============================================================================
// Unit Tests
// =============================================================================
