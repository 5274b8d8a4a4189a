use std::sync::RwLock;

use ahash::AHashMap;
use apache_avro::{Schema, rabin::Rabin};

/// Size of a schema fingerprint in bytes.
pub const FINGERPRINT_SIZE: usize = 8;

/// The 64-bit Rabin fingerprint of `schema`'s parsing canonical form.
///
/// The library hands out the fingerprint as its little-endian bytes; the
/// returned value is the same number, so `fingerprint64(s).to_le_bytes()` is
/// what a single-object header carries.
pub fn fingerprint64(schema: &Schema) -> u64 {
    schema
        .fingerprint::<Rabin>()
        .bytes
        .iter()
        .take(FINGERPRINT_SIZE)
        .rev()
        .fold(0, |acc, b| (acc << 8) | u64::from(*b))
}

/// Looks up writer schemas by their 64-bit fingerprint.
///
/// Used by message decoders to resolve data written with a schema other than
/// the reader's own.
pub trait SchemaStore: Send + Sync {
    fn find_by_fingerprint(&self, fingerprint: u64) -> Option<Schema>;
}

/// An in-memory [`SchemaStore`] that can be shared between threads.
#[derive(Default)]
pub struct SchemaCache {
    schemas: RwLock<AHashMap<u64, Schema>>,
}

impl SchemaCache {
    pub fn new() -> SchemaCache {
        Default::default()
    }

    /// Adds a schema to the cache and returns its fingerprint. Adding the same
    /// schema twice is a no-op.
    pub fn add_schema(&self, schema: Schema) -> u64 {
        let fingerprint = fingerprint64(&schema);
        let mut schemas = self.schemas.write().unwrap_or_else(|e| e.into_inner());
        if schemas.insert(fingerprint, schema).is_none() {
            log::debug!("registered schema with fingerprint {fingerprint:#018x}");
        }
        fingerprint
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SchemaStore for SchemaCache {
    fn find_by_fingerprint(&self, fingerprint: u64) -> Option<Schema> {
        self.schemas
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&fingerprint)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_fingerprint_known_answer() {
        let schema = Schema::parse_str(r#""int""#).unwrap();
        assert_eq!(schema.canonical_form(), r#""int""#);
        assert_eq!(fingerprint64(&schema), 0x7275_d51a_3f39_5c8f);
    }

    #[test]
    fn test_fingerprint_matches_library_bytes() {
        let schema = Schema::parse_str(
            r#"{"type":"record","name":"Pair","fields":[{"name":"a","type":"long"}]}"#,
        )
        .unwrap();
        assert_eq!(
            fingerprint64(&schema).to_le_bytes()[..],
            schema.fingerprint::<Rabin>().bytes[..]
        );
    }

    #[test]
    fn test_cache() {
        let cache = SchemaCache::new();
        assert!(cache.is_empty());

        let int = Schema::parse_str(r#""int""#).unwrap();
        let fingerprint = cache.add_schema(int.clone());
        assert_eq!(cache.add_schema(int.clone()), fingerprint);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.find_by_fingerprint(fingerprint), Some(int));
        assert_eq!(cache.find_by_fingerprint(fingerprint ^ 1), None);
    }
}
