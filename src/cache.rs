//! Durable cache for remote word-relation lookups.
//!
//! One file per `(word, relation)` key under a configurable directory.
//! Entries carry a `WDRC` magic and a version byte; version 2 is the
//! canonical encoding (a bincode `Vec<String>`), version 1 is a legacy
//! encoding kept readable for caches written by early releases.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const MAGIC: &[u8; 4] = b"WDRC";
/// Legacy encoding: one serialized facade record per candidate.
const VERSION_LEGACY: u8 = 1;
/// Canonical encoding: plain candidate strings.
const VERSION: u8 = 2;

/// Type path accepted when hydrating version-1 records. Records written
/// under any other path (pre-rename builds) do not hydrate.
pub(crate) const WORD_TYPE_PATH: &str = "word_info::Word";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Io(#[from] io::Error),

    #[error("cache encoding failed: {0}")]
    Encode(bincode::Error),
}

/// Version-1 body element. Early releases serialized one record per
/// candidate, tagged with the type path the writer was compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub type_path: String,
    pub text: String,
}

impl LegacyRecord {
    /// A record hydrates only when its recorded type path matches the one
    /// this crate currently uses.
    pub fn hydrates(&self) -> bool {
        self.type_path == WORD_TYPE_PATH
    }
}

/// Decoded shape of a stored entry.
///
/// `Invalid` covers everything that is neither the canonical shape nor a
/// fully-hydrated legacy entry: bad magic, unknown version, undecodable
/// body, or a legacy body with at least one unhydratable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    Words(Vec<String>),
    Legacy(Vec<LegacyRecord>),
    Invalid,
}

/// Classify raw entry bytes. The canonical shape is tested before the
/// legacy shape so an empty candidate list always reads as canonical.
fn classify(bytes: &[u8]) -> CacheValue {
    if bytes.len() < 5 || &bytes[0..4] != MAGIC {
        return CacheValue::Invalid;
    }
    match bytes[4] {
        VERSION => match bincode::deserialize::<Vec<String>>(&bytes[5..]) {
            Ok(words) => CacheValue::Words(words),
            Err(_) => CacheValue::Invalid,
        },
        VERSION_LEGACY => match bincode::deserialize::<Vec<LegacyRecord>>(&bytes[5..]) {
            Ok(records) if records.iter().all(LegacyRecord::hydrates) => {
                CacheValue::Legacy(records)
            }
            _ => CacheValue::Invalid,
        },
        _ => CacheValue::Invalid,
    }
}

/// File-per-key store for relation results.
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Entry filename: hex SHA-256 of the key. Keys are arbitrary strings
    /// (words are never normalized), so they cannot name files directly.
    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.wdrc", hex::encode(digest)))
    }

    /// Read and classify the entry under `key`. `Ok(None)` means no entry.
    pub fn get(&self, key: &str) -> Result<Option<CacheValue>, CacheError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(classify(&bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    /// Store `words` under `key` in the canonical encoding, overwriting
    /// any prior entry. Atomic write: tmp file then rename.
    pub fn set(&self, key: &str, words: &[String]) -> Result<(), CacheError> {
        let body = bincode::serialize(words).map_err(CacheError::Encode)?;
        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);

        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp, &buf)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Remove the entry under `key`. Idempotent.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    /// Write raw entry bytes, bypassing the canonical encoder.
    #[cfg(test)]
    pub(crate) fn write_raw(&self, key: &str, bytes: &[u8]) {
        fs::create_dir_all(&self.dir).unwrap();
        fs::write(self.entry_path(key), bytes).unwrap();
    }

    #[cfg(test)]
    pub(crate) fn has_entry(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }
}

/// Encode a version-1 body the way early releases wrote it.
#[cfg(test)]
pub(crate) fn encode_legacy(records: &[LegacyRecord]) -> Vec<u8> {
    let body = bincode::serialize(records).unwrap();
    let mut buf = Vec::with_capacity(5 + body.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_LEGACY);
    buf.extend_from_slice(&body);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache() -> (TempDir, ResponseCache) {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path());
        (dir, cache)
    }

    fn legacy(type_path: &str, text: &str) -> LegacyRecord {
        LegacyRecord {
            type_path: type_path.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_set_get_roundtrip_preserves_order() {
        let (_dir, cache) = cache();
        let words = vec!["hat".to_string(), "bat".to_string(), "bat".to_string()];
        cache.set("cat.rhymes", &words).unwrap();

        // Stored order comes back verbatim, duplicates included.
        let value = cache.get("cat.rhymes").unwrap().unwrap();
        assert_eq!(value, CacheValue::Words(words));
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, cache) = cache();
        assert!(cache.get("cat.rhymes").unwrap().is_none());
    }

    #[test]
    fn test_empty_list_is_canonical() {
        let (_dir, cache) = cache();
        cache.set("cat.rhymes", &[]).unwrap();
        let value = cache.get("cat.rhymes").unwrap().unwrap();
        assert_eq!(value, CacheValue::Words(vec![]));
    }

    #[test]
    fn test_legacy_fully_hydrated() {
        let (_dir, cache) = cache();
        let records = vec![legacy(WORD_TYPE_PATH, "bat"), legacy(WORD_TYPE_PATH, "hat")];
        cache.write_raw("cat.rhymes", &encode_legacy(&records));

        let value = cache.get("cat.rhymes").unwrap().unwrap();
        assert_eq!(value, CacheValue::Legacy(records));
    }

    #[test]
    fn test_legacy_with_foreign_type_path_is_invalid() {
        let (_dir, cache) = cache();
        let records = vec![
            legacy(WORD_TYPE_PATH, "bat"),
            legacy("wordinfo::word::Word", "hat"),
        ];
        cache.write_raw("cat.rhymes", &encode_legacy(&records));

        // One unhydratable record poisons the whole entry.
        let value = cache.get("cat.rhymes").unwrap().unwrap();
        assert_eq!(value, CacheValue::Invalid);
    }

    #[test]
    fn test_bad_magic_is_invalid() {
        let (_dir, cache) = cache();
        cache.write_raw("cat.rhymes", b"XXXX\x02whatever");
        assert_eq!(
            cache.get("cat.rhymes").unwrap().unwrap(),
            CacheValue::Invalid
        );
    }

    #[test]
    fn test_short_file_is_invalid() {
        let (_dir, cache) = cache();
        cache.write_raw("cat.rhymes", b"WD");
        assert_eq!(
            cache.get("cat.rhymes").unwrap().unwrap(),
            CacheValue::Invalid
        );
    }

    #[test]
    fn test_unknown_version_is_invalid() {
        let (_dir, cache) = cache();
        cache.write_raw("cat.rhymes", b"WDRC\x09\x00");
        assert_eq!(
            cache.get("cat.rhymes").unwrap().unwrap(),
            CacheValue::Invalid
        );
    }

    #[test]
    fn test_undecodable_body_is_invalid() {
        let (_dir, cache) = cache();
        let mut bytes = b"WDRC\x02".to_vec();
        bytes.extend_from_slice(&[0xFF; 9]);
        cache.write_raw("cat.rhymes", &bytes);
        assert_eq!(
            cache.get("cat.rhymes").unwrap().unwrap(),
            CacheValue::Invalid
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, cache) = cache();
        cache.set("cat.rhymes", &["bat".to_string()]).unwrap();
        cache.delete("cat.rhymes").unwrap();
        cache.delete("cat.rhymes").unwrap();
        assert!(cache.get("cat.rhymes").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites_legacy_entry() {
        let (_dir, cache) = cache();
        cache.write_raw(
            "cat.rhymes",
            &encode_legacy(&[legacy(WORD_TYPE_PATH, "bat")]),
        );

        cache.set("cat.rhymes", &["splat".to_string()]).unwrap();
        let value = cache.get("cat.rhymes").unwrap().unwrap();
        assert_eq!(value, CacheValue::Words(vec!["splat".to_string()]));
    }

    #[test]
    fn test_keys_do_not_collide() {
        let (_dir, cache) = cache();
        cache.set("cat.rhymes", &["bat".to_string()]).unwrap();
        cache.set("cat.halfRhymes", &["bad".to_string()]).unwrap();

        assert_eq!(
            cache.get("cat.rhymes").unwrap().unwrap(),
            CacheValue::Words(vec!["bat".to_string()])
        );
        assert_eq!(
            cache.get("cat.halfRhymes").unwrap().unwrap(),
            CacheValue::Words(vec!["bad".to_string()])
        );
    }

    #[test]
    fn test_unusual_keys_are_storable() {
        let (_dir, cache) = cache();
        // Words are taken verbatim; slashes and whitespace must not leak
        // into the filesystem layout.
        for key in ["../up.rhymes", "  Cat .rhymes", ".rhymes"] {
            cache.set(key, &["x".to_string()]).unwrap();
            assert_eq!(
                cache.get(key).unwrap().unwrap(),
                CacheValue::Words(vec!["x".to_string()])
            );
        }
    }
}
