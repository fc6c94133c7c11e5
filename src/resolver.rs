//! Fetch-or-cache orchestration for word relations.
//!
//! A lookup reads the cache first; a trusted hit returns immediately. On a
//! miss (including a purged unreadable entry) the remote service is
//! queried once, results are filtered per relation kind, sorted, written
//! back in the canonical encoding, and returned.

use crate::cache::{CacheError, CacheValue, ResponseCache};
use crate::remote::{PortmanteauCandidate, RhymeCandidate, ServiceError, WordService};

/// Score the remote service assigns to exact rhymes. Lower scores are
/// half-rhymes; anything above lands in neither bucket.
const EXACT_RHYME_SCORE: u16 = 300;

/// Selects the cache namespace and remote query for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Rhymes,
    HalfRhymes,
    Portmanteaus,
}

impl RelationKind {
    /// Cache key: the word verbatim plus a relation suffix. The suffixes
    /// match the scheme earlier releases wrote, so existing caches stay
    /// addressable.
    pub fn cache_key(&self, word: &str) -> String {
        match self {
            RelationKind::Rhymes => format!("{word}.rhymes"),
            RelationKind::HalfRhymes => format!("{word}.halfRhymes"),
            RelationKind::Portmanteaus => format!("{word}.portmanteaus"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

pub struct RelationResolver {
    cache: ResponseCache,
    service: Box<dyn WordService>,
}

impl RelationResolver {
    pub fn new(cache: ResponseCache, service: Box<dyn WordService>) -> Self {
        Self { cache, service }
    }

    /// Resolve `kind` for `word`, ascending lexicographic. An empty result
    /// is a valid answer and is cached like any other; a failed fetch
    /// propagates and caches nothing.
    pub fn resolve(&self, word: &str, kind: RelationKind) -> Result<Vec<String>, LookupError> {
        let key = kind.cache_key(word);
        if let Some(words) = self.cached(&key)? {
            tracing::debug!(key = %key, count = words.len(), "cache hit");
            return Ok(words);
        }

        tracing::debug!(key = %key, "cache miss, querying service");
        let mut words = match kind {
            RelationKind::Rhymes => filter_rhymes(self.service.rhymes(word)?, false),
            RelationKind::HalfRhymes => filter_rhymes(self.service.rhymes(word)?, true),
            RelationKind::Portmanteaus => flatten_portmanteaus(self.service.portmanteaus(word)?),
        };
        words.sort();
        self.cache.set(&key, &words)?;
        Ok(words)
    }

    /// Cache read path. A canonical entry (possibly empty) is a trusted
    /// hit; a fully-hydrated legacy entry is a trusted hit; anything else
    /// is deleted and treated as a miss.
    fn cached(&self, key: &str) -> Result<Option<Vec<String>>, LookupError> {
        match self.cache.get(key)? {
            None => Ok(None),
            Some(CacheValue::Words(words)) => Ok(Some(words)),
            Some(CacheValue::Legacy(records)) => {
                Ok(Some(records.into_iter().map(|r| r.text).collect()))
            }
            Some(CacheValue::Invalid) => {
                tracing::debug!(key = %key, "purging unreadable cache entry");
                self.cache.delete(key)?;
                Ok(None)
            }
        }
    }
}

/// Keep exact rhymes (score exactly 300) or half-rhymes (score below 300).
fn filter_rhymes(candidates: Vec<RhymeCandidate>, half: bool) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|c| {
            if half {
                c.score < EXACT_RHYME_SCORE
            } else {
                c.score == EXACT_RHYME_SCORE
            }
        })
        .map(|c| c.word)
        .collect()
}

/// Split each candidate's comma-joined alternatives into independent
/// strings, trimming whitespace and dropping empty pieces.
fn flatten_portmanteaus(candidates: Vec<PortmanteauCandidate>) -> Vec<String> {
    let mut words = Vec::new();
    for candidate in candidates {
        for piece in candidate.combined.split(',') {
            let piece = piece.trim();
            if !piece.is_empty() {
                words.push(piece.to_string());
            }
        }
    }
    words
}
