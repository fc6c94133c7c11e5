//! Remote word-play service boundary.
//!
//! The resolver treats the service as a function from `(operation, word)`
//! to parsed candidate records; transport and endpoint details stay behind
//! the `WordService` trait. `RhymeBrainClient` is the default blocking
//! implementation over the RhymeBrain `talk` endpoint.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One scored rhyme candidate. The payload carries more fields
/// (frequency, flags, syllables); only these two matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct RhymeCandidate {
    pub word: String,
    pub score: u16,
}

/// One portmanteau candidate; `combined` holds comma-separated
/// alternative spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct PortmanteauCandidate {
    pub combined: String,
}

/// A word-play query backend.
pub trait WordService: Send + Sync {
    fn rhymes(&self, word: &str) -> Result<Vec<RhymeCandidate>, ServiceError>;
    fn portmanteaus(&self, word: &str) -> Result<Vec<PortmanteauCandidate>, ServiceError>;
}

/// Blocking client for the RhymeBrain `talk` endpoint.
pub struct RhymeBrainClient {
    base_url: String,
}

impl RhymeBrainClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn talk(&self, function: &str, word: &str) -> Result<String, ServiceError> {
        ureq::get(&self.base_url)
            .query("function", function)
            .query("word", word)
            .call()
            .map_err(|e| ServiceError::Http(format!("{function} {word:?}: {e}")))?
            .into_body()
            .read_to_string()
            .map_err(|e| ServiceError::Http(format!("{function} {word:?}: {e}")))
    }
}

impl WordService for RhymeBrainClient {
    fn rhymes(&self, word: &str) -> Result<Vec<RhymeCandidate>, ServiceError> {
        let body = self.talk("getRhymes", word)?;
        parse_rhymes(&body)
    }

    fn portmanteaus(&self, word: &str) -> Result<Vec<PortmanteauCandidate>, ServiceError> {
        let body = self.talk("getPortmanteaus", word)?;
        parse_portmanteaus(&body)
    }
}

fn parse_rhymes(json: &str) -> Result<Vec<RhymeCandidate>, ServiceError> {
    serde_json::from_str(json).map_err(|e| ServiceError::Parse(format!("getRhymes JSON: {e}")))
}

fn parse_portmanteaus(json: &str) -> Result<Vec<PortmanteauCandidate>, ServiceError> {
    serde_json::from_str(json)
        .map_err(|e| ServiceError::Parse(format!("getPortmanteaus JSON: {e}")))
}
