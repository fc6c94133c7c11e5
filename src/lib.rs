//! Word lookups with a durable response cache.
//!
//! Rhymes, half-rhymes, and portmanteaus come from a remote word-play
//! service and are cached on disk between runs; syllable counts, plural
//! forms, and offensiveness checks are delegated to caller-supplied
//! collaborators. `WordInfo` is the entry point.

pub mod cache;
pub mod lang;
pub mod remote;
pub mod resolver;
pub mod settings;
pub mod trace_init;
pub mod word;

pub use word::{Word, WordInfo};
