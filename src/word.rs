//! Per-word facade over the resolver and linguistic collaborators.

use std::fmt;

use crate::lang::{OffensiveClassifier, Pluralizer, SyllableCounter};
use crate::resolver::{LookupError, RelationKind, RelationResolver};

/// Shared lookup context: the relation resolver plus the three
/// caller-supplied linguistic collaborators.
pub struct WordInfo {
    resolver: RelationResolver,
    syllables: Box<dyn SyllableCounter>,
    pluralizer: Box<dyn Pluralizer>,
    offensive: Box<dyn OffensiveClassifier>,
}

impl WordInfo {
    pub fn new(
        resolver: RelationResolver,
        syllables: Box<dyn SyllableCounter>,
        pluralizer: Box<dyn Pluralizer>,
        offensive: Box<dyn OffensiveClassifier>,
    ) -> Self {
        Self {
            resolver,
            syllables,
            pluralizer,
            offensive,
        }
    }

    /// Wrap `text` as a word value. Any string is accepted verbatim,
    /// including empty or whitespace; callers are responsible for
    /// meaningful input.
    pub fn word(&self, text: impl Into<String>) -> Word<'_> {
        Word {
            text: text.into(),
            info: self,
        }
    }
}

/// A word plus the context needed to answer questions about it. Rhyme
/// lookups hand back fresh `Word` values borrowing the same context.
pub struct Word<'a> {
    text: String,
    info: &'a WordInfo,
}

impl<'a> Word<'a> {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Exact rhymes (service score 300), ascending.
    pub fn rhymes(&self) -> Result<Vec<Word<'a>>, LookupError> {
        self.relation(RelationKind::Rhymes)
    }

    /// Half-rhymes (service score below 300), ascending.
    pub fn half_rhymes(&self) -> Result<Vec<Word<'a>>, LookupError> {
        self.relation(RelationKind::HalfRhymes)
    }

    /// Portmanteau spellings, ascending.
    pub fn portmanteaus(&self) -> Result<Vec<Word<'a>>, LookupError> {
        self.relation(RelationKind::Portmanteaus)
    }

    fn relation(&self, kind: RelationKind) -> Result<Vec<Word<'a>>, LookupError> {
        let words = self.info.resolver.resolve(&self.text, kind)?;
        Ok(words
            .into_iter()
            .map(|text| Word {
                text,
                info: self.info,
            })
            .collect())
    }

    pub fn syllables(&self) -> u32 {
        self.info.syllables.count(&self.text)
    }

    pub fn plural(&self) -> String {
        self.info.pluralizer.pluralize(&self.text)
    }

    pub fn singular(&self) -> String {
        self.info.pluralizer.singularize(&self.text)
    }

    pub fn offensive(&self) -> bool {
        self.info.offensive.is_offensive(&self.text)
    }
}

impl fmt::Display for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Word").field(&self.text).finish()
    }
}
