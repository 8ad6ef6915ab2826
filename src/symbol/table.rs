use crate::lexer::Keyword;
use log::warn;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// What a spelling resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    Identifier(Rc<str>),
    Keyword(Keyword),
}

/// Interning table for identifier spellings.
///
/// Lives as long as one scan session. It only guarantees that repeated
/// spellings share a single entry; it knows nothing about scopes or bindings.
#[derive(Debug)]
pub struct SymbolTable {
    words: FxHashMap<Rc<str>, Word>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table seeded with the reserved words
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            words: FxHashMap::default(),
        };
        table.reserve_keywords();
        table
    }

    fn reserve_keywords(&mut self) {
        for keyword in Keyword::ALL {
            self.reserve(keyword);
        }
    }

    /// Register a reserved word
    pub fn reserve(&mut self, keyword: Keyword) {
        let spelling: Rc<str> = Rc::from(keyword.as_str());
        if self.words.insert(spelling, Word::Keyword(keyword)).is_some() {
            warn!("duplicated reserved word \"{keyword}\"");
        }
    }

    /// Look up `spelling`, inserting it as a fresh identifier on first sight
    pub fn intern(&mut self, spelling: &str) -> Word {
        if let Some(word) = self.words.get(spelling) {
            return word.clone();
        }

        let name: Rc<str> = Rc::from(spelling);
        let word = Word::Identifier(Rc::clone(&name));
        self.words.insert(name, word.clone());
        word
    }

    /// Drop every identifier and reseed the reserved words
    pub fn clear(&mut self) {
        self.words.clear();
        self.reserve_keywords();
    }

    #[must_use]
    pub fn contains(&self, spelling: &str) -> bool {
        self.words.contains_key(spelling)
    }

    /// Number of entries, reserved words included
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
