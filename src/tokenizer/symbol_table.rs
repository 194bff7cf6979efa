use std::collections::HashMap;

use crate::tokenizer::word_tokenizer::word_tokenizer;

/// Symbols are allocated upwards from the start of the private use area. The
/// range up to `char::MAX` contains no surrogates, so every index below
/// `SYMBOL_CAPACITY` maps to a valid `char`.
const FIRST_SYMBOL: u32 = 0xE000;
const SYMBOL_CAPACITY: usize = (char::MAX as u32 - FIRST_SYMBOL + 1) as usize;

/// Slots kept free for the overflow tokens of the two texts of a diff call.
const OVERFLOW_RESERVE: usize = 2;

/// One-to-one mapping between distinct tokens and single-character symbols.
///
/// Encoding a text turns every word or whitespace run into one `char`, so that
/// a character-level diff of the encoded strings is a word-level diff of the
/// original texts. A table is meant to be shared by the two sides of one diff
/// and thrown away afterwards.
///
/// When the alphabet runs out, the rest of the text being encoded becomes a
/// single final token. The diff gets coarser but `decode` stays the exact
/// inverse of `encode`.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    tokens: Vec<String>,
    symbols: HashMap<String, char>,
    capacity: usize,
}

impl Default for SymbolTable {
    fn default() -> Self { Self::with_capacity(SYMBOL_CAPACITY) }
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn with_capacity(capacity: usize) -> Self {
        debug_assert!(
            capacity > OVERFLOW_RESERVE && capacity <= SYMBOL_CAPACITY,
            "Symbol capacity {capacity} is out of range"
        );

        Self {
            tokens: Vec::new(),
            symbols: HashMap::new(),
            capacity,
        }
    }

    /// Number of distinct tokens seen so far.
    #[must_use]
    pub fn len(&self) -> usize { self.tokens.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    /// Returns the token text a symbol stands for.
    #[must_use]
    pub fn token(&self, symbol: char) -> Option<&str> {
        let index = (symbol as u32).checked_sub(FIRST_SYMBOL)?;
        self.tokens.get(index as usize).map(String::as_str)
    }

    /// Encodes `text` into a string holding one symbol per token. Unseen
    /// tokens are assigned the next symbol in allocation order.
    pub fn encode(&mut self, text: &str) -> String {
        let mut encoded = String::new();
        let mut consumed = 0;

        for token in word_tokenizer(text) {
            let symbol = match self.symbols.get(token) {
                Some(symbol) => *symbol,
                None if self.tokens.len() + OVERFLOW_RESERVE < self.capacity => {
                    self.allocate(token)
                }
                None => {
                    encoded.push(self.lookup_or_allocate(&text[consumed..]));
                    return encoded;
                }
            };

            encoded.push(symbol);
            consumed += token.len();
        }

        encoded
    }

    /// Exact inverse of `encode`: concatenates the tokens behind each symbol.
    /// Characters that aren't symbols of this table are copied as-is.
    #[must_use]
    pub fn decode(&self, symbols: &str) -> String {
        let mut decoded = String::with_capacity(symbols.len());
        for symbol in symbols.chars() {
            match self.token(symbol) {
                Some(token) => decoded.push_str(token),
                None => decoded.push(symbol),
            }
        }

        decoded
    }

    fn lookup_or_allocate(&mut self, token: &str) -> char {
        match self.symbols.get(token) {
            Some(symbol) => *symbol,
            None => self.allocate(token),
        }
    }

    fn allocate(&mut self, token: &str) -> char {
        // Saturates on the last symbol if more than `OVERFLOW_RESERVE` texts
        // overflow the same table, which `word_diff` never does.
        let index = self.tokens.len().min(self.capacity - 1);
        let symbol = u32::try_from(index)
            .ok()
            .and_then(|index| char::from_u32(FIRST_SYMBOL + index))
            .unwrap_or(char::MAX);

        if index < self.tokens.len() {
            return symbol;
        }

        self.tokens.push(token.to_owned());
        self.symbols.insert(token.to_owned(), symbol);

        symbol
    }
}

/// Encodes a single text with a fresh table.
#[must_use]
pub fn encode(text: &str) -> (String, SymbolTable) {
    let mut table = SymbolTable::new();
    let symbols = table.encode(text);

    (symbols, table)
}
