//! Fresh-name generation for compiler temporaries and result symbols

/// Default prefix for generated symbols
pub const DEFAULT_SYMBOL_PREFIX: &str = "V";

/// Monotonic generator of unique symbols (`V1`, `V2`, ...).
///
/// Passed explicitly through a compilation so independent runs produce the
/// same names. `reset` rewinds the counter between compilations.
#[derive(Debug, Clone)]
pub struct SymbolGenerator {
    prefix: String,
    next: u64,
}

impl SymbolGenerator {
    /// Create a generator with the default `V` prefix
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_SYMBOL_PREFIX)
    }

    /// Create a generator with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Produce the next symbol; numbering starts at 1
    pub fn fresh(&mut self) -> String {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }

    /// Number of symbols produced since the last reset
    pub fn issued(&self) -> u64 {
        self.next
    }

    /// Rewind the counter
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Prefix used for generated symbols
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for SymbolGenerator {
    fn default() -> Self {
        Self::new()
    }
}
