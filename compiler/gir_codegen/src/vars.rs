//! Variable Name Allocation
//!
//! Each synthesized wrapper gets a fresh [`VarRegistry`]. Every local the
//! generator introduces goes through [`VarRegistry::alloc`], which guarantees
//! uniqueness within the wrapper by suffixing a counter on collision. Argument
//! positions are bound to names once with [`VarRegistry::register_param`] and
//! recovered later with [`VarRegistry::param`], so phases that run after the
//! parameter list is built (array length patching, return handles) use the
//! same spelling.

use rustc_hash::{FxHashMap, FxHashSet};

/// Host-language keywords and package identifiers a local must never shadow.
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
    "package", "range", "return", "select", "struct", "switch", "type", "var",
    // Packages referenced by generated code.
    "g", "gi", "log", "unsafe", "_I",
];

/// Per-wrapper identifier allocator.
#[derive(Debug)]
pub struct VarRegistry {
    taken: FxHashSet<String>,
    params: FxHashMap<usize, String>,
}

impl Default for VarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VarRegistry {
    pub fn new() -> Self {
        Self {
            taken: RESERVED.iter().map(|s| (*s).to_string()).collect(),
            params: FxHashMap::default(),
        }
    }

    /// Mint a name based on `hint` that is unique in this registry.
    ///
    /// The hint itself is used when free; otherwise `hint1`, `hint2`, ...
    pub fn alloc(&mut self, hint: &str) -> String {
        let base = sanitize(hint);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Allocate a name for argument `index` and remember it.
    ///
    /// Registering the same index twice returns the first name.
    pub fn register_param(&mut self, index: usize, hint: &str) -> String {
        if let Some(existing) = self.params.get(&index) {
            return existing.clone();
        }
        let name = self.alloc(hint);
        self.params.insert(index, name.clone());
        name
    }

    /// Name bound to argument `index`, if registered.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(&index).map(String::as_str)
    }
}

/// Metadata names are C identifiers; anything else is replaced so the result
/// is still a valid host identifier.
fn sanitize(hint: &str) -> String {
    let mut out: String = hint
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
