//! Run Policy
//!
//! Read-only inputs that shape generation without changing its rules: the
//! block list of qualified identifiers to skip, and the symbol rename table
//! that overrides final display names.

use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct Policy {
    blocked: FxHashSet<String>,
    symbol_names: FxHashMap<String, String>,
}

impl Policy {
    pub fn new<B, R>(blocked: B, symbol_names: R) -> Self
    where
        B: IntoIterator<Item = String>,
        R: IntoIterator<Item = (String, String)>,
    {
        Self {
            blocked: blocked.into_iter().collect(),
            symbol_names: symbol_names.into_iter().collect(),
        }
    }

    /// Whether `qualified` (`Container.name` or a bare name) is blocked.
    pub fn is_blocked(&self, qualified: &str) -> bool {
        self.blocked.contains(qualified)
    }

    /// Display-name override for a linkage symbol.
    pub fn rename(&self, symbol: &str) -> Option<&str> {
        self.symbol_names
            .get(symbol)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_and_rename_lookups() {
        let policy = Policy::new(
            ["Foo.bar".to_string()],
            [
                ("g_object_ref".to_string(), "Ref0".to_string()),
                ("g_object_unref".to_string(), String::new()),
            ],
        );
        assert!(policy.is_blocked("Foo.bar"));
        assert!(!policy.is_blocked("bar"));
        assert_eq!(policy.rename("g_object_ref"), Some("Ref0"));
        assert_eq!(policy.rename("g_object_unref"), None);
        assert_eq!(policy.rename("g_free"), None);
    }
}
