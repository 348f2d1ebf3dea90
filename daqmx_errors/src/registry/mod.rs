//! NI-DAQmx status code registry
//!
//! Maps signed driver status codes to their category, required action and
//! description. The process-wide registry is built once from the generated
//! table and is read-only afterwards; concurrent readers need no locking.
//!
//! The declared table repeats some codes. Declaration order is preserved and
//! the later declaration of a code replaces the earlier one.

mod table;
pub mod types;

use crate::logging::codes;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

pub use table::declared_entries;
pub use types::{ActionRequired, Category, ErrorInfo, RawEntry};

static GLOBAL_REGISTRY: OnceLock<ErrorRegistry> = OnceLock::new();

/// Immutable code to metadata mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRegistry {
    entries: HashMap<i32, ErrorInfo>,
    declared: usize,
    duplicates: Vec<i32>,
}

impl ErrorRegistry {
    /// Build from declared rows; a repeated code keeps its last declaration
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut map = HashMap::new();
        let mut duplicates = BTreeSet::new();
        let mut declared = 0;

        for entry in entries {
            declared += 1;
            if map.insert(entry.code, entry.info()).is_some() {
                duplicates.insert(entry.code);
            }
        }

        Self {
            entries: map,
            declared,
            duplicates: duplicates.into_iter().collect(),
        }
    }

    /// Shared registry over the generated DAQmx table
    pub fn global() -> &'static ErrorRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let registry = Self::from_entries(declared_entries().iter().copied());

            if !registry.duplicates.is_empty() {
                let listed = registry
                    .duplicates
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                log_warning!(
                    codes::registry::DUPLICATE_CODE_OVERRIDDEN,
                    "Status table redeclares codes; later declarations win",
                    "codes" => listed
                );
            }
            log_success!(
                codes::success::REGISTRY_LOADED,
                "DAQmx status registry loaded",
                "entries" => registry.len(),
                "declared" => registry.declared_len()
            );

            registry
        })
    }

    pub fn get(&self, code: i32) -> Option<&ErrorInfo> {
        self.entries.get(&code)
    }

    pub fn contains(&self, code: i32) -> bool {
        self.entries.contains_key(&code)
    }

    /// Number of distinct codes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows the registry was built from, duplicates included
    pub fn declared_len(&self) -> usize {
        self.declared
    }

    /// Codes declared more than once, ascending
    pub fn duplicate_codes(&self) -> &[i32] {
        &self.duplicates
    }

    /// Distinct codes, ascending
    pub fn codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.entries.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Entries ordered by code
    pub fn iter(&self) -> impl Iterator<Item = (i32, &ErrorInfo)> + '_ {
        self.codes()
            .into_iter()
            .filter_map(move |code| self.entries.get(&code).map(|info| (code, info)))
    }

    pub fn by_category(&self, category: Category) -> Vec<(i32, &ErrorInfo)> {
        self.iter()
            .filter(|(_, info)| info.category == category)
            .collect()
    }

    pub fn by_action(&self, action: ActionRequired) -> Vec<(i32, &ErrorInfo)> {
        self.iter()
            .filter(|(_, info)| info.action_required == action)
            .collect()
    }
}

/// Look up a DAQmx status code in the shared registry
///
/// Unknown codes, including the success code `0`, return `None`.
pub fn lookup(code: i32) -> Option<&'static ErrorInfo> {
    ErrorRegistry::global().get(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn entry(code: i32, category: Category, description: &'static str) -> RawEntry {
        RawEntry {
            code,
            category,
            action_required: ActionRequired::ImmediateAction,
            description,
        }
    }

    #[test]
    fn test_last_declaration_wins() {
        let registry = ErrorRegistry::from_entries([
            entry(-10, Category::Configuration, "first"),
            entry(-20, Category::Hardware, "other"),
            entry(-10, Category::Other, "second"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.declared_len(), 3);
        assert_eq!(registry.duplicate_codes(), &[-10]);
        assert_matches!(
            registry.get(-10),
            Some(ErrorInfo { category: Category::Other, description: "second", .. })
        );
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let rows = [
            entry(5, Category::Software, "a"),
            entry(-5, Category::Software, "b"),
            entry(5, Category::Hardware, "c"),
        ];
        assert_eq!(
            ErrorRegistry::from_entries(rows),
            ErrorRegistry::from_entries(rows)
        );
    }

    #[test]
    fn test_iteration_is_code_ordered() {
        let registry = ErrorRegistry::from_entries([
            entry(3, Category::Other, "c"),
            entry(-7, Category::Other, "a"),
            entry(0, Category::Other, "b"),
        ]);
        let codes: Vec<i32> = registry.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![-7, 0, 3]);
        assert_eq!(registry.codes(), codes);
    }

    #[test]
    fn test_filters() {
        let registry = ErrorRegistry::from_entries([
            entry(-1, Category::Hardware, "a"),
            entry(-2, Category::Software, "b"),
            RawEntry {
                code: 4,
                category: Category::Hardware,
                action_required: ActionRequired::Warning,
                description: "c",
            },
        ]);
        assert_eq!(registry.by_category(Category::Hardware).len(), 2);
        assert_eq!(registry.by_action(ActionRequired::Warning).len(), 1);
        assert!(registry.by_category(Category::Communication).is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ErrorRegistry::from_entries(Vec::new());
        assert!(registry.is_empty());
        assert_eq!(registry.get(0), None);
        assert!(registry.duplicate_codes().is_empty());
    }

    #[test]
    fn test_global_lookup_returns_same_record() {
        let first = lookup(-200501).unwrap();
        let second = lookup(-200501).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(lookup(0), None);
        assert_eq!(lookup(1), None);
    }

    #[test]
    fn test_global_matches_declared_rows() {
        let registry = ErrorRegistry::global();
        assert_eq!(registry.declared_len(), declared_entries().len());

        let mut seen = std::collections::HashSet::new();
        let overridden = declared_entries()
            .iter()
            .filter(|e| !seen.insert(e.code))
            .count();
        assert_eq!(registry.declared_len() - registry.len(), overridden);
        assert!(registry.duplicate_codes().contains(&-200003));
    }
}
