//! Key Layout
//!
//! Stored keys are `{app_space}:{key}` or `{app_space}:{namespace}:{key}`.
//! The layout is persisted with the data, so changing it orphans entries.

/// Separator between app space, namespace and key.
pub const SEPARATOR: char = ':';

/// Joins a namespace and a key the same way backends do.
pub fn namespaced(namespace: &str, key: &str) -> String {
    format!("{}{}{}", namespace, SEPARATOR, key)
}

// == Key Space ==
/// Key builder scoped to one application space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    app_space: String,
}

impl KeySpace {
    pub fn new(app_space: impl Into<String>) -> Self {
        Self {
            app_space: app_space.into(),
        }
    }

    pub fn app_space(&self) -> &str {
        &self.app_space
    }

    /// Stored key for `key`, optionally inside `namespace`.
    pub fn entry_key(&self, namespace: Option<&str>, key: &str) -> String {
        match namespace {
            Some(ns) => format!("{}{}", self.namespace_prefix(ns), key),
            None => format!("{}{}", self.prefix(), key),
        }
    }

    /// Prefix shared by every stored key of `namespace`.
    pub fn namespace_prefix(&self, namespace: &str) -> String {
        format!("{}{}{}", self.prefix(), namespace, SEPARATOR)
    }

    /// Prefix shared by every stored key of this app space.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.app_space, SEPARATOR)
    }

    /// Returns the caller-facing key if `stored` belongs to this app space.
    pub fn strip<'a>(&self, stored: &'a str) -> Option<&'a str> {
        stored
            .strip_prefix(self.app_space.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_without_namespace() {
        let keys = KeySpace::new("shop");
        assert_eq!(keys.entry_key(None, "cart"), "shop:cart");
    }

    #[test]
    fn test_entry_key_with_namespace_matches_namespaced_key() {
        let keys = KeySpace::new("shop");
        assert_eq!(keys.entry_key(Some("users"), "42"), "shop:users:42");
        assert_eq!(
            keys.entry_key(None, &namespaced("users", "42")),
            keys.entry_key(Some("users"), "42")
        );
    }

    #[test]
    fn test_namespace_prefix_does_not_match_sibling_namespace() {
        let keys = KeySpace::new("shop");
        let prefix = keys.namespace_prefix("user");
        assert!(keys.entry_key(Some("user"), "1").starts_with(&prefix));
        assert!(!keys.entry_key(Some("users"), "1").starts_with(&prefix));
    }

    #[test]
    fn test_strip_only_accepts_own_app_space() {
        let keys = KeySpace::new("a");
        assert_eq!(keys.strip("a:users:1"), Some("users:1"));
        assert_eq!(keys.strip("ab:users:1"), None);
        assert_eq!(keys.strip("b:users:1"), None);
    }
}
