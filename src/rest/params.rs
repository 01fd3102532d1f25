//! Request parameters.
//!
//! Two sources feed a handler:
//!
//! - [`RestVerbs`]: values captured from the placeholders of the matched
//!   template (`/users/read/{user}/info` → `user`).
//! - [`Parameters`]: query-string and form-body values supplied by the
//!   transport.
//!
//! [`ParameterView`] merges both into one read-only lookup. Path values win:
//! a placeholder identifies the target of a command, so a query parameter of
//! the same name must not be able to redirect it.

use std::collections::HashMap;

/// Values captured from template placeholders.
///
/// Keys are unique because template placeholder names are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestVerbs {
    values: Vec<(String, String)>,
}

impl RestVerbs {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Gets a captured value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Captured values in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Query and body parameters supplied by the transport.
///
/// One value per key; keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: HashMap<String, String>,
}

impl Parameters {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Inserts a value only when the key is not present yet.
    ///
    /// Used by the transport so the first occurrence of a repeated key wins.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Gets a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the key was supplied.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All parameters in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert_if_absent(k, v);
        }
        params
    }
}

/// Merged, read-only view over path and query/body parameters.
///
/// Lookup order is path values first, then query/body values. The view never
/// fails; a name missing from both sources is simply absent.
#[derive(Debug, Clone, Copy)]
pub struct ParameterView<'a> {
    verbs: &'a RestVerbs,
    params: &'a Parameters,
}

impl<'a> ParameterView<'a> {
    /// Creates a view over both sources.
    pub fn new(verbs: &'a RestVerbs, params: &'a Parameters) -> Self {
        Self { verbs, params }
    }

    /// Looks up a value by name, path values first.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.verbs.get(name).or_else(|| self.params.get(name))
    }

    /// Whether the name is present in either source.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The path-parameter source.
    pub fn verbs(&self) -> &'a RestVerbs {
        self.verbs
    }

    /// The query/body source.
    pub fn query(&self) -> &'a Parameters {
        self.params
    }
}
