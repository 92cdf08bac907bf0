//! Insertion-ordered variable map.

use std::collections::{HashMap, TryReserveError};

/// Variables in first-seen order with last-write-wins values.
///
/// Re-assigning a name replaces its value in place, so the printed order
/// reflects where a variable was first defined rather than where it was
/// last changed.
///
/// # Examples
///
/// ```
/// use environment_d::EnvMapping;
///
/// let mut env = EnvMapping::default();
/// env.upsert("A", "1");
/// env.upsert("B", "2");
/// assert_eq!(env.upsert("A", "3").as_deref(), Some("1"));
/// let pairs: Vec<_> = env.iter().collect();
/// assert_eq!(pairs, [("A", "3"), ("B", "2")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvMapping {
    /// Sets `name` to `value`, returning the value it replaced.
    pub fn upsert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = name.into();
        let new_value = value.into();
        if let Some(slot) = self
            .index
            .get(&key)
            .and_then(|&position| self.entries.get_mut(position))
        {
            return Some(std::mem::replace(&mut slot.1, new_value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, new_value));
        None
    }

    /// Like [`upsert`](Self::upsert), but reports allocation failure instead
    /// of aborting when a new name needs room.
    ///
    /// # Errors
    ///
    /// Returns the reservation failure; the mapping is left unchanged.
    pub fn try_upsert(&mut self, name: &str, value: &str) -> Result<Option<String>, TryReserveError> {
        if !self.index.contains_key(name) {
            self.entries.try_reserve(1)?;
            self.index.try_reserve(1)?;
        }
        Ok(self.upsert(name, value))
    }

    /// Current value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, value)| value.as_str())
    }

    /// Number of distinct names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been assigned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Names in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::default();
        for (name, value) in iter {
            env.upsert(name, value);
        }
        env
    }
}

impl<K, V> Extend<(K, V)> for EnvMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.upsert(name, value);
        }
    }
}
