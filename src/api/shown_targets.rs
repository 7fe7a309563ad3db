use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered set of legend targets currently toggled visible.
///
/// Each target remembers the content key that owns it, so a paired content
/// showing three subtypes still counts as one shown content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShownTargets {
    targets: IndexMap<String, String>,
}

impl ShownTargets {
    pub fn show(&mut self, target: &str, owner: &str) -> bool {
        self.targets
            .insert(target.to_owned(), owner.to_owned())
            .is_none()
    }

    pub fn hide(&mut self, target: &str) -> bool {
        self.targets.shift_remove(target).is_some()
    }

    /// Removes every target owned by `owner`.
    pub fn remove_owner(&mut self, owner: &str) -> usize {
        let before = self.targets.len();
        self.targets.retain(|_, current| current != owner);
        before - self.targets.len()
    }

    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of distinct contents with at least one shown target.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        let mut owners: Vec<&str> = self.targets.values().map(String::as_str).collect();
        owners.sort_unstable();
        owners.dedup();
        owners.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
