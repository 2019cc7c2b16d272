//! Name-keyed upsert resolution
//!
//! Converts children that reference a parent by natural key into:
//! 1. the minimal set of parents that must be created, and
//! 2. a total key -> identifier binding used to stamp every child.
//!
//! ## Flow
//!
//! ```text
//! distinct_keys(children)          validate keys, feed the lookup
//! resolve(children, existing)      -> parents_to_create
//! bind_identifiers(created, ids)   merge store-assigned ids
//! finalize(children)               stamp parent ids, or UnresolvedKey
//! ```
//!
//! The resolver performs no I/O. Its state lives for one invocation.

use std::collections::{HashMap, HashSet};

use crate::error::{LinkError, LinkResult};

/// A parent identified by natural key, with an identifier once persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef<Id> {
    /// Natural key (case-sensitive)
    pub key: String,
    /// Store-assigned identifier, `None` until persisted
    pub id: Option<Id>,
}

impl<Id> ParentRef<Id> {
    /// A parent that does not exist yet
    pub fn pending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: None,
        }
    }

    /// A parent already known to the store
    pub fn existing(key: impl Into<String>, id: Id) -> Self {
        Self {
            key: key.into(),
            id: Some(id),
        }
    }
}

/// A record that references its parent by natural key
pub trait KeyedChild<Id> {
    /// Natural key of the parent this record belongs to
    fn parent_key(&self) -> &str;

    /// Stamp the resolved parent identifier
    fn assign_parent(&mut self, id: Id);
}

/// Distinct child keys in first-occurrence order.
///
/// Fails with `InvalidKey` on the first empty or whitespace-only key, so
/// callers can validate before consulting the store.
pub fn distinct_keys<Id, C: KeyedChild<Id>>(children: &[C]) -> LinkResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for (index, child) in children.iter().enumerate() {
        let key = child.parent_key();
        if key.trim().is_empty() {
            return Err(LinkError::InvalidKey { index });
        }
        if seen.insert(key) {
            keys.push(key.to_string());
        }
    }

    Ok(keys)
}

/// Resolves natural keys to parent identifiers for one linking pass
#[derive(Debug)]
pub struct NameKeyedUpsertResolver<Id> {
    binding: HashMap<String, Id>,
}

impl<Id> Default for NameKeyedUpsertResolver<Id> {
    fn default() -> Self {
        Self {
            binding: HashMap::new(),
        }
    }
}

impl<Id: Clone> NameKeyedUpsertResolver<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the parents that must be created for `children`.
    ///
    /// The binding is rebuilt from `existing` on every call. Duplicate keys in
    /// `existing` are last-write-wins; entries without an id are skipped.
    /// The returned list holds one pending parent per missing key, in the
    /// order the key first appears among `children`.
    pub fn resolve<C, I>(&mut self, children: &[C], existing: I) -> LinkResult<Vec<ParentRef<Id>>>
    where
        C: KeyedChild<Id>,
        I: IntoIterator<Item = ParentRef<Id>>,
    {
        let keys = distinct_keys::<Id, C>(children)?;

        self.binding.clear();
        for parent in existing {
            if let Some(id) = parent.id {
                self.binding.insert(parent.key, id);
            }
        }

        Ok(keys
            .into_iter()
            .filter(|key| !self.binding.contains_key(key))
            .map(ParentRef::pending)
            .collect())
    }

    /// Merge store-assigned identifiers for the parents created after `resolve`.
    ///
    /// `ids` must line up one-to-one with `created`; on a count mismatch
    /// nothing is merged.
    pub fn bind_identifiers(&mut self, created: &[ParentRef<Id>], ids: Vec<Id>) -> LinkResult<()> {
        if created.len() != ids.len() {
            return Err(LinkError::PersistenceMismatch {
                requested: created.len(),
                returned: ids.len(),
            });
        }

        for (parent, id) in created.iter().zip(ids) {
            self.binding.insert(parent.key.clone(), id);
        }

        Ok(())
    }

    /// Stamp every child with its parent identifier.
    ///
    /// All keys are checked first; on `UnresolvedKey` no child is modified.
    pub fn finalize<C: KeyedChild<Id>>(&self, children: &mut [C]) -> LinkResult<()> {
        if let Some(missing) = children
            .iter()
            .find(|c| !self.binding.contains_key(c.parent_key()))
        {
            return Err(LinkError::UnresolvedKey {
                key: missing.parent_key().to_string(),
            });
        }

        for child in children.iter_mut() {
            let id = self.binding[child.parent_key()].clone();
            child.assign_parent(id);
        }

        Ok(())
    }

    /// Current key -> identifier binding
    pub fn binding(&self) -> &HashMap<String, Id> {
        &self.binding
    }

    /// Identifier bound to `key`, if any
    pub fn lookup(&self, key: &str) -> Option<&Id> {
        self.binding.get(key)
    }

    pub fn into_binding(self) -> HashMap<String, Id> {
        self.binding
    }
}
