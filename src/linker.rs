//! Upsert linker
//!
//! Drives one linking pass against the store capabilities:
//!
//! ```text
//! 1. validate child keys            (InvalidKey, store untouched)
//! 2. lookup existing parents        ParentLookup
//! 3. resolve creation set           NameKeyedUpsertResolver
//! 4. create missing parents         ParentCreator
//! 5. bind identifiers               (PersistenceMismatch)
//! 6. finalize children              (UnresolvedKey)
//! 7. persist children               ChildCreator
//! ```
//!
//! Store failures abort the pass and propagate unchanged. Two linkers racing
//! on overlapping keys may both create the same parent.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::LinkResult;
use crate::resolver::{distinct_keys, KeyedChild, NameKeyedUpsertResolver};
use crate::store::{ChildCreator, ParentCreator, ParentLookup};

/// Counts from one linking pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub children: usize,
    pub distinct_keys: usize,
    pub existing_parents: usize,
    pub created_parents: usize,
}

/// Persisted children plus the pass report
#[derive(Debug, Clone)]
pub struct LinkOutcome<C> {
    pub children: Vec<C>,
    pub report: LinkReport,
}

/// Links children to parents by natural key through a store
pub struct UpsertLinker<'a, S> {
    store: &'a S,
}

impl<'a, S> UpsertLinker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Link `children` to their parents, creating missing parents first.
    pub async fn link<Id, C>(&self, mut children: Vec<C>) -> LinkResult<LinkOutcome<C>>
    where
        Id: Clone,
        C: KeyedChild<Id>,
        S: ParentLookup<Id> + ParentCreator<Id> + ChildCreator<C>,
    {
        let keys = distinct_keys::<Id, C>(&children)?;
        let mut report = LinkReport {
            children: children.len(),
            distinct_keys: keys.len(),
            ..Default::default()
        };

        if children.is_empty() {
            debug!("No children to link");
            return Ok(LinkOutcome { children, report });
        }

        let existing = self.store.find_by_keys(&keys).await?;
        report.existing_parents = existing.len();

        let mut resolver = NameKeyedUpsertResolver::new();
        let to_create = resolver.resolve(&children, existing)?;

        if !to_create.is_empty() {
            debug!(count = to_create.len(), "Creating missing parents");
            let ids = self.store.create_parents(&to_create).await?;
            resolver.bind_identifiers(&to_create, ids)?;
        }
        report.created_parents = to_create.len();

        resolver.finalize(&mut children)?;
        let children = self.store.create_children(children).await?;

        info!(
            children = report.children,
            existing = report.existing_parents,
            created = report.created_parents,
            "Linked children to parents"
        );

        Ok(LinkOutcome { children, report })
    }
}
