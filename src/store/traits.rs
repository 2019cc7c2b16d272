//! Store capability traits
//!
//! The resolver never touches the record store. The linker reaches it through
//! three narrow capabilities; the record operations use the full
//! `RecordStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::records::{Account, Contact, Opportunity};
use crate::resolver::ParentRef;

/// Find parents already present in the store by natural key
#[async_trait]
pub trait ParentLookup<Id>: Send + Sync {
    /// Returns every stored parent whose key is in `keys`, with its id set.
    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<ParentRef<Id>>, StoreError>;
}

/// Persist new parents
#[async_trait]
pub trait ParentCreator<Id>: Send + Sync {
    /// Persist `parents` atomically and return one id per parent, in order.
    async fn create_parents(&self, parents: &[ParentRef<Id>]) -> Result<Vec<Id>, StoreError>;
}

/// Persist finalized children
#[async_trait]
pub trait ChildCreator<C>: Send + Sync {
    /// Persist all `children` or none; returns them as stored.
    async fn create_children(&self, children: Vec<C>) -> Result<Vec<C>, StoreError>;
}

/// Record-level access to the CRM store
///
/// Inserts assign ids to records that have none and reject records that
/// already carry one. Every call is all-or-nothing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_accounts(&self, accounts: Vec<Account>) -> Result<Vec<Account>, StoreError>;

    /// Overwrite the stored Account with the same id
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Accounts whose name is in `names`, in insertion order
    async fn find_accounts_by_names(&self, names: &[String]) -> Result<Vec<Account>, StoreError>;

    /// Delete by id; returns the number of records removed
    async fn delete_accounts(&self, ids: &[Uuid]) -> Result<usize, StoreError>;

    async fn insert_contacts(&self, contacts: Vec<Contact>) -> Result<Vec<Contact>, StoreError>;

    async fn insert_opportunities(
        &self,
        opportunities: Vec<Opportunity>,
    ) -> Result<Vec<Opportunity>, StoreError>;

    /// Opportunities whose name is in `names`, in insertion order
    async fn find_opportunities_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<Opportunity>, StoreError>;
}

/// Errors reported by the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}
