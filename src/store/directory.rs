//! Account directory
//!
//! Exposes a `RecordStore` through the linker capabilities with Accounts as
//! parents (keyed by name) and Contacts as children.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::config::AccountDefaults;
use crate::records::{Account, Contact};
use crate::resolver::ParentRef;
use crate::store::traits::{ChildCreator, ParentCreator, ParentLookup, RecordStore, StoreError};

/// Accounts-by-name view over a record store
pub struct AccountDirectory<'s, S> {
    store: &'s S,
    defaults: &'s AccountDefaults,
}

impl<'s, S: RecordStore> AccountDirectory<'s, S> {
    pub fn new(store: &'s S, defaults: &'s AccountDefaults) -> Self {
        Self { store, defaults }
    }

    fn new_account(&self, name: &str) -> Account {
        let mut account = Account::new(name);
        account.rating = self.defaults.rating.clone();
        account.industry = self.defaults.industry.clone();
        account
    }
}

#[async_trait]
impl<'s, S: RecordStore> ParentLookup<Uuid> for AccountDirectory<'s, S> {
    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<ParentRef<Uuid>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let accounts = self.store.find_accounts_by_names(keys).await?;
        debug!(requested = keys.len(), found = accounts.len(), "Account lookup");

        Ok(accounts
            .into_iter()
            .filter_map(|a| a.id.map(|id| ParentRef::existing(a.name, id)))
            .collect())
    }
}

#[async_trait]
impl<'s, S: RecordStore> ParentCreator<Uuid> for AccountDirectory<'s, S> {
    async fn create_parents(&self, parents: &[ParentRef<Uuid>]) -> Result<Vec<Uuid>, StoreError> {
        if parents.is_empty() {
            return Ok(Vec::new());
        }

        let accounts = parents.iter().map(|p| self.new_account(&p.key)).collect();
        let inserted = self.store.insert_accounts(accounts).await?;

        inserted
            .into_iter()
            .map(|a| {
                a.id.ok_or_else(|| {
                    StoreError::Backend(format!("Account '{}' stored without an id", a.name))
                })
            })
            .collect()
    }
}

#[async_trait]
impl<'s, S: RecordStore> ChildCreator<Contact> for AccountDirectory<'s, S> {
    async fn create_children(&self, children: Vec<Contact>) -> Result<Vec<Contact>, StoreError> {
        if children.is_empty() {
            return Ok(children);
        }
        self.store.insert_contacts(children).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRecordStore;

    #[tokio::test]
    async fn test_created_accounts_carry_defaults() {
        let store = InMemoryRecordStore::new();
        let defaults = AccountDefaults {
            rating: Some("Warm".to_string()),
            industry: None,
        };
        let directory = AccountDirectory::new(&store, &defaults);

        let ids = directory
            .create_parents(&[ParentRef::pending("Doe"), ParentRef::pending("Smith")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let found = store
            .find_accounts_by_names(&["Doe".to_string()])
            .await
            .unwrap();
        assert_eq!(found[0].id, Some(ids[0]));
        assert_eq!(found[0].rating.as_deref(), Some("Warm"));
    }

    #[tokio::test]
    async fn test_lookup_returns_existing_refs() {
        let store = InMemoryRecordStore::new();
        let inserted = store
            .insert_accounts(vec![Account::new("Doe")])
            .await
            .unwrap();
        let defaults = AccountDefaults::default();
        let directory = AccountDirectory::new(&store, &defaults);

        let refs = directory
            .find_by_keys(&["Doe".to_string(), "Smith".to_string()])
            .await
            .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].key, "Doe");
        assert_eq!(refs[0].id, inserted[0].id);
    }
}
