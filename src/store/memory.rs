//! In-memory record store
//!
//! Reference adapter for the store capabilities, used by tests and the demo
//! binary. Tables are plain vectors behind one `RwLock`; every call validates
//! its whole input before mutating, so a failed call leaves no trace.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::records::{Account, Contact, Opportunity};
use crate::store::traits::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    contacts: Vec<Contact>,
    opportunities: Vec<Opportunity>,
}

/// Record store held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    pub async fn contacts(&self) -> Vec<Contact> {
        self.tables.read().await.contacts.clone()
    }

    pub async fn opportunity_count(&self) -> usize {
        self.tables.read().await.opportunities.len()
    }
}

fn reject_preassigned(kind: &str, id: Option<Uuid>) -> Result<(), StoreError> {
    match id {
        Some(id) => Err(StoreError::Constraint(format!(
            "{} already has id {}; use update instead",
            kind, id
        ))),
        None => Ok(()),
    }
}

fn require_field(kind: &str, field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Constraint(format!(
            "{}.{} is required",
            kind, field
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_accounts(&self, accounts: Vec<Account>) -> Result<Vec<Account>, StoreError> {
        for account in &accounts {
            reject_preassigned("Account", account.id)?;
            require_field("Account", "name", &account.name)?;
        }

        let mut tables = self.tables.write().await;
        let inserted: Vec<Account> = accounts
            .into_iter()
            .map(|mut a| {
                a.id = Some(Uuid::new_v4());
                a
            })
            .collect();
        tables.accounts.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let id = account
            .id
            .ok_or_else(|| StoreError::Constraint("Account update requires an id".to_string()))?;
        require_field("Account", "name", &account.name)?;

        let mut tables = self.tables.write().await;
        let stored = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("Account {}", id)))?;
        *stored = account.clone();
        Ok(())
    }

    async fn find_accounts_by_names(&self, names: &[String]) -> Result<Vec<Account>, StoreError> {
        let wanted: HashSet<&str> = names.iter().map(|n| n.as_str()).collect();
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|a| wanted.contains(a.name.as_str()))
            .cloned()
            .collect())
    }

    async fn delete_accounts(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let doomed: HashSet<Uuid> = ids.iter().copied().collect();
        let mut tables = self.tables.write().await;

        if let Some(contact) = tables
            .contacts
            .iter()
            .find(|c| c.account_id.is_some_and(|id| doomed.contains(&id)))
        {
            return Err(StoreError::Constraint(format!(
                "Account {} is referenced by Contact '{}'",
                contact.account_id.unwrap_or_default(),
                contact.last_name
            )));
        }

        let before = tables.accounts.len();
        tables
            .accounts
            .retain(|a| !a.id.is_some_and(|id| doomed.contains(&id)));
        Ok(before - tables.accounts.len())
    }

    async fn insert_contacts(&self, contacts: Vec<Contact>) -> Result<Vec<Contact>, StoreError> {
        let mut tables = self.tables.write().await;
        let known: HashSet<Uuid> = tables.accounts.iter().filter_map(|a| a.id).collect();

        for contact in &contacts {
            reject_preassigned("Contact", contact.id)?;
            require_field("Contact", "last_name", &contact.last_name)?;
            if let Some(account_id) = contact.account_id {
                if !known.contains(&account_id) {
                    return Err(StoreError::Constraint(format!(
                        "Contact '{}' references unknown Account {}",
                        contact.last_name, account_id
                    )));
                }
            }
        }

        let inserted: Vec<Contact> = contacts
            .into_iter()
            .map(|mut c| {
                c.id = Some(Uuid::new_v4());
                c
            })
            .collect();
        tables.contacts.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_opportunities(
        &self,
        opportunities: Vec<Opportunity>,
    ) -> Result<Vec<Opportunity>, StoreError> {
        for opportunity in &opportunities {
            reject_preassigned("Opportunity", opportunity.id)?;
            require_field("Opportunity", "name", &opportunity.name)?;
            require_field("Opportunity", "stage_name", &opportunity.stage_name)?;
        }

        let mut tables = self.tables.write().await;
        let inserted: Vec<Opportunity> = opportunities
            .into_iter()
            .map(|mut o| {
                o.id = Some(Uuid::new_v4());
                o
            })
            .collect();
        tables.opportunities.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn find_opportunities_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<Opportunity>, StoreError> {
        let wanted: HashSet<&str> = names.iter().map(|n| n.as_str()).collect();
        let tables = self.tables.read().await;
        Ok(tables
            .opportunities
            .iter()
            .filter(|o| wanted.contains(o.name.as_str()))
            .cloned()
            .collect())
    }
}
