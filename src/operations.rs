//! Record operations
//!
//! The basic record-management patterns over a `RecordStore`:
//! - single-record insert
//! - field update by name lookup
//! - list-based upsert with business-field defaults
//! - bulk insert-then-delete
//! - Contact -> Account linking by last name

use chrono::{NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LinkerConfig;
use crate::error::{LinkError, LinkResult};
use crate::linker::{LinkOutcome, UpsertLinker};
use crate::records::{Account, AccountUpdate, Contact, Opportunity};
use crate::resolver::{distinct_keys, KeyedChild, NameKeyedUpsertResolver, ParentRef};
use crate::store::{AccountDirectory, RecordStore, StoreError};

/// Result of an opportunity upsert
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpsertSummary {
    /// Opportunities created with configured defaults, in request order
    pub created: Vec<Opportunity>,
    /// Ids of requested opportunities that already existed
    pub matched: Vec<Uuid>,
    /// Resolved id for every requested name, in request order
    pub ids: Vec<Uuid>,
}

/// A requested opportunity name awaiting its record id
struct OpportunityRequest {
    name: String,
    opportunity_id: Option<Uuid>,
}

impl KeyedChild<Uuid> for OpportunityRequest {
    fn parent_key(&self) -> &str {
        &self.name
    }

    fn assign_parent(&mut self, id: Uuid) {
        self.opportunity_id = Some(id);
    }
}

/// Record operations over a store
pub struct RecordOperations<S> {
    store: S,
    config: LinkerConfig,
}

impl<S: RecordStore> RecordOperations<S> {
    pub fn new(store: S, config: LinkerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Insert a single Account by name
    pub async fn insert_account(&self, name: &str) -> LinkResult<Account> {
        if name.trim().is_empty() {
            return Err(LinkError::InvalidKey { index: 0 });
        }

        let mut inserted = self.store.insert_accounts(vec![Account::new(name)]).await?;
        let account = inserted.pop().ok_or(LinkError::PersistenceMismatch {
            requested: 1,
            returned: 0,
        })?;

        info!(account_name = %account.name, id = ?account.id, "Inserted account");
        Ok(account)
    }

    /// Look up an Account by name and apply `update` to it.
    ///
    /// If several Accounts share the name, the first one stored is updated.
    pub async fn update_account_by_name(
        &self,
        name: &str,
        update: &AccountUpdate,
    ) -> LinkResult<Account> {
        if name.trim().is_empty() {
            return Err(LinkError::InvalidKey { index: 0 });
        }

        let mut found = self
            .store
            .find_accounts_by_names(&[name.to_string()])
            .await?;
        if found.is_empty() {
            return Err(StoreError::NotFound(format!("Account '{}'", name)).into());
        }
        if found.len() > 1 {
            warn!(account_name = %name, matches = found.len(), "Several accounts share this name");
        }

        let mut account = found.remove(0);
        if update.is_empty() {
            debug!(account_name = %name, "Empty update, nothing to write");
            return Ok(account);
        }

        update.apply(&mut account);
        self.store.update_account(&account).await?;

        info!(account_name = %name, id = ?account.id, "Updated account");
        Ok(account)
    }

    /// Upsert opportunities by name, creating missing ones with defaults
    pub async fn upsert_opportunities(&self, names: &[String]) -> LinkResult<UpsertSummary> {
        self.upsert_opportunities_on(names, Utc::now().date_naive())
            .await
    }

    /// Upsert opportunities by name, with close dates counted from `today`
    pub async fn upsert_opportunities_on(
        &self,
        names: &[String],
        today: NaiveDate,
    ) -> LinkResult<UpsertSummary> {
        let mut requests: Vec<OpportunityRequest> = names
            .iter()
            .map(|name| OpportunityRequest {
                name: name.clone(),
                opportunity_id: None,
            })
            .collect();

        let keys = distinct_keys::<Uuid, _>(&requests)?;
        if keys.is_empty() {
            return Ok(UpsertSummary::default());
        }

        let existing = self.store.find_opportunities_by_names(&keys).await?;
        let existing_refs: Vec<ParentRef<Uuid>> = existing
            .iter()
            .filter_map(|o| o.id.map(|id| ParentRef::existing(o.name.clone(), id)))
            .collect();

        let mut resolver = NameKeyedUpsertResolver::new();
        let to_create = resolver.resolve(&requests, existing_refs)?;

        let matched: Vec<Uuid> = keys
            .iter()
            .filter_map(|key| resolver.lookup(key).copied())
            .collect();

        let defaults = &self.config.opportunity_defaults;
        let close_date = TimeDelta::try_days(defaults.close_date_offset_days)
            .and_then(|offset| today.checked_add_signed(offset))
            .ok_or(LinkError::CloseDateOutOfRange {
                from: today,
                offset_days: defaults.close_date_offset_days,
            })?;
        let drafts: Vec<Opportunity> = to_create
            .iter()
            .map(|p| Opportunity {
                id: None,
                name: p.key.clone(),
                stage_name: defaults.stage_name.clone(),
                close_date,
                amount: defaults.amount,
                account_id: None,
            })
            .collect();

        let created = if drafts.is_empty() {
            Vec::new()
        } else {
            self.store.insert_opportunities(drafts).await?
        };
        let created_ids: Vec<Uuid> = created.iter().filter_map(|o| o.id).collect();
        resolver.bind_identifiers(&to_create, created_ids)?;
        resolver.finalize(&mut requests)?;

        let ids = requests
            .iter()
            .filter_map(|r| r.opportunity_id)
            .collect();

        info!(
            requested = names.len(),
            created = created.len(),
            matched = matched.len(),
            "Upserted opportunities"
        );

        Ok(UpsertSummary {
            created,
            matched,
            ids,
        })
    }

    /// Insert one Account per name, then delete exactly those records.
    ///
    /// Returns the number of records deleted.
    pub async fn bulk_insert_then_delete(&self, names: &[String]) -> LinkResult<usize> {
        if let Some(index) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(LinkError::InvalidKey { index });
        }
        if names.is_empty() {
            return Ok(0);
        }

        let accounts = names.iter().map(Account::new).collect();
        let inserted = self.store.insert_accounts(accounts).await?;
        let ids: Vec<Uuid> = inserted.iter().filter_map(|a| a.id).collect();
        if ids.len() != names.len() {
            return Err(LinkError::PersistenceMismatch {
                requested: names.len(),
                returned: ids.len(),
            });
        }
        debug!(count = ids.len(), "Bulk inserted accounts");

        let deleted = self.store.delete_accounts(&ids).await?;
        if deleted != ids.len() {
            return Err(LinkError::PersistenceMismatch {
                requested: ids.len(),
                returned: deleted,
            });
        }

        info!(count = deleted, "Bulk inserted then deleted accounts");
        Ok(deleted)
    }

    /// Link Contacts to Accounts by last name, creating missing Accounts
    pub async fn link_contacts_to_accounts(
        &self,
        contacts: Vec<Contact>,
    ) -> LinkResult<LinkOutcome<Contact>> {
        let directory = AccountDirectory::new(&self.store, &self.config.account_defaults);
        UpsertLinker::new(&directory)
            .link::<Uuid, Contact>(contacts)
            .await
    }
}
