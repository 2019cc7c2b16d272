//! Record Linker - CRM record operations with name-keyed upsert resolution
//!
//! Children (Contacts, opportunity requests) reference their parent by a
//! natural key such as a name. The resolver works out which parents already
//! exist, which must be created, and stamps every child with its parent id.
//! The record store is reached only through capability traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  RecordOperations: insert, update-by-name, upsert, bulk delete  │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       UpsertLinker                               │
//! │     lookup -> resolve -> create parents -> bind -> finalize      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 NameKeyedUpsertResolver                          │
//! │              natural key -> parent identifier                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │     ParentLookup / ParentCreator / ChildCreator / RecordStore    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use record_linker::{Contact, InMemoryRecordStore, LinkerConfig, RecordOperations};
//!
//! let ops = RecordOperations::new(InMemoryRecordStore::new(), LinkerConfig::default());
//! let outcome = ops
//!     .link_contacts_to_accounts(vec![Contact::new("Jane", "Doe")])
//!     .await?;
//! assert!(outcome.children[0].account_id.is_some());
//! ```

pub mod config;
pub mod error;
pub mod linker;
pub mod operations;
pub mod records;
pub mod resolver;
pub mod store;

// Re-export main types
pub use config::{AccountDefaults, ConfigError, LinkerConfig, OpportunityDefaults};
pub use error::{LinkError, LinkResult};
pub use linker::{LinkOutcome, LinkReport, UpsertLinker};
pub use operations::{RecordOperations, UpsertSummary};
pub use records::{Account, AccountUpdate, Contact, Opportunity};
pub use resolver::{distinct_keys, KeyedChild, NameKeyedUpsertResolver, ParentRef};
pub use store::{
    AccountDirectory, ChildCreator, InMemoryRecordStore, ParentCreator, ParentLookup,
    RecordStore, StoreError,
};
