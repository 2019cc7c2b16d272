//! Record store capabilities and adapters

pub mod directory;
pub mod memory;
pub mod traits;

pub use directory::AccountDirectory;
pub use memory::InMemoryRecordStore;
pub use traits::{ChildCreator, ParentCreator, ParentLookup, RecordStore, StoreError};
