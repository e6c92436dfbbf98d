//! Budget management backend for the customer/campaign/channel tree, goals and
//! settings, with spend reallocation and durable persistence.
//!
//! All state lives in a single owned [`BudgetStore`]; observers are notified
//! after every commit and the persistence layer writes the changed document.

pub mod allocation;
pub mod export;
pub mod models;
pub mod persistence;
pub mod seed;
pub mod store;

pub use allocation::{apply_allocation, merge_into_campaign, AllocationMap, MergeOutcome};
pub use export::{export_customers, export_file_name};
pub use models::{NewCampaign, NewChannel, NewCustomer, NewGoal};
pub use persistence::{load_state, FileStore, KeyValueStore, MemoryStore, PersistenceObserver};
pub use store::{BudgetStore, Collection, StoreObserver, StoreState};
