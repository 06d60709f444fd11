//! spendbook-core
//!
//! Expense store, aggregation and list-view logic for Spendbook.
//! Depends on spendbook-domain. No CLI, no terminal I/O; file persistence lives in
//! spendbook-storage-json behind the [`ExpenseStorage`] trait.

pub mod error;
pub mod export;
pub mod expense_store;
pub mod filter;
pub mod format;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use error::{CoreError, ErrorKind};
pub use expense_store::ExpenseStore;
pub use filter::{matches, ExpenseFilter};
pub use format::{CurrencyFormatter, DateFormatter, StandardFormatter};
pub use storage::{
    ExpenseStorage, KeyValueStorage, KeyValueStore, MemoryKeyValueStore, MemoryStorage,
};
pub use summary_service::{CategoryTotal, DashboardSummary, SummaryService, NO_TOP_CATEGORY};
pub use time::{Clock, FixedClock, SystemClock};
