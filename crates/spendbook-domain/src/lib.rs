//! spendbook-domain
//!
//! Pure domain models (Expense, Category, drafts and patches).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod expense;

pub use category::*;
pub use common::*;
pub use expense::*;
