use std::sync::PoisonError;

use spendbook_domain::{Expense, ExpenseDraft, ExpensePatch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    storage::ExpenseStorage,
    time::{Clock, SystemClock},
    validation::{validate_draft, validate_patch},
    CoreError,
};

/// Single source of truth for the expense collection.
///
/// Every mutation runs as one read-modify-write cycle under the storage location's
/// write lock, so concurrent writers never persist a stale snapshot over each other.
pub struct ExpenseStore {
    storage: Box<dyn ExpenseStorage>,
    clock: Box<dyn Clock>,
}

enum Outcome<T> {
    Persist(T),
    Unchanged(T),
}

impl ExpenseStore {
    pub fn new(storage: Box<dyn ExpenseStorage>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: Box<dyn ExpenseStorage>, clock: Box<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &dyn ExpenseStorage {
        self.storage.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns the full collection, newest first.
    pub fn list_all(&self) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.storage.load()?;
        debug!(
            location = %self.storage.location(),
            count = expenses.len(),
            "loaded expenses"
        );
        Ok(expenses)
    }

    pub fn get(&self, id: &str) -> Result<Option<Expense>, CoreError> {
        Ok(self.list_all()?.into_iter().find(|expense| expense.id == id))
    }

    /// Validates and records a new expense at the front of the collection.
    pub fn create(&self, draft: ExpenseDraft) -> Result<Expense, CoreError> {
        if let Err(err) = validate_draft(&draft) {
            warn!(error = %err, "rejected new expense");
            return Err(err);
        }
        let created_at = self.clock.now();
        let expense = self.mutate(|expenses| {
            let id = fresh_id(expenses);
            let expense = Expense::from_draft(id, draft, created_at);
            expenses.insert(0, expense.clone());
            Ok(Outcome::Persist(expense))
        })?;
        info!(id = %expense.id, amount = expense.amount, category = %expense.category, "expense created");
        Ok(expense)
    }

    /// Merges `patch` into the expense identified by `id`.
    pub fn update(&self, id: &str, patch: ExpensePatch) -> Result<Expense, CoreError> {
        if let Err(err) = validate_patch(&patch) {
            warn!(id, error = %err, "rejected expense update");
            return Err(err);
        }
        let updated = self.mutate(|expenses| {
            let expense = expenses
                .iter_mut()
                .find(|expense| expense.id == id)
                .ok_or_else(|| CoreError::ExpenseNotFound(id.to_string()))?;
            expense.apply(patch);
            Ok(Outcome::Persist(expense.clone()))
        })?;
        info!(id, "expense updated");
        Ok(updated)
    }

    /// Removes the expense identified by `id`. Unknown ids are ignored.
    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let removed = self.mutate(|expenses| {
            let before = expenses.len();
            expenses.retain(|expense| expense.id != id);
            if expenses.len() == before {
                Ok(Outcome::Unchanged(false))
            } else {
                Ok(Outcome::Persist(true))
            }
        })?;
        if removed {
            info!(id, "expense deleted");
        } else {
            debug!(id, "delete ignored, no such expense");
        }
        Ok(())
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Vec<Expense>) -> Result<Outcome<T>, CoreError>,
    ) -> Result<T, CoreError> {
        let lock = self.storage.write_lock();
        // Documents are replaced atomically, so a poisoned lock never guards torn state.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut expenses = self.storage.load()?;
        match op(&mut expenses)? {
            Outcome::Persist(value) => {
                self.storage.save(&expenses)?;
                Ok(value)
            }
            Outcome::Unchanged(value) => Ok(value),
        }
    }
}

fn fresh_id(existing: &[Expense]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !existing.iter().any(|expense| expense.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStorage, time::FixedClock};
    use chrono::{TimeZone, Utc};
    use spendbook_domain::Category;
    use std::collections::HashSet;

    fn store() -> ExpenseStore {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        ExpenseStore::with_clock(Box::new(MemoryStorage::new()), Box::new(FixedClock(now)))
    }

    fn draft(amount: f64, category: Category, description: &str) -> ExpenseDraft {
        let date = Utc.with_ymd_and_hms(2025, 5, 30, 0, 0, 0).unwrap();
        ExpenseDraft::new(amount, category, description, date)
    }

    #[test]
    fn create_assigns_unique_ids_and_clock_timestamp() {
        let store = store();
        let mut ids = HashSet::new();
        for idx in 0..25 {
            let expense = store
                .create(draft(1.0 + idx as f64, Category::Food, "Snack"))
                .expect("create expense");
            assert_eq!(expense.created_at, store.clock().now());
            assert!(ids.insert(expense.id), "duplicate id generated");
        }
    }

    #[test]
    fn create_prepends_newest_record() {
        let store = store();
        store.create(draft(5.0, Category::Food, "First")).unwrap();
        let second = store.create(draft(6.0, Category::Bills, "Second")).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], second);
        assert_eq!(all[1].description, "First");
    }

    #[test]
    fn create_rejects_invalid_drafts_without_writing() {
        let store = store();
        for bad in [
            draft(0.0, Category::Food, "Zero"),
            draft(-5.0, Category::Food, "Negative"),
            draft(5.0, Category::Food, ""),
        ] {
            let err = store.create(bad).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Validation);
        }
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn update_keeps_identity_fields() {
        let store = store();
        let created = store.create(draft(20.0, Category::Shopping, "Shoes")).unwrap();

        let updated = store
            .update(&created.id, ExpensePatch::default().amount(50.0))
            .expect("update expense");

        let stored = store.get(&created.id).unwrap().expect("expense present");
        assert_eq!(stored, updated);
        assert_eq!(stored.amount, 50.0);
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.created_at, created.created_at);
        assert_eq!(stored.description, "Shoes");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = store();
        let err = store
            .update("missing", ExpensePatch::default().amount(3.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ExpenseNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn update_revalidates_supplied_fields() {
        let store = store();
        let created = store.create(draft(20.0, Category::Health, "Dentist")).unwrap();

        let err = store
            .update(&created.id, ExpensePatch::default().amount(-1.0))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert_eq!(store.get(&created.id).unwrap().unwrap().amount, 20.0);
    }

    #[test]
    fn delete_removes_record_and_ignores_unknown_ids() {
        let store = store();
        let keep = store.create(draft(1.0, Category::Other, "Keep")).unwrap();
        let drop = store.create(draft(2.0, Category::Other, "Drop")).unwrap();

        store.delete(&drop.id).expect("delete existing");
        store.delete("does-not-exist").expect("delete unknown");

        let all = store.list_all().unwrap();
        assert_eq!(all, vec![keep]);
    }
}
