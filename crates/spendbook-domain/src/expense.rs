//! Domain models for expense records and the inputs that create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{category::Category, common::*};

/// A single spending entry as persisted in the expense document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    /// When the money was spent, as entered by the user.
    pub date: DateTime<Utc>,
    /// When the record was inserted. Never changes after creation.
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Builds a record from a draft plus the identity fields assigned by the store.
    pub fn from_draft(id: impl Into<String>, draft: ExpenseDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            created_at,
        }
    }

    /// Merges the supplied patch fields into this record. Identity fields stay untouched.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({}, {:.2})", self.description, self.category, self.amount)
    }
}

/// Fields supplied by the caller when recording a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl ExpenseDraft {
    pub fn new(
        amount: f64,
        category: Category,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            category,
            description: description.into(),
            date,
        }
    }
}

/// Partial update for an existing expense. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}
