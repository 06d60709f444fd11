//! Predicates backing the searchable expense list.

use chrono::NaiveDate;
use spendbook_domain::{CategoryFilter, Expense};

/// Search and category criteria for the list view. Defaults match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub search_query: String,
    pub category: CategoryFilter,
    /// Inclusive lower bound on the expense date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the expense date.
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_search(expense) && self.category.accepts(expense.category) && self.in_range(expense)
    }

    /// Returns the matching subset of `expenses`, preserving order.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|expense| self.matches(expense))
            .cloned()
            .collect()
    }

    fn matches_search(&self, expense: &Expense) -> bool {
        self.search_query.is_empty()
            || expense
                .description
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
    }

    fn in_range(&self, expense: &Expense) -> bool {
        let day = expense.date.date_naive();
        self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

/// Free-function form of [`ExpenseFilter::matches`].
pub fn matches(expense: &Expense, filter: &ExpenseFilter) -> bool {
    filter.matches(expense)
}
