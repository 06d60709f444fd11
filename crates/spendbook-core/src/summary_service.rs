//! Dashboard statistics derived from an expense snapshot. Everything here is pure.

use chrono::{DateTime, Datelike, TimeZone};
use spendbook_domain::{Category, Expense};

/// Label shown in place of a top category when there is no spending at all.
pub const NO_TOP_CATEGORY: &str = "N/A";

/// Spending subtotal for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Everything the dashboard renders, computed from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: f64,
    pub current_month_total: f64,
    pub top_category: Option<Category>,
    pub count: usize,
    pub by_category: Vec<CategoryTotal>,
}

impl DashboardSummary {
    pub fn top_category_label(&self) -> &'static str {
        self.top_category
            .map(|category| category.as_str())
            .unwrap_or(NO_TOP_CATEGORY)
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn total(expenses: &[Expense]) -> f64 {
        expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Subtotals per category, largest first. Equal subtotals keep the order in which
    /// their category first appears in `expenses`.
    pub fn by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for expense in expenses {
            match totals
                .iter_mut()
                .find(|entry| entry.category == expense.category)
            {
                Some(entry) => entry.total += expense.amount,
                None => totals.push(CategoryTotal {
                    category: expense.category,
                    total: expense.amount,
                }),
            }
        }
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        totals
    }

    /// Sums expenses dated in the calendar month of `reference`, judged in the
    /// reference's own time zone.
    pub fn current_month_total<Tz: TimeZone>(expenses: &[Expense], reference: &DateTime<Tz>) -> f64 {
        let zone = reference.timezone();
        expenses
            .iter()
            .filter(|expense| {
                let local = expense.date.with_timezone(&zone);
                local.year() == reference.year() && local.month() == reference.month()
            })
            .map(|expense| expense.amount)
            .sum()
    }

    pub fn top_category(expenses: &[Expense]) -> Option<Category> {
        Self::by_category(expenses)
            .first()
            .map(|entry| entry.category)
    }

    pub fn top_category_label(expenses: &[Expense]) -> &'static str {
        Self::top_category(expenses)
            .map(|category| category.as_str())
            .unwrap_or(NO_TOP_CATEGORY)
    }

    pub fn count(expenses: &[Expense]) -> usize {
        expenses.len()
    }

    pub fn summarize<Tz: TimeZone>(expenses: &[Expense], reference: &DateTime<Tz>) -> DashboardSummary {
        let by_category = Self::by_category(expenses);
        DashboardSummary {
            total: Self::total(expenses),
            current_month_total: Self::current_month_total(expenses, reference),
            top_category: by_category.first().map(|entry| entry.category),
            count: Self::count(expenses),
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn expense(amount: f64, category: Category, date: DateTime<Utc>) -> Expense {
        Expense {
            id: format!("{category}-{amount}"),
            amount,
            category,
            description: "item".into(),
            date,
            created_at: date,
        }
    }

    fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_snapshot_yields_neutral_values() {
        let summary = SummaryService::summarize(&[], &on(2025, 1, 1));
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.current_month_total, 0.0);
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.top_category, None);
        assert_eq!(summary.top_category_label(), "N/A");
        assert_eq!(summary.count, 0);
        assert_eq!(SummaryService::top_category_label(&[]), NO_TOP_CATEGORY);
    }

    #[test]
    fn groups_and_orders_by_subtotal() {
        let date = on(2025, 2, 1);
        let expenses = vec![
            expense(10.0, Category::Food, date),
            expense(5.0, Category::Food, date),
            expense(20.0, Category::Bills, date),
        ];

        let totals = SummaryService::by_category(&expenses);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: Category::Bills,
                    total: 20.0
                },
                CategoryTotal {
                    category: Category::Food,
                    total: 15.0
                },
            ]
        );
        assert_eq!(SummaryService::top_category(&expenses), Some(Category::Bills));
        assert_eq!(SummaryService::total(&expenses), 35.0);
        assert_eq!(SummaryService::count(&expenses), 3);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let date = on(2025, 2, 1);
        let expenses = vec![
            expense(7.0, Category::Health, date),
            expense(7.0, Category::Shopping, date),
            expense(9.0, Category::Other, date),
        ];

        let order: Vec<_> = SummaryService::by_category(&expenses)
            .into_iter()
            .map(|entry| entry.category)
            .collect();
        assert_eq!(order, vec![Category::Other, Category::Health, Category::Shopping]);
    }

    #[test]
    fn current_month_excludes_other_months_and_years() {
        let expenses = vec![
            expense(10.0, Category::Food, on(2025, 3, 2)),
            expense(4.0, Category::Food, on(2025, 3, 31)),
            expense(100.0, Category::Food, on(2025, 2, 28)),
            expense(100.0, Category::Food, on(2024, 3, 15)),
        ];

        let total = SummaryService::current_month_total(&expenses, &on(2025, 3, 20));
        assert_eq!(total, 14.0);
    }

    #[test]
    fn current_month_uses_reference_time_zone() {
        // 23:30 UTC on Jan 31 is already February in UTC+2.
        let late = Utc.with_ymd_and_hms(2025, 1, 31, 23, 30, 0).unwrap();
        let expenses = vec![expense(8.0, Category::Food, late)];

        let utc_reference = on(2025, 2, 10);
        assert_eq!(SummaryService::current_month_total(&expenses, &utc_reference), 0.0);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_reference = plus_two.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap();
        assert_eq!(SummaryService::current_month_total(&expenses, &local_reference), 8.0);
    }
}
