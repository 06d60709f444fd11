use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spendbook::{
    spendbook_core::{export, ExpenseFilter, SummaryService},
    spendbook_domain::{Category, CategoryFilter, Expense, ExpenseDraft},
    spendbook_storage_json::{load_expenses_from_path, save_expenses_to_path},
};
use tempfile::tempdir;

fn build_sample_expenses(count: usize) -> Vec<Expense> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::hours((idx % 8_760) as i64);
            let category = Category::ALL[idx % Category::ALL.len()];
            let draft = ExpenseDraft::new(
                5.0 + (idx % 200) as f64 * 0.75,
                category,
                format!("Sample purchase #{idx}"),
                date,
            );
            Expense::from_draft(format!("bench-{idx:06}"), draft, date)
        })
        .collect()
}

fn bench_expense_io(c: &mut Criterion) {
    let expenses = build_sample_expenses(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("expenses.json");

    c.bench_function("expenses_save_10k", |b| {
        b.iter(|| {
            save_expenses_to_path(&expenses, &file_path).expect("save expenses");
        })
    });

    save_expenses_to_path(&expenses, &file_path).expect("seed");

    c.bench_function("expenses_load_10k", |b| {
        b.iter(|| {
            let loaded = load_expenses_from_path(&file_path).expect("load expenses");
            black_box(loaded);
        })
    });
}

fn bench_expense_views(c: &mut Criterion) {
    let expenses = build_sample_expenses(black_box(10_000));
    let reference = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();

    c.bench_function("dashboard_summary_10k", |b| {
        b.iter(|| {
            let summary = SummaryService::summarize(&expenses, &reference);
            black_box(summary);
        })
    });

    let filter = ExpenseFilter::new()
        .with_search("purchase #1")
        .with_category(CategoryFilter::Only(Category::Food));
    c.bench_function("filtered_list_10k", |b| {
        b.iter(|| black_box(filter.apply(&expenses)))
    });

    c.bench_function("csv_export_10k", |b| {
        b.iter(|| black_box(export::to_csv_string(&expenses).expect("csv")))
    });
}

criterion_group!(benches, bench_expense_io, bench_expense_views);
criterion_main!(benches);
