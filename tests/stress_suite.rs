mod common;

use std::{sync::Arc, thread};

use common::{draft, file_store, test_dir};
use spendbook::spendbook_domain::{Category, ExpensePatch};

#[test]
fn concurrent_creates_through_one_store_are_all_kept() {
    let dir = test_dir();
    let store = Arc::new(file_store(&dir));

    let handles: Vec<_> = (0..6)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..15 {
                    let description = format!("worker {worker} item {n}");
                    store
                        .create(draft(1.0 + n as f64, Category::Shopping, &description, 5))
                        .expect("create");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread");
    }

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 90);
    let mut ids: Vec<_> = all.iter().map(|expense| expense.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 90);
}

#[test]
fn mixed_mutations_from_separate_stores_do_not_lose_updates() {
    let dir = test_dir();
    let seed = file_store(&dir);
    let doomed: Vec<_> = (0..10)
        .map(|n| {
            seed.create(draft(2.0, Category::Other, &format!("old {n}"), 1))
                .unwrap()
                .id
        })
        .collect();
    let kept = seed.create(draft(3.0, Category::Bills, "Water", 2)).unwrap();

    let deleter = {
        let dir = dir.clone();
        thread::spawn(move || {
            let store = file_store(&dir);
            for id in doomed {
                store.delete(&id).expect("delete");
            }
        })
    };
    let creator = {
        let dir = dir.clone();
        thread::spawn(move || {
            let store = file_store(&dir);
            for n in 0..10 {
                store
                    .create(draft(4.0, Category::Food, &format!("new {n}"), 3))
                    .expect("create");
            }
        })
    };
    let updater = {
        let dir = dir.clone();
        let id = kept.id.clone();
        thread::spawn(move || {
            let store = file_store(&dir);
            for n in 1..=10 {
                store
                    .update(&id, ExpensePatch::default().amount(n as f64 * 10.0))
                    .expect("update");
            }
        })
    };
    for handle in [deleter, creator, updater] {
        handle.join().expect("worker thread");
    }

    let all = file_store(&dir).list_all().unwrap();
    assert_eq!(all.len(), 11);
    assert!(all.iter().all(|expense| !expense.description.starts_with("old")));
    let water = all.iter().find(|expense| expense.id == kept.id).unwrap();
    assert_eq!(water.amount, 100.0);
}
