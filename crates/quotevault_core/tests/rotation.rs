use quotevault_core::{
    NewQuote, QuoteId, QuoteRepository, QuoteRotation, QuoteStore, RepoError, RotationError,
    RotationPolicy,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Barrier};
use std::thread;

fn store_with(bodies: &[&str]) -> (tempfile::TempDir, QuoteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = QuoteStore::initialize(dir.path().join("vault.db")).unwrap();
    for body in bodies {
        store.add_quote(&NewQuote::new(*body)).unwrap();
    }
    (dir, store)
}

fn bodies(count: usize) -> Vec<String> {
    (0..count).map(|n| format!("quote {n}")).collect()
}

#[test]
fn three_quotes_are_served_as_a_permutation_then_cycle() {
    let (_dir, store) = store_with(&["A", "B", "C"]);
    let rotation = QuoteRotation::new(&store);
    rotation.initialize().unwrap();

    let first_cycle: HashSet<_> = (0..3).map(|_| rotation.next().unwrap().body).collect();
    let expected: HashSet<_> = ["A", "B", "C"].map(String::from).into_iter().collect();
    assert_eq!(first_cycle, expected);

    let fourth = rotation.next().unwrap().body;
    assert!(expected.contains(&fourth));
}

#[test]
fn every_cycle_serves_each_quote_exactly_once() {
    let owned = bodies(25);
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let (_dir, store) = store_with(&refs);
    let expected_ids: HashSet<QuoteId> =
        store.list_quotes().unwrap().into_iter().map(|q| q.id).collect();

    for policy in [RotationPolicy::ReshuffleOnWrap, RotationPolicy::KeepOrder] {
        let rotation = QuoteRotation::with_seed(&store, 11).with_policy(policy);
        rotation.initialize().unwrap();

        for _cycle in 0..3 {
            let served: Vec<QuoteId> = (0..25).map(|_| rotation.next().unwrap().id).collect();
            let unique: HashSet<_> = served.iter().copied().collect();
            assert_eq!(unique.len(), 25, "policy {policy:?} repeated a quote");
            assert_eq!(unique, expected_ids);
        }
    }
}

#[test]
fn reshuffle_on_wrap_changes_the_order_eventually() {
    let owned = bodies(10);
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let (_dir, store) = store_with(&refs);
    let rotation = QuoteRotation::with_seed(&store, 5);
    rotation.initialize().unwrap();

    let first: Vec<QuoteId> = (0..10).map(|_| rotation.next().unwrap().id).collect();
    let changed = (0..5).any(|_| {
        let cycle: Vec<QuoteId> = (0..10).map(|_| rotation.next().unwrap().id).collect();
        cycle != first
    });
    assert!(changed);
}

#[test]
fn shuffle_is_reproducible_for_a_seed() {
    let owned = bodies(12);
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let (_dir, store) = store_with(&refs);

    let order = |seed| {
        let rotation = QuoteRotation::with_seed(&store, seed);
        rotation.initialize().unwrap();
        (0..24)
            .map(|_| rotation.next().unwrap().id)
            .collect::<Vec<_>>()
    };

    assert_eq!(order(99), order(99));
}

#[test]
fn empty_store_reports_empty_store() {
    let (_dir, store) = store_with(&[]);
    let rotation = QuoteRotation::new(&store);

    rotation.initialize().unwrap();
    assert_eq!(rotation.len(), Some(0));
    assert!(matches!(rotation.next(), Err(RotationError::EmptyStore)));
}

#[test]
fn next_without_initialize_bootstraps_from_store() {
    let (_dir, store) = store_with(&["only"]);
    let rotation = QuoteRotation::new(&store);

    assert!(!rotation.is_loaded());
    assert_eq!(rotation.next().unwrap().body, "only");
    assert!(rotation.is_loaded());
}

#[test]
fn store_mutations_need_reinitialize_to_become_visible() {
    let (_dir, store) = store_with(&["A", "B"]);
    let rotation = QuoteRotation::new(&store);
    rotation.initialize().unwrap();

    let removed = store.list_quotes().unwrap()[0].id;
    store.delete_quote(removed).unwrap();
    store.add_quote(&NewQuote::new("C")).unwrap();
    store.add_quote(&NewQuote::new("D")).unwrap();

    let stale: HashSet<_> = (0..2).map(|_| rotation.next().unwrap().id).collect();
    assert!(stale.contains(&removed));
    assert_eq!(rotation.len(), Some(2));

    rotation.initialize().unwrap();
    assert_eq!(rotation.len(), Some(3));
    let fresh: HashSet<_> = (0..3).map(|_| rotation.next().unwrap().id).collect();
    assert!(!fresh.contains(&removed));
}

#[test]
fn load_failure_surfaces_as_store_error() {
    let (dir, store) = store_with(&["A"]);
    let rotation = QuoteRotation::new(&store);
    drop(dir);

    assert!(matches!(rotation.initialize(), Err(RotationError::Store(_))));
    assert!(matches!(rotation.next(), Err(RotationError::Store(_))));
    assert!(!rotation.is_loaded());
}

#[test]
fn read_failure_passes_through_unchanged() {
    let (_dir, store) = store_with(&["A", "B"]);
    let conn = rusqlite::Connection::open(store.path()).unwrap();
    conn.execute_batch("DROP TABLE quote;").unwrap();
    drop(conn);

    let rotation = QuoteRotation::new(&store);
    assert!(matches!(
        rotation.next(),
        Err(RotationError::Store(RepoError::Read(_)))
    ));
    assert!(matches!(
        rotation.initialize(),
        Err(RotationError::Store(RepoError::Read(_)))
    ));
    assert!(!rotation.is_loaded());
}

#[test]
fn concurrent_next_serves_balanced_slots() {
    const QUOTES: usize = 8;
    const CALLERS: usize = 6;
    const CALLS: usize = 40;

    let owned = bodies(QUOTES);
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let (_dir, store) = store_with(&refs);
    let rotation = Arc::new(QuoteRotation::new(store));
    rotation.initialize().unwrap();

    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let rotation = Arc::clone(&rotation);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..CALLS)
                    .map(|_| rotation.next().unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut counts: HashMap<QuoteId, usize> = HashMap::new();
    let mut total = 0;
    for handle in handles {
        for id in handle.join().unwrap() {
            *counts.entry(id).or_default() += 1;
            total += 1;
        }
    }

    assert_eq!(total, CALLERS * CALLS);
    assert_eq!(counts.len(), QUOTES);
    // 240 calls over 8 quotes is exactly 30 full cycles.
    assert!(counts.values().all(|&served| served == CALLERS * CALLS / QUOTES));
}

#[test]
fn concurrent_first_callers_share_one_snapshot() {
    const CALLERS: usize = 5;

    let owned = bodies(CALLERS);
    let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
    let (_dir, store) = store_with(&refs);
    let rotation = QuoteRotation::new(store);
    let barrier = Barrier::new(CALLERS);

    let served: HashSet<QuoteId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    rotation.next().unwrap().id
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(served.len(), CALLERS);
    assert_eq!(rotation.len(), Some(CALLERS));
}
