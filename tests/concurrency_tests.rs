//! Global-scope caches shared between threads.

use recall::cache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_callers_compute_once() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(capacity = 4)]
    fn slow_square(x: u64) -> u64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        x * x
    }

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                slow_square(12)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 144);
    }
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_threads_share_results() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(capacity = 16)]
    fn label(n: u32) -> String {
        CALLS.fetch_add(1, Ordering::SeqCst);
        format!("item-{}", n)
    }

    thread::spawn(|| {
        for n in 0..8 {
            label(n);
        }
    })
    .join()
    .unwrap();

    for n in 0..8 {
        assert_eq!(label(n), format!("item-{}", n));
    }
    assert_eq!(CALLS.load(Ordering::SeqCst), 8);
}

#[test]
fn test_capacity_holds_under_contention() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(capacity = 5)]
    fn negate(x: i64) -> i64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        -x
    }

    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..200 {
                    let x = (i * 7 + t) % 23;
                    assert_eq!(negate(x), -x);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    // Every distinct argument was computed at least once.
    assert!(CALLS.load(Ordering::SeqCst) >= 23);
}

#[test]
fn test_concurrent_failure_is_retried_by_waiter() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(capacity = 4)]
    fn fetch(id: u32) -> Result<u32, String> {
        let call = CALLS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        if call == 0 {
            Err("timeout".to_string())
        } else {
            Ok(id + 1000)
        }
    }

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                fetch(1)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    assert_eq!(
        results.iter().filter(|r| **r == Ok(1001)).count(),
        3
    );
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}
