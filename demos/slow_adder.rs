//! Replays a sequence of calls against two slow memoized functions.
//!
//! Run with `cargo run --example slow_adder`; set `RUST_LOG=recall_core=trace`
//! to see every hit and miss.

use std::thread::sleep;
use std::time::{Duration, Instant};

use recall::cache;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WORK: Duration = Duration::from_millis(500);

#[cache(capacity = 2)]
fn slow_adder(x: i32, y: i32) -> i32 {
    sleep(WORK);
    x + y
}

#[cache]
fn slow_multiplier(x: i32, y: i32) -> i32 {
    sleep(WORK);
    x * y
}

fn timed(name: &str, x: i32, y: i32, f: fn(i32, i32) -> i32) {
    let start = Instant::now();
    let result = f(x, y);
    info!(
        call = %format!("{}({}, {})", name, x, y),
        result,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "returned"
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recall_core=debug,slow_adder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    timed("slow_adder", 2, 5, slow_adder);
    timed("slow_adder", 3, 5, slow_adder);
    for _ in 0..7 {
        timed("slow_adder", 2, 5, slow_adder);
    }
    for _ in 0..4 {
        timed("slow_multiplier", 2, 5, slow_multiplier);
    }
    // (4, 5) evicts (2, 5), (5, 5) evicts (3, 5), the last call is a hit
    for (x, y) in [(2, 5), (3, 5), (4, 5), (5, 5), (4, 5)] {
        timed("slow_adder", x, y, slow_adder);
    }
}
