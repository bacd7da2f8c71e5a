//! Feeding one bar from many threads.
//!
//! `Bar` does no locking of its own, so it's wrapped in the usual sharing
//! types and each worker takes the lock to report its progress.

use linebar::Bar;
use rand::Rng;
use rayon::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const JOBS: u64 = 1234;

fn main() -> Result<(), linebar::Error> {
    simple_logger::init_with_level(log::Level::Debug).ok();

    println!("Starting workers...");

    let bar = Bar::new(0, JOBS, "Processing", "Complete!")?;
    let bar = Arc::new(Mutex::new(bar));

    (0..JOBS).into_par_iter().for_each_with(bar, |b, _| {
        // Simulate some work of varying length.
        let wait = rand::thread_rng().gen_range(1..=10);
        std::thread::sleep(Duration::from_millis(wait));

        if let Ok(mut bar) = b.lock() {
            bar.inc(1);
        }
    });

    Ok(())
}
