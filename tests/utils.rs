use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tally::prelude::*;
use tally::{CalendargramPeriod, Decimal, StatsdClient};

pub const NUM_THREADS: u64 = 10;
pub const NUM_ITERATIONS: u64 = 1_000;

/// Number of metrics sent for every iteration of `run_arc_threaded_test`
#[allow(dead_code)]
pub const LINES_PER_ITERATION: u64 = 8;

#[allow(dead_code)]
pub fn run_arc_threaded_test(client: StatsdClient, num_threads: u64, iterations: u64) {
    let shared_client = Arc::new(client);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_client = Arc::clone(&shared_client);

            thread::spawn(move || {
                for i in 0..iterations {
                    local_client.count("some.counter", i as i64).unwrap();
                    local_client.time("some.timer", i).unwrap();
                    local_client.gauge("some.gauge", i).unwrap();
                    local_client.gauge("some.gauge", i as f64).unwrap();
                    local_client.gauge("some.gauge", Decimal::new(i as i128, 2)).unwrap();
                    local_client.set("some.set", i as i64).unwrap();
                    local_client.raw("some.raw", i as i64, Some(1466021000)).unwrap();
                    local_client
                        .calendargram("some.calendargram", i as i64, CalendargramPeriod::Hour)
                        .unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }
}

/// Random dotted metric name made of one to four alphanumeric segments
#[allow(dead_code)]
pub fn random_name<R: Rng>(rng: &mut R) -> String {
    let segments = rng.gen_range(1..=4);
    (0..segments)
        .map(|_| {
            let len = rng.gen_range(1..=12);
            (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}
