use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tally::prelude::*;
use tally::{ConnectionType, ErrorKind, NullTransport, SpyTransport, StatsdClient, DEFAULT_PORT};

mod utils;
use utils::{random_name, run_arc_threaded_test, LINES_PER_ITERATION, NUM_ITERATIONS, NUM_THREADS};

const UNRESOLVABLE_HOST: &str = "nowhere.here.or.anywhere.invalid";

fn new_nop_client(prefix: &str) -> StatsdClient {
    StatsdClient::from_transport(prefix, NullTransport)
}

#[test]
fn test_statsd_client_random_names_and_values() {
    let mut rng = rand::thread_rng();
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("random.", transport);

    for _ in 0..100 {
        let name = random_name(&mut rng);
        let value: i64 = rng.gen_range(0..1_000_000);

        client.count(&name, value).unwrap();

        let sent = String::from_utf8(rx.try_recv().unwrap()).unwrap();
        assert_eq!(format!("random.{}:{}|c", name, value), sent);
    }
}

#[test]
fn test_statsd_client_random_negative_values_never_sent() {
    let mut rng = rand::thread_rng();
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("", transport);

    for _ in 0..100 {
        let name = random_name(&mut rng);
        let value: i64 = rng.gen_range(-1_000_000..0);

        let res = client.count(&name, value);
        assert_eq!(ErrorKind::InvalidArgument, res.unwrap_err().kind());
    }

    assert!(rx.is_empty());
}

#[test]
fn test_statsd_client_unresolvable_host_falls_back() {
    let warned = Arc::new(AtomicUsize::new(0));
    let warned_ref = Arc::clone(&warned);

    let client = StatsdClient::builder(UNRESOLVABLE_HOST, DEFAULT_PORT)
        .prefix("fallback")
        .with_warn_sink(move |_: &str| {
            warned_ref.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    client.incr("some.counter").unwrap();
    client.gauge("some.gauge", 1.5).unwrap();

    assert_eq!(1, warned.load(Ordering::SeqCst));
    assert_eq!(0, client.stats().lines_sent);
}

#[test]
fn test_statsd_client_new_unresolvable_host() {
    let client = StatsdClient::new(UNRESOLVABLE_HOST, DEFAULT_PORT);
    client.incr("some.counter").unwrap();
}

#[test]
fn test_statsd_client_strict_unresolvable_host() {
    let res = StatsdClient::builder(UNRESOLVABLE_HOST, DEFAULT_PORT)
        .strict(true)
        .build();

    assert_eq!(ErrorKind::TransportInit, res.unwrap_err().kind());
}

#[test]
fn test_statsd_client_tcp_construction_is_lazy() {
    // Nothing is resolved until the first metric is sent over TCP
    let client = StatsdClient::builder(UNRESOLVABLE_HOST, DEFAULT_PORT)
        .connection(ConnectionType::Tcp)
        .strict(true)
        .build();

    assert!(client.is_ok());
}

#[test]
fn test_statsd_client_nop_transport_single_threaded() {
    let client = new_nop_client("tally");
    run_arc_threaded_test(client, 1, 1);
}

#[test]
fn test_statsd_client_spy_transport_counts_lines() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("tally", transport);
    run_arc_threaded_test(client, 2, 3);

    assert_eq!((2 * 3 * LINES_PER_ITERATION) as usize, rx.len());
}

#[ignore]
#[test]
fn test_statsd_client_nop_transport_many_threaded() {
    let client = new_nop_client("tally");
    run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);
}
