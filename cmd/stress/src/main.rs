//! Stress test - many producers against a tiny queue
//!
//! Hammers a low-capacity wrapper to exercise backpressure: producers
//! block while the queue is full and the worker drains in batches.
//!
//! Usage: `stress [messages] [producers]`

use serialq::{QueueConfig, Serialized};
use std::thread;
use std::time::Instant;

const RECORD_LEN: usize = 11;

fn main() {
    println!("=== serialq Stress Test ===\n");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let messages: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);
    let producers: usize = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);

    println!(
        "Submitting {} messages from {} producers through a 5-slot queue...",
        messages, producers
    );

    let config = QueueConfig::new().capacity(5).notify_threshold(3);
    let sink = Serialized::with_config(String::new(), config).expect("valid config");

    let start = Instant::now();

    thread::scope(|scope| {
        for t in 0..producers {
            let sink = &sink;
            scope.spawn(move || {
                for i in (t..messages).step_by(producers) {
                    sink.submit(move |s| {
                        s.push_str("ta");
                        s.push_str("sk ");
                        s.push_str(&format!("{:>5}", i % 100_000));
                        s.push('\n');
                    })
                    .expect("wrapper is still open");
                }
            });
        }
    });

    let output = sink.into_inner();
    let elapsed = start.elapsed();

    assert_eq!(output.len(), RECORD_LEN * messages, "lost or corrupted records");
    for chunk in output.as_bytes().chunks(RECORD_LEN) {
        assert!(chunk.starts_with(b"task"), "corrupted record");
    }

    println!("All {} records intact", messages);
    println!(
        "Elapsed: {:?} ({:.0} tasks/sec)",
        elapsed,
        messages as f64 / elapsed.as_secs_f64()
    );
}
