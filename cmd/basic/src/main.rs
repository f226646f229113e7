//! Basic serialq example
//!
//! Wraps a plain `String` sink and writes to it from several producer
//! threads without any caller-side locking.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=serialq=debug` - Show worker lifecycle events
//! - `SERIALQ_CAPACITY` / `SERIALQ_NOTIFY_THRESHOLD` - Queue tuning

use serialq::{EstimateMemory, MemoryNode, QueueConfig, Serialized};
use std::thread;

// RUST_LOG=serialq=debug cargo run -p serialq-basic
fn main() {
    println!("=== serialq Basic Example ===\n");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = QueueConfig::from_env();
    println!(
        "queue: capacity={} notify_threshold={}\n",
        config.capacity, config.notify_threshold
    );

    let sink = Serialized::with_config(String::new(), config).expect("valid config");

    thread::scope(|scope| {
        for producer in 0..4 {
            let sink = &sink;
            scope.spawn(move || {
                for i in 0..5 {
                    sink.submit(move |s| {
                        s.push_str(&format!("producer {} message {}\n", producer, i));
                    })
                    .expect("wrapper is still open");
                }
            });
        }
    });

    let mut report = MemoryNode::root("process");
    sink.describe_memory(report.add_child("wrapped sink"));
    println!("memory usage: {} bytes", sink.memory_usage());
    print!("{}", report);

    let output = sink.into_inner();
    println!("\ncollected {} lines:", output.lines().count());
    print!("{}", output);
}
