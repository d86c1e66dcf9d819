//! Interactive greeting against the real console.
//!
//! Run with: cargo run --example echo --features tracing

use tidepool::console::{echo, LiveConsole};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .init();

    match echo().provide(&LiveConsole) {
        Ok(_) => {}
        Err(fault) => eprintln!("echo failed: {}", fault),
    }
}
