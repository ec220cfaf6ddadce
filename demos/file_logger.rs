// In demos/file_logger.rs
//
//   cargo run --example file_logger -- /tmp/logs APP0
//   cargo run --example file_logger -- /tmp/logs APP0 --count 1000
use dmxp_slotlog::Log::Structs::{LogLevel, LoggingIdentifier};
use dmxp_slotlog::Log::{Backend, BackendBuilder, DrainStatus};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const LEVELS: [LogLevel; 4] = [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug];

fn main() -> dmxp_slotlog::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <directory> [app_id] [--count <n>]", args[0]);
        std::process::exit(1);
    }

    let directory = PathBuf::from(&args[1]);
    let app_id = args.get(2).filter(|a| !a.starts_with("--")).cloned().unwrap_or_else(|| "DEMO".to_owned());
    let count: Option<u64> = args
        .iter()
        .position(|a| a == "--count")
        .and_then(|i| args.get(i + 1))
        .and_then(|n| n.parse().ok());

    let backend = BackendBuilder::new()
        .with_number_of_slots(16)
        .with_ecu_id("ECU1")
        .build_for_file(&directory, &app_id)?;

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);

    // Handle Ctrl+C to stop cleanly
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!(
        "File logger: writing to {} (Ctrl+C to stop)",
        dmxp_slotlog::Log::builder::log_file_path(&directory, &app_id).display()
    );

    let start = Instant::now();
    let mut written = 0u64;
    let mut dropped = 0u64;

    while running.load(Ordering::SeqCst) && count.map_or(true, |n| written < n) {
        let Some(slot) = backend.reserve_slot() else {
            dropped += 1;
            std::thread::sleep(Duration::from_micros(50));
            continue;
        };

        let record = unsafe { backend.get_log_record(&slot) };
        record.reset();
        let entry = record.get_log_entry_mut();
        entry.app_id = LoggingIdentifier::new(&app_id);
        entry.ctx_id = LoggingIdentifier::new("MAIN");
        entry.log_level = LEVELS[(written % LEVELS.len() as u64) as usize];
        entry.num_of_args = 1;
        entry.timestamp_ns = start.elapsed().as_nanos() as u64;
        record
            .get_verbose_payload()
            .put(format!("message {written}").as_bytes());
        backend.flush_slot(&slot);

        written += 1;
        if written % 1000 == 0 {
            println!("Logged {} messages", written);
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    while backend.try_flush()? != DrainStatus::AllDataProcessed {}
    println!(
        "File logger: {} messages written, {} reserve attempts found the ring full, {:.2?} elapsed",
        written,
        dropped,
        start.elapsed()
    );

    Ok(())
}
