mod common;

use common::scratch_dir;
use dmxp_slotlog::Log::builder::log_file_path;
use dmxp_slotlog::Log::Structs::{LogLevel, LoggingIdentifier};
use dmxp_slotlog::Log::{Backend, BackendBuilder, DrainStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_many_producers_lose_nothing() {
    let producers = 4;
    let per_producer = 500;
    let dir = scratch_dir("stress");

    let backend = Arc::new(
        BackendBuilder::new()
            .with_number_of_slots(16)
            .with_slot_size_bytes(64)
            .with_limit_slots_in_one_cycle(4)
            .build_for_file(&dir, "STRS")
            .expect("backend"),
    );
    let retries = Arc::new(AtomicU64::new(0));
    let barrier = Arc::new(Barrier::new(producers));

    let handles: Vec<_> = (0..producers)
        .map(|id| {
            let backend = Arc::clone(&backend);
            let retries = Arc::clone(&retries);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for seq in 0..per_producer {
                    let slot = loop {
                        match backend.reserve_slot() {
                            Some(slot) => break slot,
                            None => {
                                retries.fetch_add(1, Ordering::Relaxed);
                                thread::yield_now();
                            }
                        }
                    };

                    let record = unsafe { backend.get_log_record(&slot) };
                    record.reset();
                    let entry = record.get_log_entry_mut();
                    entry.app_id = LoggingIdentifier::new("STRS");
                    entry.ctx_id = LoggingIdentifier::new(&format!("T{id}"));
                    entry.log_level = LogLevel::Info;
                    entry.num_of_args = 2;
                    record
                        .get_verbose_payload()
                        .put(format!("{id} {seq}").as_bytes());

                    if fastrand::u8(..) < 16 {
                        thread::yield_now();
                    }
                    backend.flush_slot(&slot);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }

    // Producers only drain a bounded number of slots per call; finish the rest.
    while backend.try_flush().expect("drain") != DrainStatus::AllDataProcessed {}
    assert_eq!(backend.allocator().get_used_count(), 0);
    println!("Reserve retries: {}", retries.load(Ordering::Relaxed));
    drop(backend);

    let contents = std::fs::read_to_string(log_file_path(&dir, "STRS")).expect("log file");
    let mut next_expected: HashMap<usize, usize> = HashMap::new();
    let mut lines = 0;
    for line in contents.lines() {
        let payload = line
            .split(" verbose 2 ")
            .nth(1)
            .unwrap_or_else(|| panic!("malformed line: {line}"));
        let mut fields = payload.split(' ');
        let id: usize = fields.next().and_then(|s| s.parse().ok()).expect("producer id");
        let seq: usize = fields.next().and_then(|s| s.parse().ok()).expect("sequence");

        // Each producer's records come out in the order it flushed them.
        let expected = next_expected.entry(id).or_insert(0);
        assert_eq!(seq, *expected, "producer {id} out of order");
        *expected += 1;
        lines += 1;
    }

    assert_eq!(lines, producers * per_producer);
    for id in 0..producers {
        assert_eq!(next_expected.get(&id), Some(&per_producer));
    }

    std::fs::remove_dir_all(&dir).expect("cleanup");
}
