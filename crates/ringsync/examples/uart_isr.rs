//! UART receive path: an "interrupt handler" thread feeds bytes into a ring
//! and the main loop pulls complete lines out.
//!
//! On a microcontroller the producer would be the RX interrupt and the ring
//! would live in a `static`; here a thread stands in for the interrupt.
//!
//! Run with: cargo run --example uart_isr

use ringsync_rs::{RingBuffer, StrategyKind};
use std::thread;
use std::time::Duration;

const TRAFFIC: &[&[u8]] = &[
    b"AT\r\n",
    b"OK\r\n",
    b"+CSQ: 23,99\r\n",
    b"+CREG: 0,1\r\n",
    b"OK\r\n",
];

fn main() {
    println!("=== UART receive ring ===\n");

    for kind in [StrategyKind::LockFree, StrategyKind::IrqMasked] {
        run(kind);
    }
}

fn run(kind: StrategyKind) {
    // Small on purpose so the producer sometimes finds the ring full
    let mut storage = [0u8; 16];
    let rb: RingBuffer = match RingBuffer::with_strategy(&mut storage, kind) {
        Ok(rb) => rb,
        Err(e) => {
            eprintln!("{kind:?}: {e}");
            return;
        }
    };
    println!("{:?} (usable capacity {})", kind, rb.usable_capacity());

    let total: usize = TRAFFIC.iter().map(|line| line.len()).sum();
    let mut dropped = 0;

    thread::scope(|s| {
        // "RX interrupt": one byte per interrupt, no waiting when full
        let isr = s.spawn(|| {
            let mut lost = 0;
            for &byte in TRAFFIC.iter().flat_map(|line| line.iter()) {
                if !rb.write(byte) {
                    lost += 1;
                }
                thread::sleep(Duration::from_micros(50));
            }
            lost
        });

        // Main loop: assemble lines
        let mut line = Vec::new();
        let mut seen = 0;
        let mut chunk = [0u8; 8];
        while !isr.is_finished() || !rb.is_empty() {
            let n = rb.read_many(&mut chunk);
            for &byte in &chunk[..n] {
                seen += 1;
                line.push(byte);
                if byte == b'\n' {
                    println!("   <- {}", String::from_utf8_lossy(&line).trim_end());
                    line.clear();
                }
            }
            if n == 0 {
                thread::yield_now();
            }
        }

        dropped = isr.join().unwrap_or(0);
        assert_eq!(seen + dropped, total);
    });

    println!("   {} bytes received, {} dropped on overflow\n", total - dropped, dropped);
}
