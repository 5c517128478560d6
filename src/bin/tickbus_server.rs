// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Standalone time server process.
//
// Usage:
//   tickbus-server <base_name> <expected_participants> <tick_increment_ns>
//
// Binds the broadcast and request/reply channels under <base_name>,
// waits for <expected_participants> clients to complete the `READY`
// handshake, then runs the tick barrier loop until killed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tickbus::{ServerConfig, TimeServer};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: tickbus-server <base_name> <expected_participants> <tick_increment_ns>");
        std::process::exit(1);
    }
    let base = &args[1];
    let expected_participants: usize = args[2].parse().expect("expected_participants");
    let tick_increment_ns: u64 = args[3].parse().expect("tick_increment_ns");

    let config = ServerConfig::new(expected_participants, tick_increment_ns)
        .expect("invalid server configuration");
    let mut server = TimeServer::bind(base, config).expect("bind server channels");

    let quit = Arc::new(AtomicBool::new(false));
    let shutdown_flag = server.shutdown_flag();
    {
        let quit = Arc::clone(&quit);
        ctrlc_or_sigterm(move || quit.store(true, Ordering::Release));
    }
    std::thread::spawn(move || loop {
        if quit.load(Ordering::Acquire) {
            shutdown_flag.signal();
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    println!("tickbus-server: waiting for {expected_participants} participant(s) on {base:?}");
    if let Err(e) = server.run() {
        eprintln!("tickbus-server: fatal error: {e}");
        std::process::exit(1);
    }
}

// Minimal cross-platform signal hook: sets the flag on SIGINT / SIGTERM.
fn ctrlc_or_sigterm(f: impl Fn() + Send + 'static) {
    #[cfg(unix)]
    {
        use std::sync::Mutex;
        static CB: std::sync::OnceLock<Mutex<Box<dyn Fn() + Send>>> = std::sync::OnceLock::new();
        CB.get_or_init(|| Mutex::new(Box::new(f)));
        extern "C" fn handler(_: libc::c_int) {
            if let Some(cb) = CB.get() {
                if let Ok(g) = cb.lock() {
                    g();
                }
            }
        }
        unsafe {
            libc::signal(libc::SIGINT, handler as *const () as libc::sighandler_t);
            libc::signal(libc::SIGTERM, handler as *const () as libc::sighandler_t);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = f;
    }
}

#[cfg(unix)]
extern crate libc;
