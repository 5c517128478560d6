// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Standalone time client process.
//
// Usage:
//   tickbus-client <base_name> <id> <rate_ns>
//
// Connects to a running tickbus-server under <base_name>, completes the
// handshake as <id>, then prints every tick it observes and acknowledges
// it back to the server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tickbus::{ClientConfig, TimeClient};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: tickbus-client <base_name> <id> <rate_ns>");
        std::process::exit(1);
    }
    let base = &args[1];
    let id = args[2].as_bytes();
    let rate_ns: u64 = args[3].parse().expect("rate_ns");

    let config = ClientConfig::new(id, rate_ns).expect("invalid client configuration");
    let mut client = match TimeClient::connect(base, config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("tickbus-client: handshake failed: {e}");
            std::process::exit(1);
        }
    };

    let quit = Arc::new(AtomicBool::new(false));
    let shutdown_flag = client.shutdown_flag();
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

    println!("tickbus-client: handshake complete, entering tick loop");
    let result = client.run_loop(|t| {
        println!("tick: {t}");
    });
    if let Err(e) = result {
        eprintln!("tickbus-client: exiting: {e}");
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
