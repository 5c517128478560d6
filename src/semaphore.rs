// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named counting semaphore, Windows only. Used by `IpcCondition`'s
// Windows emulation (semaphore + mutex + shared counter), which has no
// pthread_cond_t equivalent to lean on.

#![cfg(windows)]

use std::io;
use std::ptr;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT};
use windows_sys::Win32::System::Threading::{CreateSemaphoreW, ReleaseSemaphore, WaitForSingleObject};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub struct IpcSemaphore {
    handle: HANDLE,
}

unsafe impl Send for IpcSemaphore {}
unsafe impl Sync for IpcSemaphore {}

impl IpcSemaphore {
    pub fn open(name: &str, initial_count: i32) -> io::Result<Self> {
        let wide_name = to_wide(name);
        let handle = unsafe {
            CreateSemaphoreW(ptr::null(), initial_count, i32::MAX, wide_name.as_ptr())
        };
        if handle == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { handle })
    }

    /// Wait for a token. `None` blocks indefinitely; `Some(ms)` returns
    /// `Ok(false)` on timeout instead of blocking forever.
    pub fn wait(&self, timeout_ms: Option<u64>) -> io::Result<bool> {
        let millis = match timeout_ms {
            None => u32::MAX, // INFINITE
            Some(ms) => ms.min(u32::MAX as u64 - 1) as u32,
        };
        let ret = unsafe { WaitForSingleObject(self.handle, millis) };
        match ret {
            WAIT_OBJECT_0 => Ok(true),
            WAIT_TIMEOUT => Ok(false),
            _ => Err(io::Error::last_os_error()),
        }
    }

    pub fn post(&self, count: u32) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        let ok = unsafe { ReleaseSemaphore(self.handle, count as i32, ptr::null_mut()) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for IpcSemaphore {
    fn drop(&mut self) {
        if self.handle != 0 {
            unsafe { CloseHandle(self.handle) };
        }
    }
}
