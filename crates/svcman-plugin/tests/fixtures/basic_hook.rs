//! Minimal hook plugin, compiled to a standalone cdylib by the build
//! script. Reports the hook it was invoked with through the environment
//! channel so tests can observe a full dispatch through a real artifact.

use std::fs::File;
use std::io::Write;
use std::mem::ManuallyDrop;
use std::os::fd::FromRawFd;
use std::os::raw::{c_char, c_int};

#[no_mangle]
pub extern "C" fn svcman_plugin_hook(hook: c_int, _value: *const c_char) -> c_int {
    let fd: i32 = match std::env::var("SVCMAN_ENVIRON_FD")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        Some(fd) => fd,
        None => return 1,
    };
    // The framework owns the descriptor; this handle must not close it.
    let mut file = ManuallyDrop::new(unsafe { File::from_raw_fd(fd) });
    let record = format!("DISCOVERY_HOOK={hook}\0");
    match file.write_all(record.as_bytes()).and_then(|_| file.flush()) {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
