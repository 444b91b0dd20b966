//! Helpers for the raw hook entry-point boundary.
//!
//! Plugins normally use [`svcman_plugin!`](crate::svcman_plugin) instead of
//! touching these directly.

use std::ffi::CStr;
use std::os::raw::c_char;

pub use svcman_core::hook::{ENVIRON_FD_VAR, PLUGIN_HOOK_SYMBOL};

/// Decodes the `value` argument handed to the raw entry point.
///
/// # Safety
/// `value` must be null or point to a NUL-terminated string valid for the
/// duration of the call.
pub unsafe fn value_arg(value: *const c_char) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn test_value_arg() {
        assert_eq!(unsafe { value_arg(ptr::null()) }, None);

        let value = CString::new("sshd").unwrap();
        assert_eq!(
            unsafe { value_arg(value.as_ptr()) },
            Some("sshd".to_string())
        );
    }
}
