//! Convenience macros for plugin development.

/// Emits the `svcman_plugin_hook` entry point from a plain Rust handler.
///
/// The handler has the signature
/// `fn(HookKind, Option<&str>) -> i32`; its return value becomes the
/// plugin child's exit status. An unrecognized raw hook value returns 1
/// without invoking the handler.
///
/// # Example
/// ```rust,ignore
/// fn my_hook(kind: HookKind, value: Option<&str>) -> i32 {
///     0
/// }
///
/// svcman_plugin!(my_hook);
/// ```
#[macro_export]
macro_rules! svcman_plugin {
    ($handler:path) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn svcman_plugin_hook(
            hook: ::std::os::raw::c_int,
            value: *const ::std::os::raw::c_char,
        ) -> ::std::os::raw::c_int {
            let Some(kind) = $crate::HookKind::from_raw(hook) else {
                return 1;
            };
            // SAFETY: the framework passes null or a NUL-terminated string.
            let value = unsafe { $crate::exports::value_arg(value) };
            let handler: fn($crate::HookKind, ::std::option::Option<&str>) -> i32 = $handler;
            handler(kind, value.as_deref())
        }
    };
}
