//! # svcman-plugin-sdk
//!
//! SDK for developing svcman hook plugins.
//!
//! A plugin is a shared library exporting one entry point,
//! `svcman_plugin_hook`. The [`svcman_plugin!`] macro emits it from a plain
//! Rust handler; [`channel::EnvChannel`] gives the handler a writer for the
//! environment-mutation protocol.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use svcman_plugin_sdk::prelude::*;
//!
//! fn my_hook(kind: HookKind, value: Option<&str>) -> i32 {
//!     if kind == HookKind::ServiceStartDone
//!         && let Some(mut channel) = EnvChannel::from_env()
//!     {
//!         let _ = channel.set("LAST_STARTED", value.unwrap_or(""));
//!     }
//!     0
//! }
//!
//! svcman_plugin!(my_hook);
//! ```
//!
//! Build with `crate-type = ["cdylib"]` and install the library into the
//! framework's plugin directory.

pub mod channel;
pub mod exports;
pub mod macros;

/// Prelude for convenient imports.
pub mod prelude {
    pub use svcman_core::HookKind;

    pub use crate::channel::EnvChannel;
    pub use crate::svcman_plugin;
}

pub use svcman_core::HookKind;
