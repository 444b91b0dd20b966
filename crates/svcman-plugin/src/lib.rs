//! # svcman-plugin
//!
//! Plugin-hook execution subsystem for svcman. Provides:
//!
//! - Plugin discovery and symbol resolution ([`registry::PluginRegistry`])
//! - Forked hook execution with pipe-based environment propagation
//!   ([`executor::PluginExecutor`])
//! - Signal-interruption-tolerant child reaping ([`reaper::ProcessReaper`])
//! - A streaming decoder for the environment-mutation protocol
//!   ([`envstream::EnvDecoder`])
//! - An execution-context token guarding against recursive plugin
//!   invocation ([`context::ExecContext`])
//!
//! Plugins are shared libraries exporting the `svcman_plugin_hook` entry
//! point; each hook runs in its own forked child so a misbehaving plugin
//! cannot crash the framework. Mutations a plugin writes to its channel are
//! applied to the parent's environment before the next plugin forks.

pub mod context;
pub mod envstream;
pub mod executor;
pub mod reaper;
pub mod registry;

mod signal;

pub use context::ExecContext;
pub use envstream::{EnvDecoder, EnvMutation};
pub use executor::PluginExecutor;
pub use reaper::ProcessReaper;
pub use registry::{HookFn, Plugin, PluginRegistry};
