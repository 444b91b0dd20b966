//! Execution-context token gating plugin discovery and dispatch.

use std::cell::Cell;

/// Marker for one plugin-execution context.
///
/// A plugin's hook may call back into framework APIs that would otherwise
/// trigger a fresh discovery scan or a fresh dispatch pass. Both
/// [`PluginRegistry::load`](crate::registry::PluginRegistry::load) and
/// [`PluginExecutor::run`](crate::executor::PluginExecutor::run) consult the
/// context they are handed and short-circuit when it is already inside a
/// plugin invocation.
///
/// The transition is one-way: there is no API to leave the in-plugin state.
/// The executor marks the context in the forked child, so the child process
/// can never recursively load or run plugins for the remainder of its life,
/// even if plugin code holds on to the context.
///
/// The context is confined to a single execution thread and is deliberately
/// not `Sync`; the registry, the environment channel, and the process
/// environment it guards share that confinement.
#[derive(Debug, Default)]
pub struct ExecContext {
    in_plugin: Cell<bool>,
}

impl ExecContext {
    /// Creates a context that is not inside any plugin invocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether this context is inside a plugin invocation.
    pub fn in_plugin(&self) -> bool {
        self.in_plugin.get()
    }

    /// Marks this context as executing inside a plugin. One-way.
    pub fn enter_plugin(&self) {
        self.in_plugin.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_is_one_way() {
        let ctx = ExecContext::new();
        assert!(!ctx.in_plugin());
        ctx.enter_plugin();
        assert!(ctx.in_plugin());
        ctx.enter_plugin();
        assert!(ctx.in_plugin());
    }
}
