//! Forked hook dispatch with pipe-based environment propagation.
//!
//! Each plugin's hook runs in its own forked child so the framework is
//! never crashed or blocked by plugin code sharing its address space.
//! The child receives the write end of a pipe through the
//! `SVCMAN_ENVIRON_FD` environment variable; records it writes there are
//! decoded and applied to the parent's environment while the child runs.
//!
//! Execution across plugins is strictly sequential: plugin N's mutations
//! are fully applied before plugin N+1 is forked, so a later plugin may
//! depend on an earlier one's environment changes. A hook that never
//! returns hangs the dispatch; there is no timeout.

use std::ffi::CString;
use std::fs::File;
use std::io::Read;
use std::os::fd::AsRawFd;
use std::process;
use std::ptr;

use nix::fcntl::OFlag;
use nix::unistd::{ForkResult, fork, pipe2};
use tracing::{debug, error, warn};

use svcman_core::hook::ENVIRON_FD_VAR;
use svcman_core::{AppError, AppResult, HookKind};

use crate::context::ExecContext;
use crate::envstream::{EnvDecoder, EnvMutation};
use crate::reaper::ProcessReaper;
use crate::registry::PluginRegistry;
use crate::signal::{BlockedSignals, reset_child_dispositions};

const READ_CHUNK: usize = 4096;

/// Drives hook dispatch across a loaded registry.
#[derive(Debug, Default)]
pub struct PluginExecutor;

impl PluginExecutor {
    /// Creates a new executor.
    pub fn new() -> Self {
        Self
    }

    /// Invokes every registered plugin's hook with `(hook, value)`, in
    /// registry order, one forked child at a time.
    ///
    /// A plugin's exit status is observed for diagnostics only and never
    /// aborts the remaining sequence. Fork failure does: the execution
    /// primitive itself is unusable, so the not-yet-run plugins are
    /// abandoned and an error returned.
    ///
    /// No-op when `ctx` is already inside a plugin invocation.
    pub fn run(
        &self,
        registry: &PluginRegistry,
        ctx: &ExecContext,
        hook: HookKind,
        value: Option<&str>,
    ) -> AppResult<()> {
        if ctx.in_plugin() {
            return Ok(());
        }

        let c_value = value
            .map(CString::new)
            .transpose()
            .map_err(|_| AppError::validation("Hook value contains an interior NUL byte"))?;

        for plugin in registry.iter() {
            let Some(hook_fn) = plugin.hook() else {
                debug!(plugin = %plugin.name(), "No hook entry point, skipping");
                continue;
            };

            // Close-on-exec so neither end leaks into subprocesses the
            // plugin spawns or scripts inheriting the mutated environment.
            let (read_fd, write_fd) = pipe2(OFlag::O_CLOEXEC).map_err(|e| {
                error!(error = %e, "Failed to create environment pipe");
                AppError::process(format!("pipe: {e}"))
            })?;

            // Held across fork; dropped on every path below.
            let guard = BlockedSignals::block_all()?;

            // SAFETY: the parent is single-threaded while dispatching; the
            // child only resets signals, runs the hook, and exits.
            match unsafe { fork() } {
                Err(e) => {
                    drop(guard);
                    error!(error = %e, "Fork failed, aborting plugin dispatch");
                    return Err(AppError::process(format!("fork: {e}")));
                }
                Ok(ForkResult::Child) => {
                    reset_child_dispositions();
                    drop(guard);

                    // Permanent for this process: the child must never
                    // recursively trigger plugin loading or execution.
                    ctx.enter_plugin();

                    drop(read_fd);
                    // SAFETY: the child is single-threaded and the hook has
                    // not run yet.
                    unsafe {
                        std::env::set_var(ENVIRON_FD_VAR, write_fd.as_raw_fd().to_string());
                    }

                    let value_ptr = c_value.as_ref().map_or(ptr::null(), |v| v.as_ptr());
                    // SAFETY: resolved at load time against the fixed plugin
                    // ABI; the value pointer is null or NUL-terminated and
                    // outlives the call.
                    let status = unsafe { hook_fn(hook.as_raw(), value_ptr) };

                    drop(write_fd);
                    process::exit(status);
                }
                Ok(ForkResult::Parent { child }) => {
                    drop(guard);
                    drop(write_fd);

                    let mut stream = File::from(read_fd);
                    let mut decoder = EnvDecoder::new();
                    let mut chunk = [0u8; READ_CHUNK];
                    loop {
                        match stream.read(&mut chunk) {
                            Ok(0) => break,
                            Ok(n) => {
                                for mutation in decoder.feed(&chunk[..n]) {
                                    apply_mutation(&mutation);
                                }
                            }
                            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                            Err(e) => {
                                error!(
                                    plugin = %plugin.name(),
                                    error = %e,
                                    "Environment pipe read failed"
                                );
                                break;
                            }
                        }
                    }
                    if decoder.pending() > 0 {
                        warn!(
                            plugin = %plugin.name(),
                            bytes = decoder.pending(),
                            "Discarding unterminated environment record"
                        );
                    }
                    drop(stream);

                    match ProcessReaper::wait_for(child) {
                        Some(0) => debug!(plugin = %plugin.name(), "Plugin hook completed"),
                        Some(code) => warn!(
                            plugin = %plugin.name(),
                            code,
                            "Plugin hook exited with non-zero status"
                        ),
                        None => warn!(plugin = %plugin.name(), "Failed to reap plugin child"),
                    }
                }
            }
        }

        Ok(())
    }
}

/// Applies one decoded mutation to the process environment: unset first,
/// then set if a value was supplied.
fn apply_mutation(mutation: &EnvMutation) {
    // SAFETY: the environment is confined to this single-threaded execution
    // context while dispatch runs.
    unsafe {
        std::env::remove_var(&mutation.key);
        if let Some(value) = &mutation.value {
            std::env::set_var(&mutation.key, value);
        }
    }
}
