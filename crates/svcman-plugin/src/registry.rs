//! Plugin discovery and registry.
//!
//! The registry scans one fixed directory for shared libraries, resolves
//! the well-known hook export in each, and keeps the loaded handles in
//! directory-iteration order. That order is the hook-execution order.

use std::fs;
use std::path::PathBuf;

use libloading::Library;
use tracing::{debug, error, info};

use svcman_core::AppResult;
use svcman_core::hook::PLUGIN_HOOK_SYMBOL;

use crate::context::ExecContext;

/// Signature of the resolved plugin entry point.
///
/// See [`PLUGIN_HOOK_SYMBOL`]; `value` may be null.
pub type HookFn = unsafe extern "C" fn(
    hook: std::os::raw::c_int,
    value: *const std::os::raw::c_char,
) -> std::os::raw::c_int;

/// One loaded plugin module.
///
/// The registry entry is the sole owner of the library handle; dropping the
/// entry releases it exactly once. The handle is never absent while the
/// entry exists; the hook may be, and such entries are skipped at run time.
#[derive(Debug)]
pub struct Plugin {
    /// Discovery-relative identifier (the directory entry name).
    name: String,
    /// Loaded module handle, kept alive for the lifetime of the entry.
    _library: Library,
    /// Entry point resolved at load time; absent entries are skipped at
    /// run time without consuming process resources.
    hook: Option<HookFn>,
}

impl Plugin {
    /// Returns the plugin's discovery-relative name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether this plugin has a callable hook.
    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub(crate) fn hook(&self) -> Option<HookFn> {
        self.hook
    }
}

/// Ordered collection of successfully loaded plugins.
#[derive(Debug)]
pub struct PluginRegistry {
    /// Directory scanned for plugin shared libraries.
    directory: PathBuf,
    /// Loaded plugins, in discovery order.
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    /// Creates an empty registry scanning the given directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            plugins: Vec::new(),
        }
    }

    /// Discovers and loads every plugin in the registry's directory.
    ///
    /// Starts from a clean slate: any previously loaded plugins are
    /// released first. Hidden entries (name starting with `.`) are
    /// ignored. An entry that fails to open, or that lacks the
    /// [`PLUGIN_HOOK_SYMBOL`] export, is logged and skipped; the scan
    /// continues. A missing plugin directory leaves the registry empty.
    ///
    /// No-op when `ctx` is already inside a plugin invocation.
    pub fn load(&mut self, ctx: &ExecContext) -> AppResult<()> {
        if ctx.in_plugin() {
            return Ok(());
        }

        self.unload();

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    directory = %self.directory.display(),
                    error = %e,
                    "Plugin directory not readable, nothing to load"
                );
                return Ok(());
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!(
                        directory = %self.directory.display(),
                        error = %e,
                        "Failed to read plugin directory entry"
                    );
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            // SAFETY: loading a shared library runs its initializers; plugin
            // directories are trusted framework configuration.
            let library = match unsafe { Library::new(&path) } {
                Ok(library) => library,
                Err(e) => {
                    error!(plugin = %name, error = %e, "Failed to open plugin module");
                    continue;
                }
            };

            // SAFETY: the symbol is declared with the fixed HookFn ABI every
            // plugin must export under this name.
            let hook = match unsafe { library.get::<HookFn>(PLUGIN_HOOK_SYMBOL) } {
                Ok(symbol) => *symbol,
                Err(e) => {
                    // Dropping `library` releases the handle.
                    error!(plugin = %name, error = %e, "Plugin lacks hook entry point");
                    continue;
                }
            };

            debug!(plugin = %name, "Plugin loaded");
            self.plugins.push(Plugin {
                name,
                _library: library,
                hook: Some(hook),
            });
        }

        info!(
            directory = %self.directory.display(),
            count = self.plugins.len(),
            "Plugin registry loaded"
        );
        Ok(())
    }

    /// Releases every plugin handle and empties the registry.
    ///
    /// Safe to call on an empty registry; handles are never released twice.
    pub fn unload(&mut self) {
        if !self.plugins.is_empty() {
            info!(count = self.plugins.len(), "Unloading plugins");
        }
        self.plugins.clear();
    }

    /// Iterates the loaded plugins in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter()
    }

    /// Number of loaded plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns whether the registry holds no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
impl Plugin {
    /// Builds an entry backed by the running program's own module handle,
    /// so executor and registry tests can exercise the dispatch protocol
    /// without a plugin artifact on disk.
    pub(crate) fn stub(name: &str, hook: Option<HookFn>) -> Self {
        Self {
            name: name.to_string(),
            _library: libloading::os::unix::Library::this().into(),
            hook,
        }
    }
}

#[cfg(test)]
impl PluginRegistry {
    pub(crate) fn push_stub(&mut self, plugin: Plugin) {
        self.plugins.push(plugin);
    }
}
