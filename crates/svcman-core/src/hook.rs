//! Lifecycle hook vocabulary shared by the framework, the plugin loader,
//! and the plugin SDK.
//!
//! Plugins are shared libraries exporting one well-known entry point,
//! [`PLUGIN_HOOK_SYMBOL`], with the C signature
//! `int svcman_plugin_hook(int hook, const char *value)`. The hook kind
//! crosses that boundary as a raw `i32`; [`HookKind::from_raw`] recovers it
//! on the plugin side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the entry-point function every plugin module must export.
pub const PLUGIN_HOOK_SYMBOL: &[u8] = b"svcman_plugin_hook";

/// Environment variable through which a forked plugin receives the file
/// descriptor of its environment-mutation channel.
pub const ENVIRON_FD_VAR: &str = "SVCMAN_ENVIRON_FD";

/// Enumeration of the lifecycle moments plugins are invoked for.
///
/// The subsystem passes these through to each hook unchanged; their meaning
/// belongs to the service-lifecycle orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum HookKind {
    // ── Runlevel ──
    /// Fired when a runlevel change towards stop begins.
    RunlevelStopIn = 1,
    /// Fired when a runlevel change towards stop completes.
    RunlevelStopOut = 2,
    /// Fired when a runlevel change towards start begins.
    RunlevelStartIn = 3,
    /// Fired when a runlevel change towards start completes.
    RunlevelStartOut = 4,
    /// Fired when a runlevel change is aborted.
    Abort = 5,

    // ── Service ──
    /// Fired before a service begins stopping.
    ServiceStopIn = 101,
    /// Fired while a service is stopping.
    ServiceStopNow = 102,
    /// Fired once a service has stopped.
    ServiceStopDone = 103,
    /// Fired after stop processing for a service completes.
    ServiceStopOut = 104,
    /// Fired before a service begins starting.
    ServiceStartIn = 105,
    /// Fired while a service is starting.
    ServiceStartNow = 106,
    /// Fired once a service has started.
    ServiceStartDone = 107,
    /// Fired after start processing for a service completes.
    ServiceStartOut = 108,
}

impl HookKind {
    /// Returns the string name of this hook kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunlevelStopIn => "runlevel_stop_in",
            Self::RunlevelStopOut => "runlevel_stop_out",
            Self::RunlevelStartIn => "runlevel_start_in",
            Self::RunlevelStartOut => "runlevel_start_out",
            Self::Abort => "abort",
            Self::ServiceStopIn => "service_stop_in",
            Self::ServiceStopNow => "service_stop_now",
            Self::ServiceStopDone => "service_stop_done",
            Self::ServiceStopOut => "service_stop_out",
            Self::ServiceStartIn => "service_start_in",
            Self::ServiceStartNow => "service_start_now",
            Self::ServiceStartDone => "service_start_done",
            Self::ServiceStartOut => "service_start_out",
        }
    }

    /// Returns the raw value passed across the plugin ABI boundary.
    pub fn as_raw(&self) -> i32 {
        *self as i32
    }

    /// Recovers a hook kind from its raw ABI value.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::RunlevelStopIn),
            2 => Some(Self::RunlevelStopOut),
            3 => Some(Self::RunlevelStartIn),
            4 => Some(Self::RunlevelStartOut),
            5 => Some(Self::Abort),
            101 => Some(Self::ServiceStopIn),
            102 => Some(Self::ServiceStopNow),
            103 => Some(Self::ServiceStopDone),
            104 => Some(Self::ServiceStopOut),
            105 => Some(Self::ServiceStartIn),
            106 => Some(Self::ServiceStartNow),
            107 => Some(Self::ServiceStartDone),
            108 => Some(Self::ServiceStartOut),
            _ => None,
        }
    }

    /// All defined hook kinds, in declaration order.
    pub fn all() -> &'static [HookKind] {
        &[
            Self::RunlevelStopIn,
            Self::RunlevelStopOut,
            Self::RunlevelStartIn,
            Self::RunlevelStartOut,
            Self::Abort,
            Self::ServiceStopIn,
            Self::ServiceStopNow,
            Self::ServiceStopDone,
            Self::ServiceStopOut,
            Self::ServiceStartIn,
            Self::ServiceStartNow,
            Self::ServiceStartDone,
            Self::ServiceStartOut,
        ]
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown hook kind '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for kind in HookKind::all() {
            assert_eq!(HookKind::from_raw(kind.as_raw()), Some(*kind));
        }
        assert_eq!(HookKind::from_raw(0), None);
        assert_eq!(HookKind::from_raw(999), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "service_start_in".parse::<HookKind>().unwrap(),
            HookKind::ServiceStartIn
        );
        assert!("no_such_hook".parse::<HookKind>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for kind in HookKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
