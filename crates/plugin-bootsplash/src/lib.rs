//! Sample plugin: mirrors service start/stop progress into `SPLASH_*`
//! environment variables, the way a boot-splash frontend would consume it.
//!
//! Install the built `cdylib` into the framework's plugin directory.

use svcman_plugin_sdk::prelude::*;

fn bootsplash_hook(kind: HookKind, value: Option<&str>) -> i32 {
    let Some(mut channel) = EnvChannel::from_env() else {
        // Not running under a hook invocation; nothing to report.
        return 0;
    };

    let service = value.unwrap_or("");
    let result = match kind {
        HookKind::ServiceStartIn => channel
            .set("SPLASH_SVC", service)
            .and_then(|_| channel.set("SPLASH_MODE", "start")),
        HookKind::ServiceStopIn => channel
            .set("SPLASH_SVC", service)
            .and_then(|_| channel.set("SPLASH_MODE", "stop")),
        HookKind::ServiceStartDone | HookKind::ServiceStopDone => channel
            .unset("SPLASH_SVC")
            .and_then(|_| channel.unset("SPLASH_MODE")),
        _ => Ok(()),
    };

    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

svcman_plugin!(bootsplash_hook);
