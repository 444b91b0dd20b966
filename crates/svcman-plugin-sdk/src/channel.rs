//! Writer for the environment-mutation protocol.

use std::fs::File;
use std::io::{self, Write};
use std::mem::ManuallyDrop;
use std::os::fd::{FromRawFd, RawFd};

use svcman_core::hook::ENVIRON_FD_VAR;

/// A plugin's channel for requesting environment mutations in its parent.
///
/// The framework hands the channel descriptor to a forked plugin through
/// the `SVCMAN_ENVIRON_FD` environment variable. Records written here are
/// applied by the parent while the hook runs, in order, so an assignment
/// made early in a hook is visible to plugins invoked later.
///
/// The framework owns the descriptor and closes it when the hook returns;
/// dropping an `EnvChannel` does not close it.
#[derive(Debug)]
pub struct EnvChannel {
    file: ManuallyDrop<File>,
}

impl EnvChannel {
    /// Opens the channel advertised by the framework, if any.
    ///
    /// Returns `None` when not running under a svcman hook invocation.
    /// Call this from the hook process itself: subprocesses the hook
    /// spawns inherit the variable, but the descriptor it names is
    /// close-on-exec and no longer open there, so a channel built from it
    /// would write to a dead or unrelated descriptor.
    pub fn from_env() -> Option<Self> {
        let fd: RawFd = std::env::var(ENVIRON_FD_VAR).ok()?.parse().ok()?;
        // SAFETY: the framework guarantees the advertised fd is open for
        // writing for the duration of the hook; ManuallyDrop leaves
        // ownership with the framework.
        Some(unsafe { Self::from_raw_fd(fd) })
    }

    /// Wraps an already-open channel descriptor without taking ownership.
    ///
    /// # Safety
    /// `fd` must be open for writing and must outlive the channel.
    pub unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self {
            file: ManuallyDrop::new(unsafe { File::from_raw_fd(fd) }),
        }
    }

    /// Asks the parent to set `key` to `value`.
    pub fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        validate_key(key)?;
        if value.as_bytes().contains(&0) {
            return Err(invalid("environment value contains a NUL byte"));
        }
        self.file
            .write_all(format!("{key}={value}\0").as_bytes())?;
        self.file.flush()
    }

    /// Asks the parent to unset `key`.
    pub fn unset(&mut self, key: &str) -> io::Result<()> {
        validate_key(key)?;
        self.file.write_all(format!("{key}=\0").as_bytes())?;
        self.file.flush()
    }
}

fn validate_key(key: &str) -> io::Result<()> {
    if key.is_empty() {
        return Err(invalid("environment key is empty"));
    }
    if key.as_bytes().iter().any(|b| *b == b'=' || *b == 0) {
        return Err(invalid("environment key contains '=' or NUL"));
    }
    Ok(())
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};
    use std::os::fd::AsRawFd;

    #[test]
    fn test_record_byte_format() {
        let mut backing = tempfile::tempfile().unwrap();
        let mut channel = unsafe { EnvChannel::from_raw_fd(backing.as_raw_fd()) };

        channel.set("FOO", "bar").unwrap();
        channel.unset("GONE").unwrap();
        drop(channel); // must not close the descriptor

        let mut written = Vec::new();
        backing.seek(SeekFrom::Start(0)).unwrap();
        backing.read_to_end(&mut written).unwrap();
        assert_eq!(written, b"FOO=bar\0GONE=\0");
    }

    #[test]
    fn test_invalid_keys_and_values_rejected() {
        let backing = tempfile::tempfile().unwrap();
        let mut channel = unsafe { EnvChannel::from_raw_fd(backing.as_raw_fd()) };

        assert!(channel.set("", "x").is_err());
        assert!(channel.set("A=B", "x").is_err());
        assert!(channel.set("OK", "has\0nul").is_err());
        assert!(channel.unset("A=B").is_err());
    }
}
