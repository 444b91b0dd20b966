//! # svcman-core
//!
//! Core crate for svcman. Contains configuration schemas, the shared hook
//! vocabulary (lifecycle events and the plugin ABI constants), and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other svcman crates.

pub mod config;
pub mod error;
pub mod hook;
pub mod result;

pub use error::AppError;
pub use hook::HookKind;
pub use result::AppResult;
