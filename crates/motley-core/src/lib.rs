//! Motley Core
//!
//! Shared utilities for the Motley list dispatch crates: hashed collections,
//! logging setup and profiling scopes.

pub mod alloc;
pub mod logging;
#[cfg(feature = "profiling")]
pub mod profiling;
