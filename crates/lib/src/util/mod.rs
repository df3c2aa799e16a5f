//! Shared utilities.
//!
//! Filesystem helpers for clean-slate folder replacement and URL/file name
//! derivation, plus test helpers.

pub mod fs;
pub mod name;

#[cfg(test)]
pub mod testutil;
