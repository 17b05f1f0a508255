//! Support library for the concomp CLI binary.
//!
//! Exposes the command pipeline and logging set-up so tests can drive them
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
