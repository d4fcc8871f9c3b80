//!
//! src/lib.rs  Andrew Belles  Oct 18th, 2026
//!
//! Sonic brutality index crawler. Resolves an artist to a curated set of
//! studio album tracks, joins per-track acoustic descriptors, scores them
//! and compares artists:
//!
//!   lookup -> assembler -> joiner -> scorer -> reporter
//!

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;

pub mod types;
pub mod title_map;
pub mod lookup;
pub mod fetch;

pub mod assembler;
pub mod joiner;
pub mod scorer;
pub mod reporter;
pub mod pipeline;
pub mod sink;

pub use crate::errors::SbiError;
