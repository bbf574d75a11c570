//! Mock filesystem for testing.
//!
//! This module provides `MockFs` and pre-built run summaries for testing
//! the loader and collector without touching disk.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
