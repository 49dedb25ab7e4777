//! Infrastructure adapters for compendium.
//!
//! This crate implements the ports defined in
//! `compendium_core::application::ports`. It contains all external
//! dependencies and I/O operations.

pub mod filesystem;
pub mod opener;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use opener::{NoopOpener, SystemOpener};
pub use vcs::GitRunner;
