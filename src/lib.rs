//! Unreal Prune - build-artifact folder remover
//!
//! Walks a project tree depth-first and removes every directory whose name is
//! one of the Unreal build tool's generated folders (`Binaries`, `Intermediate`,
//! `Saved`, `DerivedDataCache`). Matched folders are removed whole without ever
//! being listed. Everything else is left exactly as it was.

pub mod logging;
pub mod patterns;
pub mod pruner;
pub mod remove;

// Re-export commonly used items
pub use patterns::DeletionSet;
pub use pruner::{prune, prune_with, PruneReport, RemovalFailure};
pub use remove::{force_remove_dir_all, Removal};
